use crate::error::RenderError;
use crate::shaders::ShaderStage;
use std::fmt::Debug;
use std::rc::Rc;

/// The GL calls the triangle component needs, behind one seam.
///
/// Every method assumes the backend's context is current on the calling
/// thread. Implementations: `GlowBackend` in `kata-render-gl` for real
/// OpenGL, and [`RecordingBackend`](crate::RecordingBackend) for tests and
/// headless runs.
pub trait GpuBackend {
    type Shader: Copy + Debug;
    type Program: Copy + Debug;
    type Buffer: Copy + Debug;
    type VertexArray: Copy + Debug;
    type UniformLocation: Clone + Debug;

    fn compile_shader(&self, stage: ShaderStage, source: &str)
    -> Result<Self::Shader, RenderError>;

    /// Delete a shader that never made it into a program.
    fn delete_shader(&self, shader: Self::Shader);

    /// Create a program from both stages, link it and make it the active program.
    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, RenderError>;

    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    /// Create a vertex array object and bind it.
    fn create_vertex_array(&self) -> Result<Self::VertexArray, RenderError>;

    /// Create an array buffer with static `data` and wire it to attribute
    /// `slot` as tightly packed 4-float vectors.
    fn create_attribute_buffer(&self, slot: u32, data: &[u8])
    -> Result<Self::Buffer, RenderError>;

    /// Make `program` and `vao` the active program and vertex array.
    fn bind_pipeline(&self, program: Self::Program, vao: Self::VertexArray);

    /// Overwrite `buffer` from offset 0 without reallocating it.
    fn update_buffer(&self, buffer: Self::Buffer, data: &[u8]);

    /// Clear the color buffer to `rgba`.
    fn clear(&self, rgba: [f32; 4]);

    fn set_uniform_mat4(&self, location: Option<&Self::UniformLocation>, columns: &[f32; 16]);

    fn draw_triangles(&self, vertex_count: i32);

    /// Read a `width` x `height` RGBA8 region from the lower-left corner.
    fn read_pixels(&self, width: u32, height: u32, dst: &mut [u8]);

    /// Unbind, detach and delete both shaders and the program.
    fn destroy_program(&self, program: Self::Program, vertex: Self::Shader, fragment: Self::Shader);

    /// Disable the attribute slots, delete their buffers, then the vertex array.
    fn destroy_vertex_array(&self, vao: Self::VertexArray, buffers: &[(u32, Self::Buffer)]);

    /// Pop the oldest pending GL error, if any.
    fn take_error(&self) -> Option<u32>;
}

/// A backend shared with the host delegates to the shared instance.
impl<B: GpuBackend> GpuBackend for Rc<B> {
    type Shader = B::Shader;
    type Program = B::Program;
    type Buffer = B::Buffer;
    type VertexArray = B::VertexArray;
    type UniformLocation = B::UniformLocation;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<B::Shader, RenderError> {
        (**self).compile_shader(stage, source)
    }

    fn delete_shader(&self, shader: B::Shader) {
        (**self).delete_shader(shader)
    }

    fn link_program(&self, vertex: B::Shader, fragment: B::Shader) -> Result<B::Program, RenderError> {
        (**self).link_program(vertex, fragment)
    }

    fn uniform_location(&self, program: B::Program, name: &str) -> Option<B::UniformLocation> {
        (**self).uniform_location(program, name)
    }

    fn create_vertex_array(&self) -> Result<B::VertexArray, RenderError> {
        (**self).create_vertex_array()
    }

    fn create_attribute_buffer(&self, slot: u32, data: &[u8]) -> Result<B::Buffer, RenderError> {
        (**self).create_attribute_buffer(slot, data)
    }

    fn bind_pipeline(&self, program: B::Program, vao: B::VertexArray) {
        (**self).bind_pipeline(program, vao)
    }

    fn update_buffer(&self, buffer: B::Buffer, data: &[u8]) {
        (**self).update_buffer(buffer, data)
    }

    fn clear(&self, rgba: [f32; 4]) {
        (**self).clear(rgba)
    }

    fn set_uniform_mat4(&self, location: Option<&B::UniformLocation>, columns: &[f32; 16]) {
        (**self).set_uniform_mat4(location, columns)
    }

    fn draw_triangles(&self, vertex_count: i32) {
        (**self).draw_triangles(vertex_count)
    }

    fn read_pixels(&self, width: u32, height: u32, dst: &mut [u8]) {
        (**self).read_pixels(width, height, dst)
    }

    fn destroy_program(&self, program: B::Program, vertex: B::Shader, fragment: B::Shader) {
        (**self).destroy_program(program, vertex, fragment)
    }

    fn destroy_vertex_array(&self, vao: B::VertexArray, buffers: &[(u32, B::Buffer)]) {
        (**self).destroy_vertex_array(vao, buffers)
    }

    fn take_error(&self) -> Option<u32> {
        (**self).take_error()
    }
}
