use glow::HasContext;
use kata_render::{GpuBackend, RenderError, ShaderStage};
use std::sync::Arc;

/// GL enum for a shader stage.
pub(crate) fn shader_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// [`GpuBackend`] on top of a glow context.
///
/// The context must be current whenever a method is called; the component
/// makes its surface current at the start of every lifecycle step.
#[derive(Clone)]
pub struct GlowBackend {
    gl: Arc<glow::Context>,
}

impl GlowBackend {
    pub fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }
}

impl GpuBackend for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<glow::Shader, RenderError> {
        let gl = &self.gl;
        unsafe {
            let shader = gl
                .create_shader(shader_kind(stage))
                .map_err(|reason| RenderError::Allocation {
                    what: "shader",
                    reason,
                })?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(RenderError::ShaderCompile { stage, log });
            }
            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn link_program(
        &self,
        vertex: glow::Shader,
        fragment: glow::Shader,
    ) -> Result<glow::Program, RenderError> {
        let gl = &self.gl;
        unsafe {
            let program = gl
                .create_program()
                .map_err(|reason| RenderError::Allocation {
                    what: "program",
                    reason,
                })?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);
            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.detach_shader(program, vertex);
                gl.detach_shader(program, fragment);
                gl.delete_program(program);
                return Err(RenderError::ProgramLink(log));
            }
            gl.use_program(Some(program));
            Ok(program)
        }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_vertex_array(&self) -> Result<glow::VertexArray, RenderError> {
        unsafe {
            let vao = self
                .gl
                .create_vertex_array()
                .map_err(|reason| RenderError::Allocation {
                    what: "vertex array",
                    reason,
                })?;
            self.gl.bind_vertex_array(Some(vao));
            Ok(vao)
        }
    }

    fn create_attribute_buffer(&self, slot: u32, data: &[u8]) -> Result<glow::Buffer, RenderError> {
        let gl = &self.gl;
        unsafe {
            let buffer = gl
                .create_buffer()
                .map_err(|reason| RenderError::Allocation {
                    what: "attribute buffer",
                    reason,
                })?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(slot, 4, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(slot);
            Ok(buffer)
        }
    }

    fn bind_pipeline(&self, program: glow::Program, vao: glow::VertexArray) {
        unsafe {
            self.gl.use_program(Some(program));
            self.gl.bind_vertex_array(Some(vao));
        }
    }

    fn update_buffer(&self, buffer: glow::Buffer, data: &[u8]) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, data);
        }
    }

    fn clear(&self, rgba: [f32; 4]) {
        let [r, g, b, a] = rgba;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn set_uniform_mat4(&self, location: Option<&glow::UniformLocation>, columns: &[f32; 16]) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(location, false, columns);
        }
    }

    fn draw_triangles(&self, vertex_count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, 0, vertex_count) }
    }

    fn read_pixels(&self, width: u32, height: u32, dst: &mut [u8]) {
        unsafe {
            self.gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            self.gl.read_pixels(
                0,
                0,
                width as i32,
                height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(dst)),
            );
        }
    }

    fn destroy_program(&self, program: glow::Program, vertex: glow::Shader, fragment: glow::Shader) {
        let gl = &self.gl;
        unsafe {
            gl.use_program(None);
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            gl.delete_shader(fragment);
            gl.delete_shader(vertex);
            gl.delete_program(program);
        }
    }

    fn destroy_vertex_array(&self, vao: glow::VertexArray, buffers: &[(u32, glow::Buffer)]) {
        let gl = &self.gl;
        unsafe {
            for (slot, _) in buffers {
                gl.disable_vertex_attrib_array(*slot);
            }
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            for (_, buffer) in buffers {
                gl.delete_buffer(*buffer);
            }
            gl.bind_vertex_array(None);
            gl.delete_vertex_array(vao);
        }
    }

    fn take_error(&self) -> Option<u32> {
        let code = unsafe { self.gl.get_error() };
        (code != glow::NO_ERROR).then_some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_gl_enums() {
        assert_eq!(shader_kind(ShaderStage::Vertex), glow::VERTEX_SHADER);
        assert_eq!(shader_kind(ShaderStage::Fragment), glow::FRAGMENT_SHADER);
    }
}
