use crate::backend::GpuBackend;
use crate::error::RenderError;
use crate::shaders::ShaderStage;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CompileShader { stage: ShaderStage, shader: u32 },
    DeleteShader { shader: u32 },
    LinkProgram { program: u32 },
    UniformLocation { name: String },
    CreateVertexArray { vao: u32 },
    CreateBuffer { slot: u32, buffer: u32, data: Vec<f32> },
    BindPipeline { program: u32, vao: u32 },
    UpdateBuffer { buffer: u32, data: Vec<f32> },
    Clear { rgba: [f32; 4] },
    SetUniform { columns: [f32; 16] },
    DrawTriangles { vertex_count: i32 },
    ReadPixels { width: u32, height: u32 },
    DestroyProgram { program: u32 },
    DestroyVertexArray { vao: u32, slots: Vec<u32> },
}

/// A backend call after which an armed GL error becomes pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    LinkProgram,
    CreateBuffer,
    DestroyProgram,
    DestroyVertexArray,
}

impl Trigger {
    fn matches(self, command: &Command) -> bool {
        matches!(
            (self, command),
            (Trigger::LinkProgram, Command::LinkProgram { .. })
                | (Trigger::CreateBuffer, Command::CreateBuffer { .. })
                | (Trigger::DestroyProgram, Command::DestroyProgram { .. })
                | (Trigger::DestroyVertexArray, Command::DestroyVertexArray { .. })
        )
    }
}

/// Backend that records calls instead of talking to a GPU.
///
/// Handles are sequential integers starting at 1. Buffer contents are kept
/// so tests can inspect what would have been uploaded. GL errors and
/// allocation failures can be injected to exercise the fatal paths.
#[derive(Debug)]
pub struct RecordingBackend {
    commands: RefCell<Vec<Command>>,
    next_handle: Cell<u32>,
    live: RefCell<BTreeSet<u32>>,
    buffers: RefCell<BTreeMap<u32, Vec<f32>>>,
    pending_errors: RefCell<VecDeque<u32>>,
    armed_errors: RefCell<Vec<(Trigger, u32)>>,
    fail_buffers: Cell<bool>,
    fill: u8,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::with_fill(0xFF)
    }

    /// Readbacks are filled with `fill`.
    pub fn with_fill(fill: u8) -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
            live: RefCell::new(BTreeSet::new()),
            buffers: RefCell::new(BTreeMap::new()),
            pending_errors: RefCell::new(VecDeque::new()),
            armed_errors: RefCell::new(Vec::new()),
            fail_buffers: Cell::new(false),
            fill,
        }
    }

    /// Queue a GL error code for the next [`GpuBackend::take_error`].
    pub fn inject_error(&self, code: u32) {
        self.pending_errors.borrow_mut().push_back(code);
    }

    /// Raise `code` right after the next call matching `trigger`.
    pub fn raise_error_after(&self, trigger: Trigger, code: u32) {
        self.armed_errors.borrow_mut().push((trigger, code));
    }

    /// Make every following buffer allocation fail.
    pub fn fail_buffer_allocation(&self) {
        self.fail_buffers.set(true);
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Current contents of a live buffer, as floats.
    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<f32>> {
        self.buffers.borrow().get(&buffer).cloned()
    }

    /// Number of created objects not yet destroyed.
    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    fn record(&self, command: Command) {
        tracing::trace!(?command, "backend call");
        self.armed_errors.borrow_mut().retain(|(trigger, code)| {
            if trigger.matches(&command) {
                self.pending_errors.borrow_mut().push_back(*code);
                false
            } else {
                true
            }
        });
        self.commands.borrow_mut().push(command);
    }

    fn allocate(&self) -> u32 {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        self.live.borrow_mut().insert(handle);
        handle
    }

    fn release(&self, handle: u32) {
        self.live.borrow_mut().remove(&handle);
        self.buffers.borrow_mut().remove(&handle);
    }
}

fn floats(data: &[u8]) -> Vec<f32> {
    data.chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

impl GpuBackend for RecordingBackend {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = String;

    fn compile_shader(&self, stage: ShaderStage, _source: &str) -> Result<u32, RenderError> {
        let shader = self.allocate();
        self.record(Command::CompileShader { stage, shader });
        Ok(shader)
    }

    fn delete_shader(&self, shader: u32) {
        self.release(shader);
        self.record(Command::DeleteShader { shader });
    }

    fn link_program(&self, _vertex: u32, _fragment: u32) -> Result<u32, RenderError> {
        let program = self.allocate();
        self.record(Command::LinkProgram { program });
        Ok(program)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        self.record(Command::UniformLocation {
            name: name.to_string(),
        });
        Some(name.to_string())
    }

    fn create_vertex_array(&self) -> Result<u32, RenderError> {
        let vao = self.allocate();
        self.record(Command::CreateVertexArray { vao });
        Ok(vao)
    }

    fn create_attribute_buffer(&self, slot: u32, data: &[u8]) -> Result<u32, RenderError> {
        if self.fail_buffers.get() {
            return Err(RenderError::Allocation {
                what: "attribute buffer",
                reason: "allocation disabled".into(),
            });
        }
        let buffer = self.allocate();
        let data = floats(data);
        self.buffers.borrow_mut().insert(buffer, data.clone());
        self.record(Command::CreateBuffer { slot, buffer, data });
        Ok(buffer)
    }

    fn bind_pipeline(&self, program: u32, vao: u32) {
        self.record(Command::BindPipeline { program, vao });
    }

    fn update_buffer(&self, buffer: u32, data: &[u8]) {
        let data = floats(data);
        if let Some(contents) = self.buffers.borrow_mut().get_mut(&buffer) {
            contents.clone_from(&data);
        }
        self.record(Command::UpdateBuffer { buffer, data });
    }

    fn clear(&self, rgba: [f32; 4]) {
        self.record(Command::Clear { rgba });
    }

    fn set_uniform_mat4(&self, _location: Option<&String>, columns: &[f32; 16]) {
        self.record(Command::SetUniform { columns: *columns });
    }

    fn draw_triangles(&self, vertex_count: i32) {
        self.record(Command::DrawTriangles { vertex_count });
    }

    fn read_pixels(&self, width: u32, height: u32, dst: &mut [u8]) {
        dst.fill(self.fill);
        self.record(Command::ReadPixels { width, height });
    }

    fn destroy_program(&self, program: u32, vertex: u32, fragment: u32) {
        self.release(vertex);
        self.release(fragment);
        self.release(program);
        self.record(Command::DestroyProgram { program });
    }

    fn destroy_vertex_array(&self, vao: u32, buffers: &[(u32, u32)]) {
        let mut slots: Vec<u32> = buffers.iter().map(|(slot, _)| *slot).collect();
        slots.sort_unstable_by(|a, b| b.cmp(a));
        for (_, buffer) in buffers {
            self.release(*buffer);
        }
        self.release(vao);
        self.record(Command::DestroyVertexArray { vao, slots });
    }

    fn take_error(&self) -> Option<u32> {
        self.pending_errors.borrow_mut().pop_front()
    }
}
