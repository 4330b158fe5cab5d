use crate::error::RenderError;
use crate::shaders::ShaderStage;
use std::cell::{Cell, RefCell};

/// The window / rendering surface the component draws into.
///
/// The component only borrows the context; the host owns it and decides its
/// lifetime.
pub trait GraphicsContext {
    /// Make this surface's GL context current on the calling thread.
    fn make_current(&self) -> Result<(), RenderError>;

    fn set_visible(&self, visible: bool);

    /// Present the back buffer.
    fn swap_buffers(&self) -> Result<(), RenderError>;

    fn update_title(&self, title: &str);

    /// Seconds since the context was created.
    fn elapsed(&self) -> f32;

    /// Surface size in physical pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Raw source text for a shader stage.
    fn shader_source(&self, stage: ShaderStage) -> &str {
        stage.source()
    }
}

/// A context with no window behind it.
///
/// The clock is set by hand, and every call is counted so tests can
/// observe what the component asked for.
#[derive(Debug)]
pub struct HeadlessContext {
    size: (u32, u32),
    elapsed: Cell<f32>,
    visible: Cell<bool>,
    title: RefCell<String>,
    make_current_calls: Cell<u32>,
    swaps: Cell<u32>,
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::new(400, 400)
    }
}

impl HeadlessContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            elapsed: Cell::new(0.0),
            visible: Cell::new(true),
            title: RefCell::new(String::new()),
            make_current_calls: Cell::new(0),
            swaps: Cell::new(0),
        }
    }

    pub fn set_elapsed(&self, seconds: f32) {
        self.elapsed.set(seconds);
    }

    pub fn advance(&self, seconds: f32) {
        self.elapsed.set(self.elapsed.get() + seconds);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn make_current_calls(&self) -> u32 {
        self.make_current_calls.get()
    }

    pub fn swaps(&self) -> u32 {
        self.swaps.get()
    }
}

impl GraphicsContext for HeadlessContext {
    fn make_current(&self) -> Result<(), RenderError> {
        self.make_current_calls.set(self.make_current_calls.get() + 1);
        Ok(())
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    fn swap_buffers(&self) -> Result<(), RenderError> {
        self.swaps.set(self.swaps.get() + 1);
        Ok(())
    }

    fn update_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn elapsed(&self) -> f32 {
        self.elapsed.get()
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }
}
