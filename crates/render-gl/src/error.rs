/// Errors from creating a window with a GL context.
#[derive(Debug, thiserror::Error)]
pub enum GlContextError {
    #[error("failed to open a GL display: {0}")]
    Display(String),
    #[error("display builder returned no window")]
    NoWindow,
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),
    #[error("GL context error: {0}")]
    Gl(#[from] glutin::error::Error),
}
