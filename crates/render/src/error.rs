use crate::shaders::ShaderStage;

/// Everything that can go wrong in the render component.
///
/// None of these are recoverable. The component's lifecycle methods hand
/// them to [`fatal`], which logs and panics with the error's message.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{operation} called before a graphics context was attached")]
    MissingContext { operation: &'static str },
    #[error("{operation} called before a parameter source was attached")]
    MissingParameters { operation: &'static str },
    #[error("{operation} called before setup")]
    NotSetUp { operation: &'static str },
    #[error("{operation} called after cleanup")]
    AlreadyDestroyed { operation: &'static str },
    #[error("setup called twice")]
    AlreadySetUp,
    #[error("GL error 0x{code:04X} after {step}")]
    Driver { step: &'static str, code: u32 },
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {0}")]
    ProgramLink(String),
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
    #[error("graphics context error: {0}")]
    Context(String),
}

/// Abort on an unrecoverable render error.
#[track_caller]
pub fn fatal(err: RenderError) -> ! {
    tracing::error!(error = %err, "fatal render error");
    panic!("{err}");
}
