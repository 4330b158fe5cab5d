//! Triangle render component: the per-frame pipeline that spins, resizes and
//! tints a single triangle, independent of the GL binding underneath.
//!
//! # Invariants
//! - The origin template is never modified; working positions and colors are
//!   fully rewritten before every draw.
//! - GPU handles are created in `setup` and released exactly once.
//! - Every ordering violation or GL error is fatal.
//!
//! The GL calls go through [`GpuBackend`]. [`RecordingBackend`] and
//! [`HeadlessContext`] stand in for a GPU and a window in tests and the CLI;
//! `kata-render-gl` provides the OpenGL versions.

mod backend;
mod component;
mod config;
mod context;
mod error;
pub mod geometry;
mod recording;
pub mod shaders;

pub use backend::GpuBackend;
pub use component::TriangleRenderComponent;
pub use config::{InvalidReadbackSize, ReadbackSize, RenderConfig};
pub use context::{GraphicsContext, HeadlessContext};
pub use error::{RenderError, fatal};
pub use geometry::TriangleGeometry;
pub use recording::{Command, RecordingBackend, Trigger};
pub use shaders::{ShaderStage, UnknownShaderName};

pub fn crate_info() -> &'static str {
    "kata-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
