//! OpenGL backend for the triangle component.
//!
//! [`GlowBackend`] issues the component's GL calls through glow;
//! [`GlWindow`] pairs a winit window with a glutin surface and an OpenGL 4.0
//! core context and acts as the component's graphics context.
//!
//! # Invariants
//! - A backend is only used while its window's context is current.
//! - Each window owns exactly one context; contexts are not shared.

mod backend;
mod error;
mod window;

pub use backend::GlowBackend;
pub use error::GlContextError;
pub use window::{GL_VERSION, GlWindow, GlWindowBuilder};
