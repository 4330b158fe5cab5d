//! Shared types for the kata triangle viewer.
//!
//! # Invariants
//! - Render parameters are owned by their source; consumers only read them.

mod types;

pub use types::{ParameterSource, RenderParameters};
