//! Parameter capture: an egui panel editing the triangle's render parameters.
//!
//! # Invariants
//! - The panel owns the parameters; the render component only reads them
//!   through [`ParameterSource`](kata_common::ParameterSource).
//! - Edits take effect on the next rendered frame.

pub mod viewer;

pub use viewer::ViewerInput;
