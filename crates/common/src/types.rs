use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Live-read parameters that drive the triangle each frame.
///
/// Owned by whatever captures user input (the GUI panel in the viewer);
/// the render component only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParameters {
    /// Clear color. The render component ignores the alpha channel.
    pub clear_color: Vec4,
    /// Per-vertex tint, one per triangle corner.
    pub vertex_tints: [Vec3; 3],
    pub spin_enabled: bool,
    /// Radians per second.
    pub spin_speed: f32,
    /// Uniform scale applied to x, y and z of every vertex.
    pub resize: f32,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            clear_color: Vec4::new(0.45, 0.55, 0.60, 1.00),
            vertex_tints: [Vec3::X, Vec3::Y, Vec3::Z],
            spin_enabled: true,
            spin_speed: 1.0,
            resize: 1.0,
        }
    }
}

/// Read access to the current render parameters.
///
/// Implemented by plain [`RenderParameters`], by the GUI input panel, and by
/// `RefCell<T>` so a GUI-owned source can be shared through `Rc<RefCell<_>>`.
pub trait ParameterSource {
    fn clear_color(&self) -> Vec4;
    fn vertex_tints(&self) -> [Vec3; 3];
    fn resize(&self) -> f32;
    fn spin_speed(&self) -> f32;
    fn spin_enabled(&self) -> bool;
}

impl ParameterSource for RenderParameters {
    fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    fn vertex_tints(&self) -> [Vec3; 3] {
        self.vertex_tints
    }

    fn resize(&self) -> f32 {
        self.resize
    }

    fn spin_speed(&self) -> f32 {
        self.spin_speed
    }

    fn spin_enabled(&self) -> bool {
        self.spin_enabled
    }
}

impl<T: ParameterSource + ?Sized> ParameterSource for RefCell<T> {
    fn clear_color(&self) -> Vec4 {
        self.borrow().clear_color()
    }

    fn vertex_tints(&self) -> [Vec3; 3] {
        self.borrow().vertex_tints()
    }

    fn resize(&self) -> f32 {
        self.borrow().resize()
    }

    fn spin_speed(&self) -> f32 {
        self.borrow().spin_speed()
    }

    fn spin_enabled(&self) -> bool {
        self.borrow().spin_enabled()
    }
}
