use glam::{Mat4, Vec3, Vec4};

/// Fixed triangle template. Never modified; every frame starts from it.
pub const ORIGIN_VERTICES: [[f32; 4]; 3] = [
    [-0.8, -0.8, 0.0, 1.0],
    [0.0, 0.8, 0.0, 1.0],
    [0.8, -0.8, 0.0, 1.0],
];

/// Initial per-vertex colors (red, green, blue, all opaque).
pub const INITIAL_COLORS: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

/// Rotation angle in radians. The spin flag acts as a 0/1 multiplier.
pub fn spin_angle(elapsed: f32, spin_speed: f32, spin_enabled: bool) -> f32 {
    elapsed * spin_speed * f32::from(u8::from(spin_enabled))
}

/// Rotate every origin vertex about Z, then scale x/y/z (never w) by `resize`.
pub fn transform_vertices(origin: &[[f32; 4]; 3], angle: f32, resize: f32) -> [[f32; 4]; 3] {
    let rotation = Mat4::from_rotation_z(angle);
    origin.map(|v| {
        let p = rotation * Vec4::from_array(v);
        (p * Vec4::new(resize, resize, resize, 1.0)).to_array()
    })
}

/// CPU-side vertex data for the triangle: template, working positions, colors.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGeometry {
    origin: [[f32; 4]; 3],
    working: [[f32; 4]; 3],
    colors: [[f32; 4]; 3],
}

impl Default for TriangleGeometry {
    fn default() -> Self {
        Self {
            origin: ORIGIN_VERTICES,
            working: ORIGIN_VERTICES,
            colors: INITIAL_COLORS,
        }
    }
}

impl TriangleGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> &[[f32; 4]; 3] {
        &self.origin
    }

    pub fn working(&self) -> &[[f32; 4]; 3] {
        &self.working
    }

    pub fn colors(&self) -> &[[f32; 4]; 3] {
        &self.colors
    }

    /// Overwrite the RGB channels of each vertex color. Alpha is left as is.
    pub fn apply_tints(&mut self, tints: [Vec3; 3]) {
        for (color, tint) in self.colors.iter_mut().zip(tints) {
            color[..3].copy_from_slice(&tint.to_array());
        }
    }

    /// Recompute the working positions from the template.
    pub fn update_positions(&mut self, angle: f32, resize: f32) {
        self.working = transform_vertices(&self.origin, angle, resize);
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.working)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}
