use glam::{Vec3, Vec4};
use kata_common::{ParameterSource, RenderParameters};
use std::ops::RangeInclusive;

pub const SPIN_SPEED_RANGE: RangeInclusive<f32> = 0.0..=10.0;
pub const RESIZE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

const TINT_LABELS: [&str; 3] = ["vertex 1", "vertex 2", "vertex 3"];

/// GUI panel that owns and edits the triangle's [`RenderParameters`].
#[derive(Debug, Clone, Default)]
pub struct ViewerInput {
    parameters: RenderParameters,
    frame_rate: f32,
}

impl ViewerInput {
    pub fn new(parameters: RenderParameters) -> Self {
        Self {
            parameters,
            frame_rate: 0.0,
        }
    }

    pub fn parameters(&self) -> &RenderParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut RenderParameters {
        &mut self.parameters
    }

    /// Frame rate shown in the panel.
    pub fn set_frame_rate(&mut self, fps: f32) {
        self.frame_rate = fps;
    }

    /// Show the "Triangle" window. `preview` is drawn under the controls
    /// when the component renders off-screen. Returns whether a parameter
    /// changed this frame.
    pub fn show(&mut self, ctx: &egui::Context, preview: Option<&egui::TextureHandle>) -> bool {
        egui::Window::new("Triangle")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                let changed = self.ui(ui);
                if let Some(texture) = preview {
                    ui.separator();
                    ui.label("off-screen preview");
                    ui.image((texture.id(), texture.size_vec2()));
                }
                changed
            })
            .and_then(|response| response.inner)
            .unwrap_or(false)
    }

    /// Draw the parameter controls into `ui`.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let p = &mut self.parameters;
        let mut changed = false;

        ui.horizontal(|ui| {
            let mut clear = p.clear_color.to_array();
            if ui.color_edit_button_rgba_unmultiplied(&mut clear).changed() {
                p.clear_color = Vec4::from_array(clear);
                changed = true;
            }
            ui.label("clear color");
        });

        for (tint, label) in p.vertex_tints.iter_mut().zip(TINT_LABELS) {
            ui.horizontal(|ui| {
                let mut rgb = tint.to_array();
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    *tint = Vec3::from_array(rgb);
                    changed = true;
                }
                ui.label(label);
            });
        }

        changed |= ui.checkbox(&mut p.spin_enabled, "spin").changed();
        changed |= ui
            .add(egui::Slider::new(&mut p.spin_speed, SPIN_SPEED_RANGE).text("spin speed"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut p.resize, RESIZE_RANGE).text("resize"))
            .changed();

        ui.label(format!("{:.1} fps", self.frame_rate));

        if changed {
            tracing::debug!(parameters = ?self.parameters, "render parameters edited");
        }
        changed
    }
}

impl ParameterSource for ViewerInput {
    fn clear_color(&self) -> Vec4 {
        self.parameters.clear_color
    }

    fn vertex_tints(&self) -> [Vec3; 3] {
        self.parameters.vertex_tints
    }

    fn resize(&self) -> f32 {
        self.parameters.resize
    }

    fn spin_speed(&self) -> f32 {
        self.parameters.spin_speed
    }

    fn spin_enabled(&self) -> bool {
        self.parameters.spin_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn panel_without_input_changes_nothing() {
        let ctx = egui::Context::default();
        let mut input = ViewerInput::default();
        let mut changed = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed = input.show(ctx, None);
        });
        assert!(!changed);
        assert_eq!(input.parameters(), &RenderParameters::default());
    }

    #[test]
    fn shared_panel_is_a_parameter_source() {
        let input = Rc::new(RefCell::new(ViewerInput::default()));
        let source: Rc<dyn ParameterSource> = input.clone();

        input.borrow_mut().parameters_mut().spin_speed = 2.5;
        input.borrow_mut().parameters_mut().vertex_tints[1] = Vec3::ONE;

        assert_eq!(source.spin_speed(), 2.5);
        assert_eq!(source.vertex_tints()[1], Vec3::ONE);
    }

    #[test]
    fn default_parameters_fit_the_slider_ranges() {
        let p = RenderParameters::default();
        assert!(SPIN_SPEED_RANGE.contains(&p.spin_speed));
        assert!(RESIZE_RANGE.contains(&p.resize));
    }
}
