use crate::backend::GpuBackend;
use crate::config::{ReadbackSize, RenderConfig};
use crate::context::GraphicsContext;
use crate::error::{RenderError, fatal};
use crate::geometry::{TriangleGeometry, spin_angle};
use crate::shaders::{COLOR_SLOT, POSITION_SLOT, ShaderStage, WVP_UNIFORM};
use glam::Mat4;
use kata_common::ParameterSource;
use std::rc::Rc;

/// Upper bound on stale GL errors drained before a checked step.
const MAX_STALE_ERRORS: usize = 16;

/// Linked shader program plus the shaders it was built from.
struct ShaderProgram<B: GpuBackend> {
    program: B::Program,
    vertex: B::Shader,
    fragment: B::Shader,
    wvp: Option<B::UniformLocation>,
}

impl<B: GpuBackend> ShaderProgram<B> {
    fn release(self, backend: &B) {
        backend.destroy_program(self.program, self.vertex, self.fragment);
    }
}

/// Vertex array with its position and color buffers.
struct VertexBuffers<B: GpuBackend> {
    vao: B::VertexArray,
    positions: B::Buffer,
    colors: B::Buffer,
}

impl<B: GpuBackend> VertexBuffers<B> {
    fn release(self, backend: &B) {
        backend.destroy_vertex_array(
            self.vao,
            &[(COLOR_SLOT, self.colors), (POSITION_SLOT, self.positions)],
        );
    }
}

struct GpuResources<B: GpuBackend> {
    shaders: ShaderProgram<B>,
    buffers: VertexBuffers<B>,
}

impl<B: GpuBackend> GpuResources<B> {
    /// Shaders first, then buffers. A GL error after either step is returned
    /// without attempting to recover.
    fn release(self, backend: &B) -> Result<(), RenderError> {
        discard_stale_errors(backend);
        self.shaders.release(backend);
        check(backend, "shader destruction")?;

        self.buffers.release(backend);
        check(backend, "buffer destruction")
    }

    fn release_unchecked(self, backend: &B) {
        self.shaders.release(backend);
        self.buffers.release(backend);
    }
}

enum Lifecycle<B: GpuBackend> {
    Uninitialized,
    Ready(GpuResources<B>),
    Destroyed,
}

impl<B: GpuBackend> Lifecycle<B> {
    fn name(&self) -> &'static str {
        match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Ready(_) => "ready",
            Lifecycle::Destroyed => "destroyed",
        }
    }
}

fn discard_stale_errors<B: GpuBackend>(backend: &B) {
    for _ in 0..MAX_STALE_ERRORS {
        match backend.take_error() {
            Some(code) => tracing::warn!("discarding stale GL error 0x{code:04X}"),
            None => break,
        }
    }
}

fn check<B: GpuBackend>(backend: &B, step: &'static str) -> Result<(), RenderError> {
    match backend.take_error() {
        Some(code) => Err(RenderError::Driver { step, code }),
        None => Ok(()),
    }
}

/// Draws one rotating, resizable, tinted triangle.
///
/// Lifecycle: `Uninitialized → setup → Ready → render* → cleanup → Destroyed`.
/// The graphics context and parameter source are injected with
/// [`with_context`](Self::with_context) and
/// [`with_parameters`](Self::with_parameters) before [`setup`](Self::setup).
///
/// Calling anything out of order is a programming error and panics. So does
/// any GL error observed after resources are created or destroyed.
pub struct TriangleRenderComponent<B: GpuBackend> {
    backend: B,
    config: RenderConfig,
    context: Option<Rc<dyn GraphicsContext>>,
    parameters: Option<Rc<dyn ParameterSource>>,
    geometry: TriangleGeometry,
    pixels: Vec<u8>,
    state: Lifecycle<B>,
    frames: u64,
}

impl<B: GpuBackend> TriangleRenderComponent<B> {
    pub fn new(backend: B, config: RenderConfig) -> Self {
        Self {
            backend,
            config,
            context: None,
            parameters: None,
            geometry: TriangleGeometry::new(),
            pixels: vec![0; config.readback.byte_len()],
            state: Lifecycle::Uninitialized,
            frames: 0,
        }
    }

    pub fn with_context(mut self, context: Rc<dyn GraphicsContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_parameters(mut self, parameters: Rc<dyn ParameterSource>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn geometry(&self) -> &TriangleGeometry {
        &self.geometry
    }

    /// RGBA8 pixels read back after the last frame, bottom row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn readback_size(&self) -> ReadbackSize {
        self.config.readback
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, Lifecycle::Ready(_))
    }

    /// Bind the surface, build the shader program and vertex buffers.
    ///
    /// # Panics
    /// If the context or parameter source is missing, if called twice, or on
    /// any GL error during creation.
    pub fn setup(&mut self) {
        if let Err(err) = self.try_setup() {
            fatal(err);
        }
    }

    /// Draw one frame with the identity view-projection.
    pub fn render_identity(&mut self) {
        self.render(Mat4::IDENTITY);
    }

    /// Draw one frame.
    ///
    /// # Panics
    /// If called before [`setup`](Self::setup) or after
    /// [`cleanup`](Self::cleanup), or if the surface cannot be bound or
    /// presented.
    pub fn render(&mut self, view_projection: Mat4) {
        if let Err(err) = self.try_render(view_projection) {
            fatal(err);
        }
    }

    /// Release every GPU resource. Repeated calls are no-ops.
    ///
    /// # Panics
    /// If called before [`setup`](Self::setup), or on any GL error during
    /// destruction.
    pub fn cleanup(&mut self) {
        if let Err(err) = self.try_cleanup() {
            fatal(err);
        }
    }

    fn try_setup(&mut self) -> Result<(), RenderError> {
        match self.state {
            Lifecycle::Uninitialized => {}
            Lifecycle::Ready(_) => return Err(RenderError::AlreadySetUp),
            Lifecycle::Destroyed => return Err(RenderError::AlreadyDestroyed { operation: "setup" }),
        }
        let context = self
            .context
            .clone()
            .ok_or(RenderError::MissingContext { operation: "setup" })?;
        if self.parameters.is_none() {
            return Err(RenderError::MissingParameters { operation: "setup" });
        }

        context.make_current()?;
        if !self.config.single_window {
            context.set_visible(false);
        }

        let shaders = self.create_shaders(context.as_ref())?;
        let buffers = match self.create_buffers() {
            Ok(buffers) => buffers,
            Err(err) => {
                shaders.release(&self.backend);
                return Err(err);
            }
        };
        self.state = Lifecycle::Ready(GpuResources { shaders, buffers });

        tracing::info!(
            single_window = self.config.single_window,
            readback = %self.config.readback,
            "triangle component ready"
        );
        Ok(())
    }

    fn create_shaders(&self, context: &dyn GraphicsContext) -> Result<ShaderProgram<B>, RenderError> {
        let backend = &self.backend;
        discard_stale_errors(backend);

        let vertex = backend.compile_shader(
            ShaderStage::Vertex,
            context.shader_source(ShaderStage::Vertex),
        )?;
        let fragment = match backend.compile_shader(
            ShaderStage::Fragment,
            context.shader_source(ShaderStage::Fragment),
        ) {
            Ok(shader) => shader,
            Err(err) => {
                backend.delete_shader(vertex);
                return Err(err);
            }
        };
        let program = match backend.link_program(vertex, fragment) {
            Ok(program) => program,
            Err(err) => {
                backend.delete_shader(fragment);
                backend.delete_shader(vertex);
                return Err(err);
            }
        };
        let shaders = ShaderProgram {
            program,
            vertex,
            fragment,
            wvp: backend.uniform_location(program, WVP_UNIFORM),
        };
        if shaders.wvp.is_none() {
            tracing::warn!(uniform = WVP_UNIFORM, "uniform not found in linked program");
        }

        if let Err(err) = check(backend, "shader creation") {
            shaders.release(backend);
            return Err(err);
        }
        tracing::debug!(?program, "shader program linked");
        Ok(shaders)
    }

    fn create_buffers(&self) -> Result<VertexBuffers<B>, RenderError> {
        let backend = &self.backend;
        discard_stale_errors(backend);

        let vao = backend.create_vertex_array()?;
        let positions =
            match backend.create_attribute_buffer(POSITION_SLOT, self.geometry.position_bytes()) {
                Ok(buffer) => buffer,
                Err(err) => {
                    backend.destroy_vertex_array(vao, &[]);
                    return Err(err);
                }
            };
        let colors = match backend.create_attribute_buffer(COLOR_SLOT, self.geometry.color_bytes())
        {
            Ok(buffer) => buffer,
            Err(err) => {
                backend.destroy_vertex_array(vao, &[(POSITION_SLOT, positions)]);
                return Err(err);
            }
        };
        let buffers = VertexBuffers {
            vao,
            positions,
            colors,
        };

        if let Err(err) = check(backend, "buffer creation") {
            buffers.release(backend);
            return Err(err);
        }
        tracing::debug!(?vao, "vertex buffers allocated");
        Ok(buffers)
    }

    fn try_render(&mut self, view_projection: Mat4) -> Result<(), RenderError> {
        let resources = match &self.state {
            Lifecycle::Ready(resources) => resources,
            Lifecycle::Uninitialized => return Err(RenderError::NotSetUp { operation: "render" }),
            Lifecycle::Destroyed => {
                return Err(RenderError::AlreadyDestroyed { operation: "render" });
            }
        };
        let context = self
            .context
            .as_ref()
            .ok_or(RenderError::MissingContext { operation: "render" })?;
        let parameters = self
            .parameters
            .as_ref()
            .ok_or(RenderError::MissingParameters { operation: "render" })?;
        let backend = &self.backend;
        let single_window = self.config.single_window;

        context.make_current()?;
        backend.bind_pipeline(resources.shaders.program, resources.buffers.vao);

        // Alpha is pinned to 0; the source's alpha is never used.
        if !single_window {
            let clear = parameters.clear_color();
            backend.clear([clear.x, clear.y, clear.z, 0.0]);
        }

        self.geometry.apply_tints(parameters.vertex_tints());
        backend.update_buffer(resources.buffers.colors, self.geometry.color_bytes());

        let angle = spin_angle(
            context.elapsed(),
            parameters.spin_speed(),
            parameters.spin_enabled(),
        );
        self.geometry.update_positions(angle, parameters.resize());

        backend.set_uniform_mat4(
            resources.shaders.wvp.as_ref(),
            &view_projection.to_cols_array(),
        );
        backend.update_buffer(resources.buffers.positions, self.geometry.position_bytes());
        backend.draw_triangles(3);

        if !single_window {
            context.swap_buffers()?;
        }

        let ReadbackSize { width, height } = self.config.readback;
        backend.read_pixels(width, height, &mut self.pixels);

        self.frames += 1;
        tracing::trace!(frame = self.frames, angle, "triangle rendered");
        Ok(())
    }

    fn try_cleanup(&mut self) -> Result<(), RenderError> {
        match std::mem::replace(&mut self.state, Lifecycle::Destroyed) {
            Lifecycle::Uninitialized => {
                self.state = Lifecycle::Uninitialized;
                Err(RenderError::NotSetUp {
                    operation: "cleanup",
                })
            }
            Lifecycle::Destroyed => {
                tracing::debug!("cleanup on an already destroyed component");
                Ok(())
            }
            Lifecycle::Ready(resources) => {
                if let Some(context) = &self.context {
                    context.make_current()?;
                }
                resources.release(&self.backend)?;
                tracing::info!(frames = self.frames, "triangle component destroyed");
                Ok(())
            }
        }
    }
}

impl<B: GpuBackend> Drop for TriangleRenderComponent<B> {
    fn drop(&mut self) {
        if !self.is_ready() {
            return;
        }
        if std::thread::panicking() {
            if let Lifecycle::Ready(resources) =
                std::mem::replace(&mut self.state, Lifecycle::Destroyed)
            {
                resources.release_unchecked(&self.backend);
            }
            return;
        }
        tracing::debug!(state = self.state.name(), "releasing GPU resources on drop");
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HeadlessContext;
    use crate::recording::{Command, RecordingBackend, Trigger};
    use glam::{Vec3, Vec4};
    use kata_common::RenderParameters;
    use std::cell::RefCell;
    use std::f32::consts::FRAC_PI_2;

    struct Harness {
        component: TriangleRenderComponent<RecordingBackend>,
        context: Rc<HeadlessContext>,
        parameters: Rc<RefCell<RenderParameters>>,
    }

    fn harness(config: RenderConfig) -> Harness {
        let context = Rc::new(HeadlessContext::default());
        let parameters = Rc::new(RefCell::new(RenderParameters::default()));
        let component = TriangleRenderComponent::new(RecordingBackend::new(), config)
            .with_context(context.clone())
            .with_parameters(parameters.clone());
        Harness {
            component,
            context,
            parameters,
        }
    }

    fn ready(config: RenderConfig) -> Harness {
        let mut h = harness(config);
        h.component.setup();
        h.component.backend().clear_commands();
        h
    }

    fn assert_vertices(actual: &[[f32; 4]; 3], expected: [[f32; 4]; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            for (x, y) in a.iter().zip(e.iter()) {
                assert!((x - y).abs() < 1e-5, "{actual:?} != {expected:?}");
            }
        }
    }

    fn uploaded(component: &TriangleRenderComponent<RecordingBackend>) -> Vec<(u32, Vec<f32>)> {
        component
            .backend()
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::UpdateBuffer { buffer, data } => Some((buffer, data)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn setup_creates_program_and_buffers() {
        let mut h = harness(RenderConfig::default());
        h.component.setup();

        let commands = h.component.backend().commands();
        assert!(matches!(
            commands[0],
            Command::CompileShader {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert!(matches!(
            commands[1],
            Command::CompileShader {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert!(commands.contains(&Command::UniformLocation {
            name: "WVP".into()
        }));
        let slots: Vec<u32> = commands
            .iter()
            .filter_map(|c| match c {
                Command::CreateBuffer { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(slots, vec![POSITION_SLOT, COLOR_SLOT]);
        assert!(h.component.is_ready());
        // program, two shaders, vao, two buffers
        assert_eq!(h.component.backend().live_objects(), 6);
    }

    #[test]
    fn setup_hides_window_unless_single_window() {
        let h = ready(RenderConfig::default());
        assert!(!h.context.is_visible());

        let h = ready(RenderConfig {
            single_window: true,
            ..RenderConfig::default()
        });
        assert!(h.context.is_visible());
    }

    #[test]
    #[should_panic(expected = "setup called before a graphics context was attached")]
    fn setup_without_context_is_fatal() {
        let parameters: Rc<dyn ParameterSource> = Rc::new(RenderParameters::default());
        TriangleRenderComponent::new(RecordingBackend::new(), RenderConfig::default())
            .with_parameters(parameters)
            .setup();
    }

    #[test]
    #[should_panic(expected = "setup called before a parameter source was attached")]
    fn setup_without_parameters_is_fatal() {
        let context: Rc<dyn GraphicsContext> = Rc::new(HeadlessContext::default());
        TriangleRenderComponent::new(RecordingBackend::new(), RenderConfig::default())
            .with_context(context)
            .setup();
    }

    #[test]
    #[should_panic(expected = "render called before setup")]
    fn render_before_setup_is_fatal() {
        let mut h = harness(RenderConfig::default());
        h.component.render_identity();
    }

    #[test]
    #[should_panic(expected = "setup called twice")]
    fn double_setup_is_fatal() {
        let mut h = ready(RenderConfig::default());
        h.component.setup();
    }

    #[test]
    #[should_panic(expected = "render called after cleanup")]
    fn render_after_cleanup_is_fatal() {
        let mut h = ready(RenderConfig::default());
        h.component.cleanup();
        h.component.render_identity();
    }

    #[test]
    #[should_panic(expected = "cleanup called before setup")]
    fn cleanup_before_setup_is_fatal() {
        let mut h = harness(RenderConfig::default());
        h.component.cleanup();
    }

    #[test]
    #[should_panic(expected = "GL error 0x0502 after shader creation")]
    fn gl_error_after_shader_creation_is_fatal() {
        let mut h = harness(RenderConfig::default());
        h.component
            .backend()
            .raise_error_after(Trigger::LinkProgram, 0x0502);
        h.component.setup();
    }

    #[test]
    #[should_panic(expected = "GL error 0x0501 after buffer creation")]
    fn gl_error_after_buffer_creation_is_fatal() {
        let mut h = harness(RenderConfig::default());
        h.component
            .backend()
            .raise_error_after(Trigger::CreateBuffer, 0x0501);
        h.component.setup();
    }

    #[test]
    #[should_panic(expected = "GL error 0x0505 after buffer destruction")]
    fn gl_error_during_teardown_is_fatal() {
        let mut h = ready(RenderConfig::default());
        h.component
            .backend()
            .raise_error_after(Trigger::DestroyVertexArray, 0x0505);
        h.component.cleanup();
    }

    #[test]
    #[should_panic(expected = "GL error 0x0502 after shader destruction")]
    fn gl_error_during_shader_release_is_fatal() {
        let mut h = ready(RenderConfig::default());
        h.component
            .backend()
            .raise_error_after(Trigger::DestroyProgram, 0x0502);
        h.component.cleanup();
    }

    #[test]
    fn stale_errors_before_setup_are_discarded() {
        let mut h = harness(RenderConfig::default());
        h.component.backend().inject_error(0x0500);
        h.component.setup();
        assert!(h.component.is_ready());
    }

    #[test]
    fn failed_buffer_allocation_releases_the_program() {
        let mut h = harness(RenderConfig::default());
        h.component.backend().fail_buffer_allocation();
        let result = h.component.try_setup();

        assert!(matches!(result, Err(RenderError::Allocation { .. })));
        assert!(!h.component.is_ready());
        assert_eq!(h.component.backend().live_objects(), 0);
    }

    #[test]
    fn render_follows_the_frame_pipeline() {
        let mut h = ready(RenderConfig::default());
        let binds = h.context.make_current_calls();
        h.component.render_identity();
        assert_eq!(h.context.make_current_calls(), binds + 1);

        let kinds: Vec<&'static str> = h
            .component
            .backend()
            .commands()
            .iter()
            .map(|c| match c {
                Command::BindPipeline { .. } => "bind",
                Command::Clear { .. } => "clear",
                Command::UpdateBuffer { .. } => "update",
                Command::SetUniform { .. } => "uniform",
                Command::DrawTriangles { vertex_count: 3 } => "draw3",
                Command::ReadPixels { .. } => "readback",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["bind", "clear", "update", "uniform", "update", "draw3", "readback"]
        );
        assert_eq!(h.context.swaps(), 1);
        assert_eq!(h.component.frames_rendered(), 1);

        h.component.render_identity();
        assert_eq!(h.context.make_current_calls(), binds + 2);
    }

    #[test]
    fn clear_alpha_is_always_zero() {
        let mut h = ready(RenderConfig::default());
        h.parameters.borrow_mut().clear_color = Vec4::new(0.1, 0.2, 0.3, 0.9);
        h.component.render_identity();

        let clears: Vec<[f32; 4]> = h
            .component
            .backend()
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::Clear { rgba } => Some(rgba),
                _ => None,
            })
            .collect();
        assert_eq!(clears, vec![[0.1, 0.2, 0.3, 0.0]]);
    }

    #[test]
    fn single_window_skips_clear_and_present() {
        let mut h = ready(RenderConfig {
            single_window: true,
            ..RenderConfig::default()
        });
        h.component.render_identity();

        let commands = h.component.backend().commands();
        assert!(!commands.iter().any(|c| matches!(c, Command::Clear { .. })));
        assert!(commands.iter().any(|c| matches!(c, Command::ReadPixels { .. })));
        assert_eq!(h.context.swaps(), 0);
    }

    #[test]
    fn color_buffer_takes_tint_rgb_and_keeps_alpha() {
        let mut h = ready(RenderConfig::default());
        h.parameters.borrow_mut().vertex_tints = [
            Vec3::new(0.1, 0.2, 0.3),
            Vec3::new(0.4, 0.5, 0.6),
            Vec3::new(0.7, 0.8, 0.9),
        ];
        h.component.render_identity();

        assert_eq!(
            h.component.geometry().colors(),
            &[
                [0.1, 0.2, 0.3, 1.0],
                [0.4, 0.5, 0.6, 1.0],
                [0.7, 0.8, 0.9, 1.0],
            ]
        );
        let (_, colors) = &uploaded(&h.component)[0];
        assert_eq!(colors[3], 1.0);
        assert_eq!(colors[7], 1.0);
        assert_eq!(colors[11], 1.0);
    }

    #[test]
    fn halved_triangle_without_spin() {
        let mut h = ready(RenderConfig::default());
        {
            let mut p = h.parameters.borrow_mut();
            p.resize = 0.5;
            p.spin_enabled = false;
            p.spin_speed = 4.0;
        }
        h.context.set_elapsed(37.0);
        h.component.render_identity();

        let expected = [
            [-0.4, -0.4, 0.0, 1.0],
            [0.0, 0.4, 0.0, 1.0],
            [0.4, -0.4, 0.0, 1.0],
        ];
        assert_vertices(h.component.geometry().working(), expected);

        let (_, positions) = &uploaded(&h.component)[1];
        let flat: Vec<f32> = expected.iter().flatten().copied().collect();
        for (a, e) in positions.iter().zip(flat) {
            assert!((a - e).abs() < 1e-5);
        }
    }

    #[test]
    fn spin_rotates_by_time_times_speed() {
        let mut h = ready(RenderConfig::default());
        {
            let mut p = h.parameters.borrow_mut();
            p.spin_speed = 0.5;
            p.resize = 2.0;
        }
        h.context.set_elapsed(FRAC_PI_2 / 0.5);
        h.component.render_identity();

        // Rz(pi/2) * (x, y) = (-y, x), then doubled.
        assert_vertices(
            h.component.geometry().working(),
            [
                [1.6, -1.6, 0.0, 1.0],
                [-1.6, 0.0, 0.0, 1.0],
                [1.6, 1.6, 0.0, 1.0],
            ],
        );
    }

    #[test]
    fn time_tick_at_unit_scale_is_pure_rotation() {
        let mut h = ready(RenderConfig::default());
        h.context.set_elapsed(0.3);
        h.component.render_identity();
        let first = *h.component.geometry().working();

        h.context.advance(0.2);
        h.component.render_identity();
        let second = *h.component.geometry().working();

        let delta = Mat4::from_rotation_z(0.2);
        for (a, b) in first.iter().zip(second.iter()) {
            let rotated = (delta * Vec4::from_array(*a)).to_array();
            for (x, y) in rotated.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn view_projection_reaches_the_uniform() {
        let mut h = ready(RenderConfig::default());
        let vp = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        h.component.render(vp);

        let uniforms: Vec<[f32; 16]> = h
            .component
            .backend()
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetUniform { columns } => Some(columns),
                _ => None,
            })
            .collect();
        assert_eq!(uniforms, vec![vp.to_cols_array()]);
    }

    #[test]
    fn readback_buffer_matches_configured_size() {
        let config = RenderConfig {
            readback: ReadbackSize::new(8, 4),
            ..RenderConfig::default()
        };
        let mut h = ready(config);
        h.component.render_identity();

        assert_eq!(h.component.pixels().len(), 8 * 4 * 4);
        assert!(h.component.pixels().iter().all(|&b| b == 0xFF));
        assert!(
            h.component
                .backend()
                .commands()
                .contains(&Command::ReadPixels {
                    width: 8,
                    height: 4
                })
        );
    }

    #[test]
    fn cleanup_releases_everything_once() {
        let mut h = ready(RenderConfig::default());
        h.component.render_identity();
        h.component.cleanup();
        h.component.cleanup();

        let commands = h.component.backend().commands();
        let teardown: Vec<&Command> = commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Command::DestroyProgram { .. } | Command::DestroyVertexArray { .. }
                )
            })
            .collect();
        assert_eq!(teardown.len(), 2);
        assert!(matches!(teardown[0], Command::DestroyProgram { .. }));
        assert!(matches!(
            teardown[1],
            Command::DestroyVertexArray { slots, .. } if slots == &vec![COLOR_SLOT, POSITION_SLOT]
        ));
        assert_eq!(h.component.backend().live_objects(), 0);
        assert!(!h.component.is_ready());
    }

    #[test]
    fn drop_releases_resources() {
        let backend = Rc::new(RecordingBackend::new());
        {
            let context: Rc<dyn GraphicsContext> = Rc::new(HeadlessContext::default());
            let parameters: Rc<dyn ParameterSource> = Rc::new(RenderParameters::default());
            let mut component =
                TriangleRenderComponent::new(backend.clone(), RenderConfig::default())
                    .with_context(context)
                    .with_parameters(parameters);
            component.setup();
            assert_eq!(backend.live_objects(), 6);
        }
        assert_eq!(backend.live_objects(), 0);
    }
}
