use crate::error::GlContextError;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    PossiblyCurrentGlContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use kata_render::{GraphicsContext, RenderError};
use raw_window_handle::HasWindowHandle;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

/// OpenGL version requested for every context.
pub const GL_VERSION: (u8, u8) = (4, 0);

/// First item with the highest sample count.
fn most_samples<T>(items: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8) -> Option<T> {
    items.reduce(|best, c| if samples(&c) > samples(&best) { c } else { best })
}

/// Config picker for [`DisplayBuilder`], which requires a `Config` back.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    match most_samples(configs, |c| c.num_samples()) {
        Some(config) => config,
        None => panic!("display offered no GL configs"),
    }
}

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct GlWindowBuilder {
    title: String,
    width: u32,
    height: u32,
    visible: bool,
}

impl GlWindowBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 400,
            height: 400,
            visible: true,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width.max(1), self.height.max(1)))
            .with_visible(self.visible)
    }

    /// Create the window, pick a GL config for it and create a 4.0 core context.
    ///
    /// # Panics
    /// If the display matches the template but offers no configs to choose
    /// from. Display and context failures are returned as errors.
    pub fn build(&self, event_loop: &ActiveEventLoop) -> Result<GlWindow, GlContextError> {
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(self.attributes()))
            .build(event_loop, template, pick_config)
            .map_err(|e| GlContextError::Display(e.to_string()))?;
        let window = window.ok_or(GlContextError::NoWindow)?;
        GlWindow::new(window, config)
    }

    /// Create another window on the display of an existing one, with its own
    /// context.
    pub fn build_with_config(
        &self,
        event_loop: &ActiveEventLoop,
        config: &Config,
    ) -> Result<GlWindow, GlContextError> {
        let window = glutin_winit::finalize_window(event_loop, self.attributes(), config)?;
        GlWindow::new(window, config.clone())
    }
}

/// A winit window with its own GL surface and context.
///
/// This is the [`GraphicsContext`] the triangle component binds in the
/// desktop viewer.
pub struct GlWindow {
    // Drop order: GL objects before the window that owns the surface.
    gl: Arc<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    config: Config,
    window: Window,
    started: Instant,
}

impl GlWindow {
    fn new(window: Window, config: Config) -> Result<Self, GlContextError> {
        let display = config.display();
        let raw_handle = window.window_handle().ok().map(|h| h.as_raw());
        let (major, minor) = GL_VERSION;
        let attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(raw_handle);

        let not_current = unsafe { display.create_context(&config, &attributes)? };
        let surface_attributes =
            window.build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())?;
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        if let Err(err) =
            surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            tracing::warn!("vsync unavailable: {err}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };
        tracing::info!(
            title = %window.title(),
            version = ?GL_VERSION,
            "GL context created"
        );

        Ok(Self {
            gl: Arc::new(gl),
            surface,
            context,
            config,
            window,
            started: Instant::now(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Shared handle to this window's GL function table.
    pub fn gl(&self) -> Arc<glow::Context> {
        Arc::clone(&self.gl)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resize the surface. Zero sizes are ignored.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }
}

impl GraphicsContext for GlWindow {
    fn make_current(&self) -> Result<(), RenderError> {
        if self.context.is_current() {
            return Ok(());
        }
        self.context
            .make_current(&self.surface)
            .map_err(|e| RenderError::Context(e.to_string()))
    }

    fn set_visible(&self, visible: bool) {
        self.window.set_visible(visible);
    }

    fn swap_buffers(&self) -> Result<(), RenderError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| RenderError::Context(e.to_string()))
    }

    fn update_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    fn surface_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}
