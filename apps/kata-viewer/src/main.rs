use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glow::HasContext;
use kata_input::ViewerInput;
use kata_render::{GraphicsContext, ReadbackSize, TriangleRenderComponent};
use kata_render_gl::{GlWindow, GlWindowBuilder, GlowBackend};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

mod config;
mod frame;

use config::{Overrides, ViewerConfig};
use frame::{FrameCounter, flip_rows};

const TITLE: &str = "kata viewer";

#[derive(Parser)]
#[command(name = "kata-viewer", about = "Spinning triangle viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Draw the triangle into the GUI window instead of a hidden window
    #[arg(long)]
    single_window: bool,

    /// JSON viewer config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Framebuffer region read back every frame, e.g. 400x400
    #[arg(long)]
    readback: Option<ReadbackSize>,

    /// GUI window width
    #[arg(long)]
    width: Option<u32>,

    /// GUI window height
    #[arg(long)]
    height: Option<u32>,
}

/// The visible window and its egui integration.
struct Gui {
    window: Rc<GlWindow>,
    gl: Arc<glow::Context>,
    state: egui_winit::State,
    painter: egui_glow::Painter,
}

struct ViewerApp {
    config: ViewerConfig,
    input: Rc<RefCell<ViewerInput>>,
    egui_ctx: EguiContext,
    gui: Option<Gui>,
    triangle: Option<TriangleRenderComponent<GlowBackend>>,
    preview: Option<egui::TextureHandle>,
    frames: FrameCounter,
    failure: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        let input = ViewerInput::new(config.parameters);
        Self {
            config,
            input: Rc::new(RefCell::new(input)),
            egui_ctx: EguiContext::default(),
            gui: None,
            triangle: None,
            preview: None,
            frames: FrameCounter::new(Instant::now()),
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let gui_window = Rc::new(
            GlWindowBuilder::new(TITLE)
                .with_size(self.config.width, self.config.height)
                .build(event_loop)?,
        );

        // Multi-window mode gives the component a window and context of its
        // own, sized to the readback region.
        let triangle_window = if self.config.single_window {
            Rc::clone(&gui_window)
        } else {
            let ReadbackSize { width, height } = self.config.readback;
            Rc::new(
                GlWindowBuilder::new(format!("{TITLE} (off-screen)"))
                    .with_size(width, height)
                    .build_with_config(event_loop, gui_window.config())?,
            )
        };

        let mut triangle = TriangleRenderComponent::new(
            GlowBackend::new(triangle_window.gl()),
            self.config.render_config(),
        )
        .with_context(triangle_window)
        .with_parameters(self.input.clone());
        triangle.setup();

        gui_window.make_current()?;
        let gl = gui_window.gl();
        let painter = egui_glow::Painter::new(Arc::clone(&gl), "", None, false)
            .map_err(|err| anyhow::anyhow!("egui painter: {err}"))?;
        let state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            gui_window.window(),
            Some(gui_window.window().scale_factor() as f32),
            None,
            Some(painter.max_texture_side()),
        );

        self.triangle = Some(triangle);
        self.gui = Some(Gui {
            window: gui_window,
            gl,
            state,
            painter,
        });
        Ok(())
    }

    fn redraw(&mut self) {
        let (Some(gui), Some(triangle)) = (self.gui.as_mut(), self.triangle.as_mut()) else {
            return;
        };
        let single_window = self.config.single_window;

        if !single_window {
            triangle.render_identity();
            update_preview(
                &mut self.preview,
                &self.egui_ctx,
                triangle.pixels(),
                triangle.readback_size(),
            );
        }

        if let Err(err) = gui.window.make_current() {
            tracing::error!("cannot bind GUI context: {err}");
            return;
        }
        let (width, height) = gui.window.surface_size();
        let clear = self.input.borrow().parameters().clear_color;
        unsafe {
            // egui leaves scissoring on.
            gui.gl.disable(glow::SCISSOR_TEST);
            gui.gl.viewport(0, 0, width as i32, height as i32);
            gui.gl.clear_color(clear.x, clear.y, clear.z, 1.0);
            gui.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        if single_window {
            triangle.render_identity();
        }

        let raw_input = gui.state.take_egui_input(gui.window.window());
        let input = &self.input;
        let preview = self.preview.as_ref();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            input.borrow_mut().show(ctx, preview);
        });
        gui.state
            .handle_platform_output(gui.window.window(), full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        gui.painter.paint_and_update_textures(
            [width, height],
            full_output.pixels_per_point,
            &primitives,
            &full_output.textures_delta,
        );

        if let Err(err) = gui.window.swap_buffers() {
            tracing::error!("present failed: {err}");
        }

        if let Some(fps) = self.frames.tick(Instant::now()) {
            gui.window.update_title(&format!("{TITLE} | {fps:.0} fps"));
            self.input.borrow_mut().set_frame_rate(fps);
            tracing::debug!(fps, frames = triangle.frames_rendered(), "frame rate");
        }
    }

    /// Release GPU resources while their contexts are still alive.
    fn shutdown(&mut self) {
        if let Some(mut triangle) = self.triangle.take() {
            if triangle.is_ready() {
                triangle.cleanup();
            }
        }
        self.preview = None;
        if let Some(mut gui) = self.gui.take() {
            if let Err(err) = gui.window.make_current() {
                tracing::warn!("cannot bind GUI context for teardown: {err}");
            }
            gui.painter.destroy();
        }
    }
}

/// Upload the latest readback as the preview texture, top row first and
/// opaque (the component clears alpha to 0).
fn update_preview(
    preview: &mut Option<egui::TextureHandle>,
    ctx: &EguiContext,
    pixels: &[u8],
    size: ReadbackSize,
) {
    let (width, height) = (size.width as usize, size.height as usize);
    let mut rgba = flip_rows(pixels, width, height);
    for alpha in rgba.iter_mut().skip(3).step_by(4) {
        *alpha = u8::MAX;
    }
    let image = egui::ColorImage::from_rgba_unmultiplied([width, height], &rgba);
    match preview {
        Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
        None => {
            *preview = Some(ctx.load_texture(
                "triangle-preview",
                image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gui.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            tracing::error!("viewer initialization failed: {err:#}");
            self.failure = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gui) = &mut self.gui else {
            return;
        };
        if window_id != gui.window.window().id() {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        }

        let response = gui.state.on_window_event(gui.window.window(), &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gui.window.resize(size.width, size.height);
                gui.window.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gui) = &self.gui {
            gui.window.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    config.apply(Overrides {
        single_window: cli.single_window,
        readback: cli.readback,
        width: cli.width,
        height: cli.height,
    });
    tracing::info!(
        single_window = config.single_window,
        readback = %config.readback,
        "kata-viewer starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
