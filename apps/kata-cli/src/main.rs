use clap::{Parser, Subcommand};
use kata_common::RenderParameters;
use kata_render::{
    HeadlessContext, RecordingBackend, RenderConfig, ShaderStage, TriangleRenderComponent,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kata-cli", about = "CLI tool for the triangle render component")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print a shader's source (`vert` or `frag`)
    Shader {
        name: String,
    },
    /// Run the component headless and print the transformed vertices
    Simulate {
        /// Number of frames to render
        #[arg(short, long, default_value = "5")]
        frames: u32,
        /// Seconds between frames
        #[arg(long, default_value = "0.1")]
        dt: f32,
        /// Spin speed in radians per second
        #[arg(long, default_value = "1.0")]
        speed: f32,
        /// Uniform scale
        #[arg(long, default_value = "1.0")]
        resize: f32,
        /// Disable spinning
        #[arg(long)]
        no_spin: bool,
        /// Skip clear and present, as when drawing into a shared window
        #[arg(long)]
        single_window: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("kata-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", kata_render::crate_info());
            let stages: Vec<&str> = ShaderStage::ALL.iter().map(|s| s.name()).collect();
            println!("shaders: {}", stages.join(", "));
        }
        Commands::Shader { name } => {
            let stage: ShaderStage = name.parse()?;
            print!("{}", stage.source());
        }
        Commands::Simulate {
            frames,
            dt,
            speed,
            resize,
            no_spin,
            single_window,
        } => {
            let parameters = Rc::new(RefCell::new(RenderParameters {
                spin_enabled: !no_spin,
                spin_speed: speed,
                resize,
                ..RenderParameters::default()
            }));
            let context = Rc::new(HeadlessContext::default());
            let backend = Rc::new(RecordingBackend::new());
            let config = RenderConfig {
                single_window,
                ..RenderConfig::default()
            };

            let mut triangle = TriangleRenderComponent::new(Rc::clone(&backend), config)
                .with_context(context.clone())
                .with_parameters(parameters);
            triangle.setup();

            println!("Simulating {frames} frames: dt={dt}s speed={speed} resize={resize}");
            for frame in 0..frames {
                context.set_elapsed(frame as f32 * dt);
                triangle.render_identity();
                let vertices = triangle
                    .geometry()
                    .working()
                    .iter()
                    .map(|[x, y, z, w]| format!("({x:+.3}, {y:+.3}, {z:+.3}, {w:.1})"))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("frame {frame:>3} t={:.3}: {vertices}", frame as f32 * dt);
            }

            triangle.cleanup();
            tracing::info!(
                frames = triangle.frames_rendered(),
                commands = backend.commands().len(),
                "simulation finished"
            );
            println!(
                "Rendered {} frames, {} GL commands, {} swaps, {} live objects",
                triangle.frames_rendered(),
                backend.commands().len(),
                context.swaps(),
                backend.live_objects()
            );
        }
    }

    Ok(())
}
