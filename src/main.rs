use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kernelsketch::assets::AssetLoader;
use kernelsketch::models::AppConfig;
use kernelsketch::rendering::{encode_frame, write_png, PngOptions};
use kernelsketch::services::{Animation, Sketch, DEFAULT_FPS};

#[derive(Parser)]
#[command(name = "kernelsketch")]
#[command(about = "Generative pixel art from repeated palette-quantized convolution")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct SketchArgs {
    /// Config file (defaults to SKETCH_CONFIG, then the embedded sketch.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of animation frames to run
    #[arg(short, long, default_value_t = 1200)]
    frames: u64,

    /// RNG seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames per second of the scheduler
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Re-compress written PNGs with oxipng
    #[arg(long)]
    optimize: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sketch, writing a PNG whenever a filter is applied
    Run {
        #[command(flatten)]
        sketch: SketchArgs,

        /// Directory for frame-NNNNN.png and final.png
        #[arg(short, long, default_value = "frames")]
        output_dir: PathBuf,

        /// Only write every Nth applied filter
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,

        /// Pace frames in real time instead of running flat out
        #[arg(long)]
        realtime: bool,
    },
    /// Run the sketch and write only the final frame
    Render {
        #[command(flatten)]
        sketch: SketchArgs,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show which palette color each input color maps to
    Match {
        /// Colors as hex (e.g. "#1d2b53" or "f00")
        #[arg(required = true)]
        colors: Vec<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the configured palette with matcher weights
    Palette {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Extract the embedded sketch.yaml for customization
    Init {
        /// Target path (defaults to SKETCH_CONFIG, then ./sketch.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kernelsketch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Run {
            sketch,
            output_dir,
            every,
            realtime,
        }) => run_sketch_command(sketch, &output_dir, every, realtime).await,
        Some(Commands::Render { sketch, output }) => run_render_command(sketch, &output).await,
        Some(Commands::Match { colors, config }) => run_match_command(&colors, config),
        Some(Commands::Palette { config, json }) => run_palette_command(config, json),
        Some(Commands::Init { config, force }) => run_init_command(config, force),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn load_config(path: Option<PathBuf>, seed: Option<u64>) -> AppConfig {
    let loader = AssetLoader::from_env(path);
    let mut config = AppConfig::load_from_assets(&loader);
    if seed.is_some() {
        config.seed = seed;
    }
    config
}

/// Run the animation and write frames as filters are applied
async fn run_sketch_command(
    args: SketchArgs,
    output_dir: &Path,
    every: u64,
    realtime: bool,
) -> anyhow::Result<()> {
    let config = load_config(args.config, args.seed);
    let sketch = Sketch::new(&config)?;
    let palette = sketch.palette().clone();
    let options = PngOptions {
        scale: config.canvas.scale,
        optimize: args.optimize,
    };

    std::fs::create_dir_all(output_dir)?;
    let written = Rc::new(Cell::new(0u64));

    let mut animation = Animation::new(sketch, args.fps);
    {
        let dir = output_dir.to_path_buf();
        let palette = palette.clone();
        let written = written.clone();
        let mut applied_count = 0u64;
        animation.on_draw(move |sketch, frame| {
            if let Some(applied) = sketch.draw(frame)? {
                applied_count += 1;
                tracing::info!(filter = %applied, "Applied filter");
                if applied_count % every == 0 {
                    let path = dir.join(format!("frame-{frame:05}.png"));
                    let bytes = encode_frame(sketch.buffer(), Some(&palette), options)?;
                    write_png(&path, &bytes)?;
                    written.set(written.get() + 1);
                }
            }
            Ok(())
        });
    }

    animation.run(args.frames, realtime).await?;

    let sketch = animation.into_sketch();
    let final_path = output_dir.join("final.png");
    let bytes = encode_frame(sketch.buffer(), Some(&palette), options)?;
    write_png(&final_path, &bytes)?;

    println!(
        "Ran {} frames: wrote {} frames plus final.png to {}",
        args.frames,
        written.get(),
        output_dir.display()
    );
    Ok(())
}

/// Run the animation and write only the final frame
async fn run_render_command(args: SketchArgs, output: &Path) -> anyhow::Result<()> {
    let config = load_config(args.config, args.seed);
    let sketch = Sketch::new(&config)?;
    let options = PngOptions {
        scale: config.canvas.scale,
        optimize: args.optimize,
    };

    let mut animation = Animation::new(sketch, args.fps);
    animation.on_draw(|sketch, frame| {
        if let Some(applied) = sketch.draw(frame)? {
            tracing::debug!(filter = %applied, "Applied filter");
        }
        Ok(())
    });
    animation.run(args.frames, false).await?;

    let sketch = animation.into_sketch();
    let bytes = encode_frame(sketch.buffer(), Some(sketch.palette()), options)?;
    write_png(output, &bytes)?;
    println!("Rendered {} ({} bytes)", output.display(), bytes.len());

    Ok(())
}

/// Print `#in -> #out` for each color
fn run_match_command(colors: &[String], config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config, None);
    let sketch = Sketch::new(&config)?;

    for hex in colors {
        let (input, output) = sketch
            .test_color(hex)
            .map_err(|e| anyhow::anyhow!("Invalid color '{hex}': {e}"))?;
        let name = config
            .palette
            .iter()
            .find(|c| c.rgb().ok() == Some(output))
            .map(|c| c.camel_name())
            .unwrap_or_default();
        println!("{input} -> {output}  {name}");
    }

    Ok(())
}

#[derive(Serialize)]
struct PaletteEntry {
    name: String,
    camel_name: String,
    color: String,
    /// Matcher weight; absent for repeated entries
    weight: Option<f64>,
}

/// List named colors, unique count and matcher weights
fn run_palette_command(config: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    use palette_convolve::WeightedMatcher;

    let config = load_config(config, None);
    config.validate()?;
    let palette = config.unique_palette()?;
    let matcher = WeightedMatcher::new(palette.clone());

    let mut seen = Vec::new();
    let mut entries = Vec::with_capacity(config.palette.len());
    for named in &config.palette {
        let rgb = named.rgb()?;
        let weight = if seen.contains(&rgb) {
            None
        } else {
            seen.push(rgb);
            palette
                .colors()
                .iter()
                .position(|&c| c == rgb)
                .map(|i| matcher.weights()[i])
        };
        entries.push(PaletteEntry {
            name: named.name.clone(),
            camel_name: named.camel_name(),
            color: rgb.to_hex(),
            weight,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "Palette: {} colors ({} unique)\n",
        entries.len(),
        palette.len()
    );
    for entry in &entries {
        let weight = entry
            .weight
            .map(|w| format!("{w:.3}"))
            .unwrap_or_else(|| "(repeat)".to_string());
        println!("  {:<14} {}  {}", entry.camel_name, entry.color, weight);
    }

    Ok(())
}

/// Extract the embedded config to the filesystem
fn run_init_command(config: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env(config);
    let report = loader.init(force)?;

    for f in &report.written {
        println!("  + {f}");
    }
    for f in &report.skipped {
        println!("  - {f} exists (use --force to overwrite)");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_env = std::env::var("SKETCH_CONFIG").ok();
    let loader = AssetLoader::from_env(None);
    let config = AppConfig::load_from_assets(&loader);

    println!("Kernelsketch v{VERSION}");
    println!("Generative pixel art from repeated palette-quantized convolution\n");

    println!("Environment Variables:");
    println!(
        "  SKETCH_CONFIG = {}",
        config_env.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG      = {}",
        std::env::var("RUST_LOG").as_deref().unwrap_or("(not set)")
    );

    println!("\nConfiguration:");
    println!("  Source:   {}", loader.config_source());
    println!(
        "  Canvas:   {}x{} (x{})",
        config.canvas.width, config.canvas.height, config.canvas.scale
    );
    match config.unique_palette() {
        Ok(palette) => println!(
            "  Palette:  {} colors ({} unique)",
            config.palette.len(),
            palette.len()
        ),
        Err(e) => println!("  Palette:  invalid ({e})"),
    }
    println!(
        "  Seed:     {}",
        config
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string())
    );

    println!("\nRun 'kernelsketch --help' for commands.");
}
