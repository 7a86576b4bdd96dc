#![deny(unsafe_code)]
//! CLI binary for the motif pattern generator.
//!
//! Subcommands:
//! - `render`: render one frame to PNG or SVG
//! - `frames`: render one animation loop as numbered PNG frames
//! - `shapes`: print a layer's generated shape list
//! - `list`: print available styles, palettes and compositions

mod error;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use error::CliError;
use motif_core::{AppState, AspectRatio, CompositionType, FrameSpec, LayerConfig, MotifError, Palette, Style};
use motif_render::export::{ExportEvent, ExportJob, ExportWorker};
use motif_render::text::TextRenderer;
use motif_render::{snapshot, FrameRequest, GrainTexture, ImageStore, RasterRenderer, SvgRenderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "motif", about = "Seamless procedural pattern renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where the document comes from and how big the canvas is.
#[derive(Args)]
struct SceneArgs {
    /// JSON document (an `AppState`). When absent a one-layer document is
    /// built from the flags below.
    #[arg(long)]
    state: Option<PathBuf>,

    /// PRNG seed. Reseeds every layer of a loaded document.
    #[arg(long)]
    seed: Option<u64>,

    /// Style name (see `motif list`).
    #[arg(long, default_value = "scatter")]
    style: String,

    /// Palette name.
    #[arg(short, long, default_value = "ocean")]
    palette: String,

    /// Number of shapes for scatter-family styles.
    #[arg(short, long, default_value_t = 40)]
    complexity: u32,

    /// Aspect ratio (1:1, 16:9, 9:16, 4:5, 3:4).
    #[arg(long, default_value = "1:1")]
    aspect: String,

    /// Length of the longer canvas side in pixels.
    #[arg(long, default_value_t = 1024)]
    size: u32,

    /// Canvas width in pixels; overrides the aspect-derived width.
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Canvas height in pixels; overrides the aspect-derived height.
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Image asset as `id=path`; may be repeated.
    #[arg(long = "image")]
    images: Vec<String>,

    /// Extra directory of font files.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Leave every layer background transparent.
    #[arg(long)]
    transparent: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Format {
    Png,
    Svg,
}

#[derive(Subcommand)]
enum Command {
    /// Render one frame.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Animation time in milliseconds.
        #[arg(short, long, default_value_t = 0)]
        time_ms: u64,

        /// Output format; inferred from the output extension when absent.
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Output file path.
        #[arg(short, long, default_value = "motif.png")]
        output: PathBuf,
    },
    /// Render one animation loop as a numbered PNG sequence.
    Frames {
        #[command(flatten)]
        scene: SceneArgs,

        /// Frames per second; defaults to the active layer's setting.
        #[arg(long)]
        fps: Option<u32>,

        /// Loop length in seconds; defaults to the active layer's setting.
        #[arg(long)]
        duration: Option<f64>,

        /// Output directory.
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// Print the shape list of a layer after overrides.
    Shapes {
        #[command(flatten)]
        scene: SceneArgs,

        /// Layer id; defaults to the active layer.
        #[arg(long)]
        layer: Option<String>,
    },
    /// List available styles, palettes, compositions and aspect ratios.
    List,
}

/// A loaded document plus everything needed to draw it.
struct Scene {
    state: AppState,
    images: ImageStore,
    text: TextRenderer,
    width: u32,
    height: u32,
    transparent: bool,
}

impl Scene {
    fn grain(&self) -> Result<Option<GrainTexture>, CliError> {
        let textured = self.state.layers().iter().find(|l| l.config().texture > 0.0);
        match textured {
            Some(layer) => Ok(Some(GrainTexture::generate(
                GrainTexture::DEFAULT_SIZE,
                layer.config().seed,
            )?)),
            None => Ok(None),
        }
    }
}

fn parse_style(name: &str) -> Style {
    let style = serde_json::from_value(serde_json::Value::String(name.to_string())).unwrap_or(Style::Unknown);
    if style == Style::Unknown {
        tracing::warn!(style = name, "unknown style, generating as scatter");
    }
    style
}

fn parse_image_arg(arg: &str) -> Result<(String, PathBuf), CliError> {
    match arg.split_once('=') {
        Some((id, path)) if !id.trim().is_empty() && !path.trim().is_empty() => {
            Ok((id.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(CliError::Input(format!("invalid --image {arg:?}, expected id=path"))),
    }
}

fn output_format(explicit: Option<Format>, output: &Path) -> Format {
    explicit.unwrap_or_else(|| {
        let svg = output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if svg {
            Format::Svg
        } else {
            Format::Png
        }
    })
}

fn load_state(args: &SceneArgs, image_ids: &[String]) -> Result<AppState, CliError> {
    let aspect = AspectRatio::parse(&args.aspect)
        .ok_or_else(|| CliError::Input(format!("unknown aspect ratio: {}", args.aspect)))?;

    if let Some(path) = &args.state {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("read {}: {e}", path.display())))?;
        let state: AppState = serde_json::from_str(&text)
            .map_err(|e| CliError::Input(format!("invalid state document: {e}")))?;
        return Ok(match args.seed {
            Some(seed) => state.reseeded(seed),
            None => state,
        });
    }

    let config = LayerConfig {
        seed: args.seed.unwrap_or(42),
        style: parse_style(&args.style),
        palette: Palette::from_name(&args.palette)?,
        complexity: args.complexity,
        images: image_ids.to_vec(),
        ..LayerConfig::default()
    };
    let mut state = AppState::single(config);
    state.set_aspect_ratio(aspect);
    Ok(state)
}

fn load_scene(args: &SceneArgs) -> Result<Scene, CliError> {
    let mut images = ImageStore::new();
    let mut ids = Vec::with_capacity(args.images.len());
    for arg in &args.images {
        let (id, path) = parse_image_arg(arg)?;
        images.load(id.clone(), &path)?;
        ids.push(id);
    }

    let state = load_state(args, &ids)?;

    let mut text = TextRenderer::new();
    if let Some(dir) = &args.fonts {
        let faces = text.load_font_dir(dir);
        tracing::debug!(faces, dir = %dir.display(), "loaded fonts");
    }

    let (aw, ah) = state.aspect_ratio().dimensions(args.size);
    let (width, height) = (args.width.unwrap_or(aw), args.height.unwrap_or(ah));
    FrameSpec::new(width, height).validate()?;

    Ok(Scene {
        state,
        images,
        text,
        width,
        height,
        transparent: args.transparent,
    })
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render(scene: Scene, time_ms: u64, format: Format, output: &Path, json: bool) -> Result<(), CliError> {
    let grain = scene.grain()?;
    let drawn = match format {
        Format::Png => {
            let spec = FrameSpec::new(scene.width, scene.height)
                .at(time_ms)
                .with_transparent_background(scene.transparent);
            let (pixmap, log) = RasterRenderer::with_text(scene.text).render_frame(
                &scene.state,
                &scene.images,
                grain.as_ref(),
                &spec,
            )?;
            snapshot::write_png(&pixmap, output)?;
            log.len()
        }
        Format::Svg => {
            let mut request = FrameRequest::new(&scene.state, &scene.images)
                .at(time_ms)
                .with_transparent_background(scene.transparent);
            if let Some(g) = &grain {
                request = request.with_grain(g);
            }
            let doc = SvgRenderer::with_text(scene.text).render(scene.width, scene.height, &request)?;
            snapshot::write_svg(&doc, output)?;
            doc.log.len()
        }
    };

    if json {
        print_json(&serde_json::json!({
            "output": output.display().to_string(),
            "format": if format == Format::Svg { "svg" } else { "png" },
            "width": scene.width,
            "height": scene.height,
            "time_ms": time_ms,
            "layers": scene.state.visible_layers().count(),
            "shapes_drawn": drawn,
        }))?;
    } else {
        eprintln!(
            "rendered {}x{} at {time_ms} ms ({drawn} shapes) -> {}",
            scene.width,
            scene.height,
            output.display()
        );
    }
    Ok(())
}

fn frames(scene: Scene, fps: Option<u32>, duration: Option<f64>, out_dir: &Path, json: bool) -> Result<(), CliError> {
    std::fs::create_dir_all(out_dir).map_err(|e| CliError::Io(format!("create {}: {e}", out_dir.display())))?;

    let grain = scene.grain()?;
    let mut job = ExportJob::new(&scene.state, scene.images, scene.width, scene.height)?
        .with_transparent_background(scene.transparent);
    let (job_fps, job_duration) = (fps.unwrap_or(job.fps), duration.unwrap_or(job.duration));
    job = job.with_timing(job_fps, job_duration);
    if let Some(g) = grain {
        job = job.with_grain(g);
    }
    let (fps, duration) = (job.fps, job.duration);

    let worker = ExportWorker::spawn(job, RasterRenderer::with_text(scene.text))?;
    let mut written = 0u32;
    while let Some(event) = worker.recv() {
        match event {
            ExportEvent::Started { total } => tracing::info!(total, "export started"),
            ExportEvent::Frame { index, pixmap } => {
                let path = out_dir.join(format!("frame-{index:05}.png"));
                if let Err(e) = snapshot::write_png(&pixmap, &path) {
                    worker.terminate();
                    return Err(e.into());
                }
                written += 1;
            }
            ExportEvent::Progress { done, total } => tracing::debug!(done, total, "frame written"),
            ExportEvent::Finished { frames } => tracing::info!(frames, "export finished"),
            ExportEvent::Failed { message } => {
                return Err(CliError::Render(MotifError::Export(message)));
            }
        }
    }
    worker.join()?;

    if json {
        print_json(&serde_json::json!({
            "out_dir": out_dir.display().to_string(),
            "frames": written,
            "fps": fps,
            "duration": duration,
            "width": scene.width,
            "height": scene.height,
        }))?;
    } else {
        eprintln!(
            "wrote {written} frames ({}x{}, {fps} fps, {duration} s) -> {}",
            scene.width,
            scene.height,
            out_dir.display()
        );
    }
    Ok(())
}

fn shapes(scene: Scene, layer: Option<String>, json: bool) -> Result<(), CliError> {
    let layer = match layer {
        Some(id) => scene.state.layer(&id)?,
        None => scene
            .state
            .active_layer()
            .or_else(|| scene.state.layers().first())
            .ok_or_else(|| CliError::Input("document has no layers".into()))?,
    };
    let list = motif_render::scene::layer_shapes(
        layer,
        f64::from(scene.width),
        f64::from(scene.height),
        None,
        &scene.text,
    )?;

    if json {
        print_json(&serde_json::json!({
            "layer": layer.id(),
            "width": scene.width,
            "height": scene.height,
            "shapes": list,
        }))?;
    } else {
        for s in &list {
            println!(
                "{:>4}  {:<14} x={:>8.2} y={:>8.2} size={:>7.2} rot={:>7.2} {}",
                s.index,
                s.kind.tag(),
                s.position.x,
                s.position.y,
                s.size,
                s.rotation,
                s.color.to_hex()
            );
        }
    }
    Ok(())
}

fn list(json: bool) -> Result<(), CliError> {
    let styles = motif_styles::list_styles();
    let palettes = Palette::list_names();
    let compositions: Vec<serde_json::Value> = CompositionType::ALL
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;
    let aspects: Vec<&str> = AspectRatio::ALL.iter().map(|a| a.label()).collect();

    if json {
        print_json(&serde_json::json!({
            "styles": styles,
            "palettes": palettes,
            "compositions": compositions,
            "aspect_ratios": aspects,
        }))?;
    } else {
        println!("Styles:");
        for name in &styles {
            println!("  {name}");
        }
        println!("Palettes:");
        println!("  {}", palettes.join(", "));
        println!("Compositions:");
        let names: Vec<&str> = compositions.iter().filter_map(|c| c.as_str()).collect();
        println!("  {}", names.join(", "));
        println!("Aspect ratios:");
        println!("  {}", aspects.join(", "));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => list(cli.json),
        Command::Render {
            scene,
            time_ms,
            format,
            output,
        } => {
            let format = output_format(format, &output);
            render(load_scene(&scene)?, time_ms, format, &output, cli.json)
        }
        Command::Frames {
            scene,
            fps,
            duration,
            out_dir,
        } => frames(load_scene(&scene)?, fps, duration, &out_dir, cli.json),
        Command::Shapes { scene, layer } => shapes(load_scene(&scene)?, layer, cli.json),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
