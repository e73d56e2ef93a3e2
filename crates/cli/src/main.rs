use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use maskfx_core::compositing::infrastructure::compositor_factory::{
    create_compositor, CompositeMode,
};
use maskfx_core::masking::domain::mask_normalizer::MaskNormalizer;
use maskfx_core::pipeline::export_video_use_case::{
    default_sequence_output, sequence_frames, ExportVideoUseCase,
};
use maskfx_core::pipeline::mask_batch_use_case::MaskBatchUseCase;
use maskfx_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use maskfx_core::pipeline::rescale_images_use_case::{default_output_dir, RescaleImagesUseCase};
use maskfx_core::pipeline::workspace::{list_image_files, timestamp, WorkspaceLayout};
use maskfx_core::shared::constants::{
    BATCH_PROGRESS_EVERY, COMPOSE_PROGRESS_EVERY, DEFAULT_BLUR_STRENGTH, DEFAULT_COMPOSE_FPS,
    DEFAULT_EXPORT_FPS, DEFAULT_FILL_COLOR, DEFAULT_GREEN, DEFAULT_MOSAIC_SIZE,
    DEFAULT_RESCALE_FACTOR, DEFAULT_WORKSPACE_ROOT, EXPORT_PROGRESS_EVERY, FRAME_EXTENSIONS,
};
use maskfx_core::shared::effect_params::{EffectParams, MaskParams, MosaicEffect};
use maskfx_core::shared::fill_color::parse_color_or;
use maskfx_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use maskfx_core::video::infrastructure::image_file_reader::ImageFileReader;
use maskfx_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Masked-region mosaic and green-screen compositing for frame sequences.
#[derive(Parser)]
#[command(name = "maskfx", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Obscure the masked region of every frame.
    Mosaic(MosaicArgs),
    /// Keep the masked subject, replace everything else with a flat color.
    Greenback(GreenbackArgs),
    /// Encode a directory of PNG frames into an MP4.
    Compose(ComposeArgs),
    /// Scale every image in a directory by one factor.
    Resize(ResizeArgs),
}

#[derive(Args)]
struct WorkspaceArgs {
    /// Name of the workspace directory holding images/ and masks/.
    #[arg(long)]
    video_name: String,

    /// Directory containing the named workspaces.
    #[arg(long, default_value = DEFAULT_WORKSPACE_ROOT)]
    workspace_root: PathBuf,

    /// Grow the mask with a square of this side (0 = off).
    #[arg(long, default_value_t = 0)]
    dilate: u32,

    /// Gaussian kernel for mask edge smoothing (0 or even = off).
    #[arg(long, default_value_t = 0)]
    blur: u32,
}

#[derive(Args)]
struct MosaicArgs {
    #[command(flatten)]
    workspace: WorkspaceArgs,

    /// Pixel-block size in source pixels.
    #[arg(long, default_value_t = DEFAULT_MOSAIC_SIZE)]
    mosaic_size: u32,

    /// Effect: pixel, blur, black, color or noise.
    #[arg(long, default_value = "pixel")]
    mosaic_type: String,

    /// Fill color for the `color` effect, as R,G,B.
    #[arg(long, default_value = "0,0,0")]
    color: String,

    /// Gaussian kernel for the `blur` effect (even values are bumped to odd).
    #[arg(long, default_value_t = DEFAULT_BLUR_STRENGTH)]
    blur_strength: u32,

    /// Also encode the processed frames into an MP4.
    #[arg(long)]
    output_video: bool,

    /// Frame rate of the exported video.
    #[arg(long, default_value_t = DEFAULT_EXPORT_FPS)]
    fps: f64,
}

#[derive(Args)]
struct GreenbackArgs {
    #[command(flatten)]
    workspace: WorkspaceArgs,

    /// Background color, as R,G,B.
    #[arg(long, default_value = "0,255,0")]
    green: String,
}

#[derive(Args)]
struct ComposeArgs {
    /// Directory of PNG frames, encoded in file-name order.
    #[arg(long)]
    input_dir: PathBuf,

    /// Output video (default: <input dir name>.mp4).
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_COMPOSE_FPS)]
    fps: f64,
}

#[derive(Args)]
struct ResizeArgs {
    #[arg(long)]
    input_dir: PathBuf,

    /// Scale factor applied to both sides.
    #[arg(long, default_value_t = DEFAULT_RESCALE_FACTOR)]
    scale: f64,

    /// Output directory (default: resized_<scale>x_<timestamp> next to the input).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Mosaic(args) => run_mosaic(args),
        Command::Greenback(args) => run_greenback(args),
        Command::Compose(args) => run_compose(args),
        Command::Resize(args) => run_resize(args),
    }
}

fn run_mosaic(args: MosaicArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_workspace(&args.workspace)?;
    let effect = parse_effect(&args.mosaic_type)?;
    if args.mosaic_size == 0 {
        return Err("Mosaic size must be at least 1".into());
    }
    if args.output_video {
        validate_fps(args.fps)?;
    }

    let params = EffectParams {
        effect,
        block_size: args.mosaic_size,
        blur_strength: args.blur_strength,
        fill_color: parse_color_or(&args.color, DEFAULT_FILL_COLOR),
    };
    let mode = CompositeMode::Mosaic(params);
    let (layout, stamp, output_dir) = run_batch(&args.workspace, mode)?;

    if args.output_video {
        let video = layout.video_path(mode.output_kind(), &stamp);
        if let Err(e) = export_directory(&output_dir, &video, args.fps) {
            log::error!("Video export failed: {e}");
        }
    }
    Ok(())
}

fn run_greenback(args: GreenbackArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_workspace(&args.workspace)?;
    let color = parse_color_or(&args.green, DEFAULT_GREEN);
    run_batch(&args.workspace, CompositeMode::GreenBackground(color))?;
    Ok(())
}

/// Runs one batch into `<base>/<kind>/<stamp>/` and returns where it went.
fn run_batch(
    args: &WorkspaceArgs,
    mode: CompositeMode,
) -> Result<(WorkspaceLayout, String, PathBuf), Box<dyn std::error::Error>> {
    let layout = WorkspaceLayout::resolve(&args.workspace_root, &args.video_name)?;
    let stamp = timestamp();
    let output_dir = layout.output_dir(mode.output_kind(), &stamp);

    let normalizer = MaskNormalizer::new(MaskParams {
        dilate: args.dilate,
        blur_kernel: args.blur,
    });
    let mut use_case = MaskBatchUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        normalizer,
        create_compositor(mode),
        Box::new(StdoutPipelineLogger::new("Compositing", BATCH_PROGRESS_EVERY)),
    );
    let summary = use_case.execute(&layout, &output_dir)?;
    log::info!(
        "Done: {} processed, {} skipped. Output: {}",
        summary.processed,
        summary.skipped.len(),
        summary.output_dir.display()
    );
    Ok((layout, stamp, output_dir))
}

fn export_directory(dir: &Path, video: &Path, fps: f64) -> Result<(), Box<dyn std::error::Error>> {
    let frames = list_image_files(dir, FRAME_EXTENSIONS)?;
    let mut use_case = ExportVideoUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(FfmpegWriter::new()),
        Box::new(StdoutPipelineLogger::new("Encoding", EXPORT_PROGRESS_EVERY)),
    );
    use_case.execute(&frames, fps, video)?;
    Ok(())
}

fn run_compose(args: ComposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_fps(args.fps)?;
    let frames = sequence_frames(&args.input_dir)?;
    let output = args
        .output
        .unwrap_or_else(|| default_sequence_output(&args.input_dir));

    let mut use_case = ExportVideoUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(FfmpegWriter::new()),
        Box::new(StdoutPipelineLogger::new("Encoding", COMPOSE_PROGRESS_EVERY)),
    );
    let summary = use_case.execute(&frames, args.fps, &output)?;
    log::info!(
        "Wrote {} ({} frames, {} skipped)",
        summary.output.display(),
        summary.frames_written,
        summary.skipped.len()
    );
    Ok(())
}

fn run_resize(args: ResizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(args.scale.is_finite() && args.scale > 0.0) {
        return Err(format!("Scale must be positive, got {}", args.scale).into());
    }
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| default_output_dir(&args.input_dir, args.scale, &timestamp()));

    let mut use_case = RescaleImagesUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        Box::new(StdoutPipelineLogger::new("Rescaling", BATCH_PROGRESS_EVERY)),
    );
    let summary = use_case.execute(&args.input_dir, &output_dir, args.scale)?;
    log::info!(
        "Resized {} images ({} skipped) into {}",
        summary.written,
        summary.skipped.len(),
        summary.output_dir.display()
    );
    Ok(())
}

fn validate_workspace(args: &WorkspaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.video_name.trim().is_empty() {
        return Err("Video name must not be empty".into());
    }
    Ok(())
}

fn validate_fps(fps: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("Frame rate must be positive, got {fps}").into());
    }
    Ok(())
}

fn parse_effect(name: &str) -> Result<MosaicEffect, Box<dyn std::error::Error>> {
    name.parse::<MosaicEffect>().map_err(|e| e.into())
}
