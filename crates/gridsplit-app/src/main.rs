#![warn(missing_docs)]
//! # gridsplit binary
//!
//! Command-line entry point: split one image into a printable multi-page
//! poster PDF.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use gridsplit_app::{
    AppError, ExportOutcome, SettingsOverrides, apply_overrides, export_poster, load_image,
    load_settings_file, log_filter_from_env, preview_svg, user_facing_message,
};
use gridsplit_core::{LayoutSettings, Orientation, PageFormat};
use gridsplit_decode::FileImageLoader;
use gridsplit_document::{DirectorySink, current_timestamp_ms};
use gridsplit_ui::{ControlState, parse_grid_input};
use tracing_subscriber::EnvFilter;

/// Split an image into a grid of full-page tiles for poster printing.
#[derive(Parser, Debug)]
#[command(name = "gridsplit", version = gridsplit_app::APP_VERSION)]
struct Args {
    /// Source image (PNG, JPEG, GIF, BMP or WebP).
    input: PathBuf,
    /// Paper format: A4, A3 or Letter.
    #[arg(long, value_parser = parse_page_format)]
    page_size: Option<PageFormat>,
    /// Page orientation: portrait or landscape.
    #[arg(long, value_parser = parse_orientation)]
    orientation: Option<Orientation>,
    /// Number of columns (1-20).
    #[arg(long, value_parser = parse_grid_value, allow_hyphen_values = true)]
    columns: Option<u32>,
    /// Number of rows (1-20); only honoured together with --no-aspect-lock.
    #[arg(long, value_parser = parse_grid_value, allow_hyphen_values = true)]
    rows: Option<u32>,
    /// Keep rows as given instead of deriving them from the page shape.
    #[arg(long)]
    no_aspect_lock: bool,
    /// JSON settings file providing defaults for the options above.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory receiving the generated PDF.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// Also write the cut-guide overlay as SVG to this path.
    #[arg(long)]
    preview: Option<PathBuf>,
    /// Print the grid plan and exit without rendering.
    #[arg(long)]
    plan_only: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = init_logging() {
        eprintln!("gridsplit: {error:#}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<AppError>() {
                Some(app_error) => {
                    tracing::error!(error = %app_error, "poster generation failed");
                    eprintln!("{}", user_facing_message(app_error));
                }
                None => eprintln!("gridsplit: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> anyhow::Result<()> {
    let filter = log_filter_from_env();
    let env_filter =
        EnvFilter::try_new(&filter).with_context(|| format!("invalid log filter '{filter}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => load_settings_file(path)?,
        None => LayoutSettings::default(),
    };
    let mut state = ControlState::with_settings(settings);

    apply_overrides(
        &mut state,
        SettingsOverrides {
            page_format: args.page_size,
            orientation: args.orientation,
            columns: args.columns,
            rows: args.rows,
            maintain_aspect_ratio: args.no_aspect_lock.then_some(false),
        },
    );

    load_image(&mut state, &FileImageLoader::new(&args.input))?;

    let settings = state.settings();
    let page = settings.page_dimensions();
    println!(
        "grid {} rows x {} columns = {} sheets of {} {} ({} x {} mm)",
        settings.grid.rows(),
        settings.grid.columns(),
        state.total_sheets(),
        settings.page_format,
        settings.orientation,
        page.width_mm,
        page.height_mm
    );

    if let Some(path) = &args.preview {
        let svg = preview_svg(&state).context("no image loaded for preview")?;
        std::fs::write(path, svg)
            .with_context(|| format!("failed to write preview '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "preview written");
    }

    if args.plan_only {
        return Ok(());
    }

    let sink = DirectorySink::new(&args.output_dir);
    match export_poster(&mut state, &sink, current_timestamp_ms())? {
        ExportOutcome::Saved(report) => {
            let location = report
                .saved
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or(report.saved.file_name);
            println!("{location}");
            Ok(())
        }
        ExportOutcome::Skipped(reason) => bail!("export skipped: {reason:?}"),
    }
}

fn parse_page_format(raw: &str) -> Result<PageFormat, String> {
    raw.parse().map_err(|error: gridsplit_core::CoreError| error.to_string())
}

fn parse_orientation(raw: &str) -> Result<Orientation, String> {
    raw.parse().map_err(|error: gridsplit_core::CoreError| error.to_string())
}

fn parse_grid_value(raw: &str) -> Result<u32, String> {
    Ok(parse_grid_input(raw))
}
