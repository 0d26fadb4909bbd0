//! Governorate heatmap command-line front end.
//!
//! Drives the view state engine against headless collaborators: builds share
//! links and summaries, and runs PNG exports from a pre-rendered capture.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use heatmap_app::headless::{
    DirectorySink, FileClipboard, HeadlessSurface, ImageFileCapture, SurfaceLayout,
};
use heatmap_app::surface::RenderingSurface;
use heatmap_app::{AppConfig, Dispatcher, ExportPipeline, Toggle, ViewEvent, ViewState};
use heatmap_common::{BoundaryDataset, ExportPreset, LabelMode, Palette, Region};
use renderer::legend::format_number;
use renderer::Legend;

#[derive(Parser, Debug)]
#[command(name = "heatmap")]
#[command(about = "Syria governorate heatmap: share links and PNG export")]
struct Args {
    /// YAML configuration file (default: HEATMAP_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

/// View options shared by every subcommand.
#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// Start from an existing share link or query string
    #[arg(long)]
    link: Option<String>,

    /// Set a region value, e.g. --set "Dar'a=42.5" (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    set: Vec<(Region, f64)>,

    #[arg(long)]
    palette: Option<Palette>,

    /// en, ar or both
    #[arg(long, value_parser = parse_label_mode)]
    label_mode: Option<LabelMode>,

    #[arg(long)]
    show_names: Option<bool>,

    #[arg(long)]
    show_values: Option<bool>,

    /// map_only, map_legend or map_legend_meta
    #[arg(long, value_parser = parse_preset)]
    preset: Option<ExportPreset>,

    /// GeoJSON boundary dataset used for label placement
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the share link and a JSON summary of the view
    Link {
        #[command(flatten)]
        view: ViewArgs,

        /// Also write the link to this file
        #[arg(long)]
        copy_to: Option<PathBuf>,
    },
    /// Export the view as a PNG from a pre-rendered capture
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// PNG rendering of the map wrapper element
        #[arg(long)]
        capture: PathBuf,

        /// JSON file with wrapper/map/legend bounds
        #[arg(long)]
        layout: PathBuf,

        #[arg(long)]
        device_pixel_ratio: Option<f64>,

        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    dotenvy::dotenv().ok();
    let config = match &args.config {
        Some(path) => AppConfig::from_yaml(path)?,
        None => AppConfig::from_env()?,
    };
    info!(?config, "Loaded configuration");

    match args.command {
        Command::Link { view, copy_to } => run_link(&config, view, copy_to).await,
        Command::Export {
            view,
            capture,
            layout,
            device_pixel_ratio,
            output_dir,
        } => {
            let mut config = config;
            if let Some(dpr) = device_pixel_ratio {
                config.device_pixel_ratio = dpr;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            run_export(&config, view, capture, layout).await
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

async fn run_link(config: &AppConfig, view: ViewArgs, copy_to: Option<PathBuf>) -> Result<()> {
    let surface = Arc::new(HeadlessSurface::default());
    let pipeline = ExportPipeline::new(None, Arc::new(DirectorySink::new(&config.output_dir)), 1.0);
    let mut dispatcher = build_dispatcher(config, &view, surface.clone(), pipeline)?;
    if let Some(path) = copy_to {
        dispatcher = dispatcher.with_clipboard(Arc::new(FileClipboard::new(path)));
    }

    dispatcher.initialize();
    apply_view_args(&mut dispatcher, &view).await?;
    dispatcher.dispatch(ViewEvent::ShareLinkRequested).await?;

    println!("{}", dispatcher.share_link());
    println!("{}", serde_json::to_string_pretty(&summary(&dispatcher, &surface))?);
    Ok(())
}

async fn run_export(
    config: &AppConfig,
    view: ViewArgs,
    capture: PathBuf,
    layout: PathBuf,
) -> Result<()> {
    let layout = SurfaceLayout::from_file(&layout)
        .with_context(|| format!("loading layout {}", layout.display()))?;
    let surface = Arc::new(HeadlessSurface::new(layout));
    let pipeline = ExportPipeline::new(
        Some(Arc::new(ImageFileCapture::new(capture))),
        Arc::new(DirectorySink::new(&config.output_dir)),
        config.device_pixel_ratio,
    )
    .with_font(config.load_font()?);

    let mut dispatcher = build_dispatcher(config, &view, surface, pipeline)?;
    dispatcher.initialize();
    apply_view_args(&mut dispatcher, &view).await?;

    if let Err(e) = dispatcher.dispatch(ViewEvent::ExportRequested).await {
        bail!("{} ({})", dispatcher.status().text(), e);
    }

    let artifact = dispatcher
        .export_pipeline()
        .last_artifact()
        .context("export finished without an artifact")?;
    println!("{}", serde_json::to_string_pretty(artifact)?);
    Ok(())
}

fn build_dispatcher(
    config: &AppConfig,
    view: &ViewArgs,
    surface: Arc<HeadlessSurface>,
    pipeline: ExportPipeline,
) -> Result<Dispatcher> {
    let state = ViewState::from_link(view.link.as_deref().unwrap_or_default());
    let dataset = view
        .dataset
        .as_ref()
        .map(|path| BoundaryDataset::from_file(path))
        .transpose()
        .context("loading boundary dataset")?;
    let surface: Arc<dyn RenderingSurface> = surface;
    Ok(Dispatcher::new(
        state,
        surface,
        dataset,
        pipeline,
        config.base_url.clone(),
    ))
}

async fn apply_view_args(dispatcher: &mut Dispatcher, view: &ViewArgs) -> Result<()> {
    let mut events = Vec::new();
    events.extend(view.palette.map(ViewEvent::PaletteChanged));
    events.extend(view.label_mode.map(ViewEvent::LabelModeChanged));
    events.extend(view.preset.map(ViewEvent::ExportPresetChanged));
    events.extend(view.show_names.map(|on| ViewEvent::ToggleChanged {
        toggle: Toggle::ShowNames,
        on,
    }));
    events.extend(view.show_values.map(|on| ViewEvent::ToggleChanged {
        toggle: Toggle::ShowValues,
        on,
    }));
    events.extend(
        view.set
            .iter()
            .map(|(region, value)| ViewEvent::ValueChanged {
                region: *region,
                value: *value,
            }),
    );
    events.push(ViewEvent::Apply);

    for event in events {
        dispatcher.dispatch(event).await?;
    }
    Ok(())
}

fn summary(dispatcher: &Dispatcher, surface: &HeadlessSurface) -> serde_json::Value {
    let config = dispatcher.state().config();
    let fills: Vec<_> = config
        .values
        .iter()
        .map(|(region, value)| {
            serde_json::json!({
                "region": region.key(),
                "value": value,
                "fill": surface.fill(region).map(|c| c.to_hex()),
                "tooltip": surface.tooltip(region),
            })
        })
        .collect();
    let labels: Vec<_> = surface
        .labels()
        .iter()
        .map(|placed| {
            serde_json::json!({
                "region": placed.label.region.key(),
                "lat": placed.anchor.lat,
                "lng": placed.anchor.lng,
                "html": placed.label.to_html(),
            })
        })
        .collect();
    let legend = surface
        .legend()
        .unwrap_or_else(|| Legend::build(&config.values, config.palette));

    serde_json::json!({
        "link": dispatcher.share_link(),
        "config": config,
        "fills": fills,
        "legend": {
            "range": legend.range_label(),
            "ticks": legend.ticks.iter().map(|t| format_number(*t)).collect::<Vec<_>>(),
            "gradient": legend.css_gradient(),
        },
        "labels": labels,
        "status": dispatcher.status().current(),
        "updated": dispatcher.state().last_updated_label(),
    })
}

fn parse_assignment(s: &str) -> Result<(Region, f64), String> {
    let (key, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected REGION=VALUE, got '{}'", s))?;
    let region = Region::from_key(key.trim())
        .ok_or_else(|| format!("unknown region '{}'", key.trim()))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for {}: {}", region, e))?;
    Ok((region, value))
}

fn parse_label_mode(s: &str) -> Result<LabelMode, String> {
    LabelMode::from_token(s).ok_or_else(|| format!("unknown label mode '{}'", s))
}

fn parse_preset(s: &str) -> Result<ExportPreset, String> {
    ExportPreset::from_token(s).ok_or_else(|| format!("unknown export preset '{}'", s))
}
