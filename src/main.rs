use anyhow::Context;
use clap::Parser;
use contrast_enhance::preprocessing::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[derive(Parser, Debug)]
#[command(name = "contrast-enhance")]
#[command(about = "Compare global histogram equalization and CLAHE on an image")]
#[command(version)]
pub struct Args {
    /// Input image path
    pub input: PathBuf,

    /// Directory for the output images and report
    #[arg(long, short, env = "CONTRAST_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Degradation applied before enhancement (original, dark, low_contrast)
    #[arg(long, env = "CONTRAST_MODE", default_value = "original")]
    pub mode: String,

    /// Number of CLAHE tile rows
    #[arg(long, env = "CONTRAST_TILE_ROWS", default_value = "8")]
    pub tile_rows: u32,

    /// Number of CLAHE tile columns
    #[arg(long, env = "CONTRAST_TILE_COLS", default_value = "8")]
    pub tile_cols: u32,

    /// CLAHE clip limit as a multiple of the mean histogram bin
    #[arg(long, env = "CONTRAST_CLIP_LIMIT", default_value = "2.0")]
    pub clip_limit: f64,

    /// Absolute per-bin clip count (overrides --clip-limit)
    #[arg(long, env = "CONTRAST_CLIP_COUNT")]
    pub clip_count: Option<u32>,

    /// Skip writing report.json
    #[arg(long)]
    pub no_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::Config::try_from(args)?;

    tracing::info!("Starting contrast-enhance v{}", env!("CARGO_PKG_VERSION"));
    run(config)
}

fn run(config: config::Config) -> anyhow::Result<()> {
    let image = image::open(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;
    tracing::info!(
        "Loaded {} ({}x{}), mode: {}",
        config.input.display(),
        image.width(),
        image.height(),
        config.mode.as_str()
    );

    let report = Pipeline::new(config.mode, config.clahe).process(image)?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create {}", config.output_dir.display())
    })?;

    for path in report.images.save(&config.output_dir)? {
        tracing::info!("Wrote {}", path.display());
    }

    if config.write_report {
        let path = config.output_dir.join("report.json");
        report.write_json(&path)?;
        tracing::info!("Wrote {}", path.display());
    }

    for step in &report.steps {
        tracing::info!("  {:<12} {}ms", step.name, step.time_ms);
    }
    tracing::info!("Enhancement completed in {}ms", report.total_time_ms);

    Ok(())
}
