// Draft scout entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config (optional path as the first CLI argument)
// 3. Run the full pipeline for the configured season

use std::path::Path;

use anyhow::Context;
use draft_scout::{config, pipeline};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config
    let config = match std::env::args().nth(1) {
        Some(path) => config::load_config_from(Path::new(&path)),
        None => config::load_config(),
    }
    .context("failed to load configuration")?;
    info!(
        "Config loaded: season {}, data in {}, output to {}",
        config.year,
        config.data_dir.display(),
        config.output_dir.display()
    );

    // 3. Run the pipeline
    pipeline::run(&config).context("pipeline run failed")?;
    info!("Pipeline finished");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draft_scout=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
