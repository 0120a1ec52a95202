mod app;
mod cli;
mod error;
mod interactive;
mod report;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use convertino_core::{
    load_config, validate_config, AudioCodec, Config, Encoding, ReportFormat, StandardCodec,
};

use app::App;
use cli::Cli;
use error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging on stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => Config::default(),
    };
    validate_config(&config).context("Configuration validation failed")?;
    debug!(?config, "Configuration ready");

    let format = if cli.json {
        ReportFormat::Json
    } else {
        config.output.report_format
    };

    let codec = Arc::new(StandardCodec::new(config.codec.clone()));
    if cli.encoding == Some(Encoding::Mp3) {
        // Not fatal: every mp3 output will report the failure on its own
        if let Err(e) = codec.validate().await {
            warn!(error = %e, "MP3 encoder unavailable");
        }
    }

    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    App::new(codec, format)
        .run(&cli.file, cli.encoding, &mut stdin, &mut stdout, &mut stderr)
        .await?;

    Ok(())
}
