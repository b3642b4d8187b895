mod cli;
mod output;
mod session;
mod source;

use anyhow::Context;
use autopager_core::PagerConfig;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, OutputFormat, RunArgs};
use session::{Session, SessionReport};
use source::SimulatedSource;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("AUTOPAGER_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "autopager",
                &mut std::io::stdout(),
            );
        }
        None => {
            let format = cli.run.format;
            let report = match run(cli.run).await {
                Ok(report) => report,
                Err(e) => output::output_error(&format!("{:#}", e)),
            };
            match format {
                OutputFormat::Json => output::output_success(report)?,
                OutputFormat::Text => output::output_text(&report),
            }
        }
    }

    Ok(())
}

fn load_config(args: &RunArgs) -> anyhow::Result<PagerConfig> {
    let mut config = match &args.config {
        Some(path) => PagerConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PagerConfig::load(),
    };

    if let Some(zone_size) = args.zone_size {
        config = config.with_zone_size(zone_size);
    }
    if let Some(fill_slack) = args.fill_slack {
        config = config.with_fill_slack(fill_slack);
    }
    if let Some(initial_page) = args.initial_page {
        config = config.with_initial_page(initial_page);
    }

    Ok(config)
}

async fn run(args: RunArgs) -> anyhow::Result<SessionReport> {
    let config = load_config(&args)?;
    tracing::debug!("Running with {:?}", config);

    let source = SimulatedSource::new(args.pages, args.page_size)
        .with_latency(Duration::from_millis(args.latency_ms))
        .with_failing_pages(args.failing_pages.iter().copied());

    let mut session = Session::new(
        config,
        source,
        args.height,
        Duration::from_millis(args.timeout_ms),
    )?;
    session.start().await?;
    for step in &args.steps {
        session.apply(*step).await?;
    }

    Ok(session.report())
}
