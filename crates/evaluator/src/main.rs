//! Alarm evaluator binary.
//!
//! Runs one evaluation, or one every `--interval-hours` when given.
//!
//! Usage:
//!   AWS_REGION=us-east-1 GROK_API_KEY=... cargo run -p evaluator --bin alarm-evaluator
//!
//! See `EvaluatorConfig::from_env` for the full list of variables.

use std::sync::Arc;

use alarm_core::TextGenerator;
use clap::Parser;
use evaluator::config::{history_window_days, run_interval};
use evaluator::{
    AlarmMetadataReader, CloudWatchSource, DescriptionSuggester, DisabledGenerator,
    EvaluationJob, EvaluatorConfig, GeneratorBackend, IssueClassifier, ReportAssembler,
};
use grok_generator::GrokGenerator;
use report_store::ReportDatabase;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "alarm-evaluator")]
#[command(about = "Classify CloudWatch alarms and publish the health report")]
struct Args {
    /// AWS region to evaluate. Falls back to AWS_REGION env.
    #[arg(long)]
    region: Option<String>,

    /// Report database URL. Falls back to ALARM_REPORT_DB env.
    #[arg(long)]
    database_url: Option<String>,

    /// State history window in days. Falls back to ALARM_HISTORY_DAYS env.
    #[arg(long)]
    history_days: Option<i64>,

    /// Repeat the evaluation every N hours instead of running once
    #[arg(long)]
    interval_hours: Option<u64>,

    /// Assemble the report without publishing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = EvaluatorConfig::from_env_with_region(args.region.clone())?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    if let Some(days) = args.history_days {
        config.history_window = history_window_days("--history-days", days)?;
    }

    info!("Starting alarm evaluator for region {}", config.region);

    let generator: Arc<dyn TextGenerator> = match config.generator {
        GeneratorBackend::Grok => Arc::new(GrokGenerator::from_env()?),
        GeneratorBackend::None => Arc::new(DisabledGenerator),
    };
    info!("Using text generator: {}", generator.name());

    let db = ReportDatabase::connect(&config.database_url).await?;
    db.migrate().await?;

    let source = CloudWatchSource::from_region(config.region.clone()).await;
    let reader = AlarmMetadataReader::new(source, config.history_window)
        .with_concurrency(config.history_concurrency);

    let suggester = DescriptionSuggester::new(generator).with_timeout(config.generation_timeout);
    suggester.check_ready().await;
    let assembler = ReportAssembler::new(IssueClassifier::new(config.classifier.clone()), suggester)
        .with_scope(config.description_scope)
        .with_concurrency(config.suggestion_concurrency);

    let job = EvaluationJob::new(reader, assembler, db.clone()).dry_run(args.dry_run);

    match args.interval_hours {
        None => {
            job.run().await?;
        }
        Some(hours) => {
            let mut interval = tokio::time::interval(run_interval(hours)?);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = job.run().await {
                            error!("Evaluation run failed: {}", e);
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutting down");
                        break;
                    }
                }
            }
        }
    }

    db.close().await;
    Ok(())
}
