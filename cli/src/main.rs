//! reportgen: turn a recurring-export ticket into a scheduler job.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use reportgen::config::{load_config, load_default_config};
use reportgen::pipeline::PipelineWarning;
use reportgen::{
    ArtifactWriter, ClickHouseStore, Pipeline, PipelineContext, ReportGenError, TicketRecord,
    TicketRequest,
};

#[derive(Parser)]
#[command(name = "reportgen")]
#[command(about = "Translate a report ticket into a scheduler job and sample extract")]
#[command(version)]
struct Cli {
    /// Ticket record (JSON)
    ticket: PathBuf,

    /// Configuration file (JSON or YAML); defaults to the user config dir
    #[arg(short, long, env = "REPORTGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the job document [default: <ticket key>_job.json]
    #[arg(long)]
    job_out: Option<PathBuf>,

    /// Where to write the sample extract [default: <ticket key>_sample.csv]
    #[arg(long)]
    sample_out: Option<PathBuf>,

    /// Do not run the validation query
    #[arg(long)]
    skip_sample: bool,

    /// Use this advertiser name instead of looking it up
    #[arg(long)]
    advertiser_name: Option<String>,

    /// Run date (YYYY-MM-DD) [default: today]
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print the job document to stdout
    #[arg(long)]
    print: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)));

    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init_with_filter(log::LevelFilter::Info)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), ReportGenError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };

    let record = TicketRecord::from_json_file(&cli.ticket)?;
    let request = TicketRequest::from_record(&record)?;

    let key = if request.key.is_empty() {
        "report".to_string()
    } else {
        request.key.clone()
    };
    let job_out = cli
        .job_out
        .unwrap_or_else(|| PathBuf::from(format!("{}_job.json", key)));
    let sample_out = cli
        .sample_out
        .unwrap_or_else(|| PathBuf::from(format!("{}_sample.csv", key)));

    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut ctx = PipelineContext::new(request, today);
    if let Some(name) = cli.advertiser_name {
        ctx = ctx.with_advertiser_name(name);
    }

    let store = Arc::new(ClickHouseStore::from_config(&config.store)?);
    let pipeline = Pipeline::from_config(&config, store);
    let writer = ArtifactWriter::new(&job_out, &sample_out);

    let outcome = pipeline.run(ctx, &writer, !cli.skip_sample).await?;

    for warning in &outcome.warnings {
        match warning {
            PipelineWarning::UnmappedField { key, alias } => {
                warn!(field = %key, alias = %alias, "Column has no expression and will be empty")
            }
            PipelineWarning::UnknownAdvertiser => warn!("Advertiser name unresolved"),
            PipelineWarning::EmptySample => warn!("Sample extract is empty"),
        }
    }

    info!(
        job = %outcome.job_path.display(),
        sample = ?outcome.sample_path.as_ref().map(|p| p.display().to_string()),
        cron = %outcome.translation.cron,
        "Job written"
    );

    if cli.print {
        println!("{}", outcome.translation.job.to_compact_json()?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    if let Err(e) = run(cli).await {
        error!(error = %e, "reportgen failed");
        return Err(Box::new(e) as Box<dyn Error>);
    }
    Ok(())
}
