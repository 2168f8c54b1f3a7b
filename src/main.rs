use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use dnsentinel::config::AppConfig;
use dnsentinel::models::scan::ScanRequest;
use dnsentinel::services::api::ScanApiClient;
use dnsentinel::services::batch::{BatchError, BatchRunner};
use dnsentinel::services::export;
use dnsentinel::services::progress::BatchProgress;
use dnsentinel::services::validation;

#[derive(Parser)]
#[command(name = "dnsentinel", version, about = "Batch domain-scan client for a DNS threat-detection API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a batch of domains and track it to completion
    Batch {
        /// File with domains, one per line or comma-separated ("-" for stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Domains given directly on the command line
        domains: Vec<String>,

        /// Skip the server-side safelist check
        #[arg(long)]
        no_safelist: bool,

        /// Write fetched results to this file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format for --output
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Classify a single domain
    Single {
        domain: String,

        /// Skip the server-side safelist check
        #[arg(long)]
        no_safelist: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    // Register application metrics
    metrics::describe_counter!("batch_jobs_submitted_total", "Total batch jobs submitted");
    metrics::describe_counter!("batch_jobs_completed_total", "Total batch jobs completed");
    metrics::describe_counter!("batch_jobs_failed_total", "Total batch jobs that failed");
    metrics::describe_counter!("batch_polls_total", "Total job status polls issued");

    let api = ScanApiClient::new(&config.api_base_url, &config.api_token)
        .expect("Failed to initialize API client");

    let exit = match cli.command {
        Command::Batch {
            input,
            domains,
            no_safelist,
            output,
            format,
        } => run_batch(api, &config, input, domains, !no_safelist, output, format).await,
        Command::Single { domain, no_safelist } => run_single(api, domain, !no_safelist).await,
    };

    std::process::exit(exit);
}

async fn run_batch(
    api: ScanApiClient,
    config: &AppConfig,
    input: Option<PathBuf>,
    mut domains: Vec<String>,
    use_safelist: bool,
    output: Option<PathBuf>,
    format: ExportFormat,
) -> i32 {
    if let Some(path) = input {
        let text = if path.as_os_str() == "-" {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                tracing::error!(error = %e, "failed to read stdin");
                return 1;
            }
            buf
        } else {
            match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to read input file");
                    return 1;
                }
            }
        };
        domains.extend(validation::parse_domain_list(&text));
    }

    let runner = BatchRunner::new(api, config);

    let report = runner
        .run(domains, use_safelist, |job| {
            let progress = BatchProgress::from_job(job);
            tracing::info!(
                job_id = job.id,
                status = %job.status,
                processed = progress.processed,
                total = progress.total,
                percentage = progress.percentage,
                malicious = progress.malicious,
                suspicious = progress.suspicious,
                benign = progress.benign,
                "progress"
            );
        })
        .await;

    let report = match report {
        Ok(report) => report,
        Err(BatchError::Validation(e)) => {
            tracing::error!(error = %e, "batch rejected before submission");
            return 2;
        }
        Err(BatchError::JobFailed { job }) => {
            tracing::error!(
                job_id = job.id,
                error = job.error_message.as_deref().unwrap_or("unknown"),
                "batch job failed on server"
            );
            return 1;
        }
        Err(BatchError::Remote(e)) => {
            tracing::error!(error = %e, "batch aborted");
            return 1;
        }
    };

    let progress = BatchProgress::from_job(&report.job);
    println!(
        "Batch job #{} completed: {} scanned, {} malicious, {} suspicious, {} benign",
        report.job.id, progress.processed, progress.malicious, progress.suspicious, progress.benign
    );

    if let Some(path) = output {
        let file = match std::fs::File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to create output file");
                return 1;
            }
        };
        let written = match format {
            ExportFormat::Csv => export::write_csv(file, &report.results),
            ExportFormat::Json => export::write_json(file, &report.results),
        };
        if let Err(e) = written {
            tracing::error!(path = %path.display(), error = %e, "export failed");
            return 1;
        }
        println!("Wrote {} results to {}", report.results.len(), path.display());
    } else {
        for result in &report.results {
            println!(
                "{:<40} {:<10} {:.2}% ({})",
                result.domain,
                result.prediction.to_string(),
                result.confidence * 100.0,
                result.method
            );
        }
    }

    0
}

async fn run_single(api: ScanApiClient, domain: String, use_safelist: bool) -> i32 {
    use dnsentinel::services::api::ScanApi;

    let domain = match validation::validate_single_domain(&domain) {
        Ok(domain) => domain,
        Err(e) => {
            tracing::error!(error = %e, "invalid domain");
            return 2;
        }
    };

    let request = ScanRequest {
        domain,
        use_safelist,
    };

    match api.scan_single(&request).await {
        Ok(result) => {
            println!(
                "{}: {} ({:.2}% confidence, {}) - {}",
                result.domain,
                result.prediction,
                result.confidence * 100.0,
                result.method,
                result.reason
            );
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "scan failed");
            1
        }
    }
}
