//! `chatcut` - drive remote Colab processing jobs from the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use chatcut_cli::logging::init_tracing;
use chatcut_cli::{wait_for_job, WaitConfig, WaitOutcome};
use chatcut_colab::{
    ColabClient, ProgressReport, ProxyError, RemoteEndpoint, SubmitReport, TrimSpec,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Colab tunnel URL (falls back to COLAB_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Checks that the Colab server is reachable
    Health,
    /// Uploads a video and starts a processing job
    Submit {
        /// Local video file to upload
        file: PathBuf,
        /// Editing instruction for the server
        prompt: String,
        #[command(flatten)]
        trim: TrimArgs,
    },
    /// Queries a job once, downloading the result if it is complete
    Poll {
        /// Job identifier returned by submit
        job_id: String,
    },
    /// Submits a job and polls it until it settles
    Run {
        /// Local video file to upload
        file: PathBuf,
        /// Editing instruction for the server
        prompt: String,
        #[command(flatten)]
        trim: TrimArgs,
        /// Seconds between polls (default COLAB_POLL_INTERVAL_SECS or 2)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
        /// Seconds before giving up (default COLAB_WAIT_TIMEOUT_SECS or 1800)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[derive(clap::Args, Debug)]
struct TrimArgs {
    /// Start of the source range to keep, in seconds
    #[arg(long)]
    trim_start: Option<f64>,
    /// End of the source range to keep, in seconds
    #[arg(long)]
    trim_end: Option<f64>,
}

impl TrimArgs {
    fn to_spec(&self) -> Result<Option<TrimSpec>> {
        TrimSpec::from_bounds(self.trim_start, self.trim_end).context("invalid trim range")
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ColabClient::from_env().context("failed to create Colab client")?;
    let endpoint = match &cli.url {
        Some(url) => RemoteEndpoint::normalize(url),
        None => client.default_endpoint()?.clone(),
    };
    info!(endpoint = %endpoint, "Using Colab server");

    match cli.command {
        Commands::Health => {
            let report = client.check_health(&endpoint).await;
            print_json(&report)?;
            Ok(exit_code(report.healthy))
        }
        Commands::Submit { file, prompt, trim } => {
            let trim = trim.to_spec()?;
            let result = client.submit(&file, &prompt, &endpoint, trim.as_ref()).await;
            print_json(&SubmitReport::from_result(&result))?;
            Ok(exit_code(result.is_ok()))
        }
        Commands::Poll { job_id } => {
            let result = client.poll(&job_id, &endpoint).await;
            print_json(&ProgressReport::from_result(&job_id, &result))?;
            Ok(exit_code(result.is_ok()))
        }
        Commands::Run {
            file,
            prompt,
            trim,
            interval,
            timeout,
        } => {
            let trim = trim.to_spec()?;
            let wait = WaitConfig::from_env().with_overrides(interval, timeout);
            run(&client, &endpoint, &file, &prompt, trim.as_ref(), &wait).await
        }
    }
}

async fn run(
    client: &ColabClient,
    endpoint: &RemoteEndpoint,
    file: &Path,
    prompt: &str,
    trim: Option<&TrimSpec>,
    wait: &WaitConfig,
) -> Result<ExitCode> {
    let submitted = client.submit(file, prompt, endpoint, trim).await;
    let job = match submitted {
        Ok(job) => job,
        Err(e) => {
            print_json(&SubmitReport::from_result(&Err(e)))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    match wait_for_job(client, &job.job_id, endpoint, wait).await {
        Ok(WaitOutcome::Finished(progress)) => {
            let ok = progress.output_path.is_some();
            print_json(&ProgressReport::from_result(&job.job_id, &Ok(progress)))?;
            Ok(exit_code(ok))
        }
        Ok(WaitOutcome::DeadlineExceeded {
            last,
            last_error,
            attempts,
        }) => {
            error!(job_id = %job.job_id, attempts, "Job did not finish before the deadline");
            let report = match (last_error, last) {
                (Some(e), _) => ProgressReport::from_result(&job.job_id, &Err(e)),
                (None, Some(progress)) => ProgressReport::from_result(&job.job_id, &Ok(progress)),
                (None, None) => ProgressReport::from_result(
                    &job.job_id,
                    &Err(ProxyError::progress_check_failed("no progress received")),
                ),
            };
            print_json(&report)?;
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            print_json(&ProgressReport::from_result(&job.job_id, &Err(e)))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode report")?;
    println!("{json}");
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
