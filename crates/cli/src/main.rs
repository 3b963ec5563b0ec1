//! Unarchive CLI - Command-line interface for the fastq unarchiving manager

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser)]
#[command(name = "unarchive")]
#[command(about = "Fastq unarchiving job manager CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "UNARCHIVE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an unarchiving job
    Create {
        /// Fastq id to restore (repeatable)
        #[arg(short, long = "fastq-id", required = true)]
        fastq_ids: Vec<String>,

        #[arg(short, long, default_value = "S3_UNARCHIVING")]
        job_type: String,
    },

    /// Show a job
    Get {
        /// Job ID
        job_id: String,
    },

    /// List jobs
    List {
        /// Only jobs in this status
        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        page: Option<u32>,

        #[arg(short, long)]
        rows_per_page: Option<u32>,
    },

    /// Move a job to a new status
    UpdateStatus {
        /// Job ID
        job_id: String,

        /// PENDING, RUNNING, FAILED, ABORTED or SUCCEEDED
        status: String,

        /// Only accepted with FAILED or ABORTED
        #[arg(short, long)]
        error_message: Option<String>,
    },

    /// Record the workflow execution driving a job
    AttachExecution {
        /// Job ID
        job_id: String,

        /// Execution ARN
        arn: String,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobView {
    id: String,
    fastq_ids: Vec<String>,
    job_type: String,
    status: String,
    #[serde(default)]
    steps_execution_arn: Option<String>,
    start_time: String,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    error_messages: Option<String>,
}

#[derive(Tabled)]
struct JobRow {
    id: String,
    status: String,
    fastq_ids: String,
    start_time: String,
    end_time: String,
}

impl From<&JobView> for JobRow {
    fn from(job: &JobView) -> Self {
        Self {
            id: job.id.clone(),
            status: job.status.clone(),
            fastq_ids: job.fastq_ids.join(","),
            start_time: job.start_time.clone(),
            end_time: job.end_time.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageView {
    links: LinksView,
    pagination: PaginationView,
    results: Vec<JobView>,
}

#[derive(Deserialize)]
struct LinksView {
    previous: Option<String>,
    next: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationView {
    page: u32,
    rows_per_page: u32,
    count: u64,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn colored_status(status: &str) -> colored::ColoredString {
    match status {
        "SUCCEEDED" => status.green().bold(),
        "FAILED" | "ABORTED" => status.red().bold(),
        "RUNNING" => status.cyan().bold(),
        _ => status.yellow().bold(),
    }
}

fn print_job(job: &JobView) {
    println!("  {} {}", "Job:".bold(), job.id);
    println!("  {} {}", "Status:".bold(), colored_status(&job.status));
    println!("  {} {}", "Type:".bold(), job.job_type);
    println!("  {} {}", "Fastq IDs:".bold(), job.fastq_ids.join(", "));
    println!("  {} {}", "Started:".bold(), job.start_time);
    if let Some(end_time) = &job.end_time {
        println!("  {} {}", "Ended:".bold(), end_time);
    }
    if let Some(arn) = &job.steps_execution_arn {
        println!("  {} {}", "Execution:".bold(), arn);
    }
    if let Some(errors) = &job.error_messages {
        println!("  {} {}", "Errors:".bold(), errors.red());
    }
}

async fn call_job(url: &str, method: &str, params: serde_json::Value) -> Result<JobView> {
    let result = call_rpc(url, method, params).await?;
    serde_json::from_value(result).context("Unexpected job payload")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            fastq_ids,
            job_type,
        } => {
            let params = json!({
                "fastqIds": fastq_ids,
                "jobType": job_type,
            });

            let job = call_job(&cli.rpc_url, "jobs.create.v1", params).await?;

            println!("{}", "✓ Job created".green().bold());
            println!();
            print_job(&job);
        }

        Commands::Get { job_id } => {
            let job = call_job(&cli.rpc_url, "jobs.get.v1", json!({ "jobId": job_id })).await?;
            print_job(&job);
        }

        Commands::List {
            status,
            page,
            rows_per_page,
        } => {
            let params = json!({
                "status": status,
                "page": page,
                "rowsPerPage": rows_per_page,
            });

            let result = call_rpc(&cli.rpc_url, "jobs.list.v1", params).await?;
            let page: PageView = serde_json::from_value(result).context("Unexpected list payload")?;

            if page.results.is_empty() {
                println!("{}", "No jobs found".yellow());
            } else {
                let rows: Vec<JobRow> = page.results.iter().map(JobRow::from).collect();
                println!("{}", Table::new(rows));
            }
            println!();
            println!(
                "  {} {} ({} per page, {} total)",
                "Page:".bold(),
                page.pagination.page,
                page.pagination.rows_per_page,
                page.pagination.count
            );
            if let Some(previous) = page.links.previous {
                println!("  {} {}", "Previous:".bold(), previous);
            }
            if let Some(next) = page.links.next {
                println!("  {} {}", "Next:".bold(), next);
            }
        }

        Commands::UpdateStatus {
            job_id,
            status,
            error_message,
        } => {
            let params = json!({
                "jobId": job_id,
                "status": status,
                "errorMessages": error_message,
            });

            let job = call_job(&cli.rpc_url, "jobs.update_status.v1", params).await?;

            println!(
                "{} {}",
                format!("✓ Job {} is now", job.id).green().bold(),
                colored_status(&job.status)
            );
        }

        Commands::AttachExecution { job_id, arn } => {
            let params = json!({
                "jobId": job_id,
                "stepsExecutionArn": arn,
            });

            let job = call_job(&cli.rpc_url, "jobs.attach_execution.v1", params).await?;

            println!("{}", format!("✓ Execution attached to {}", job.id).green().bold());
        }
    }

    Ok(())
}
