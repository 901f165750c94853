use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use failover_coordinator::failover::HealthReport;

#[derive(Parser)]
#[command(name = "failover-cli")]
#[command(about = "Management CLI for the failover coordinator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8443")]
    url: String,

    /// Bearer token for the control API. Empty sends no Authorization
    /// header.
    #[arg(short, long, default_value = "")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pause pooled traffic ahead of a switchover
    Pause {
        /// Deadline for the pause command, in milliseconds
        #[arg(long, default_value_t = 5_000)]
        timeout_ms: u64,

        /// Automatic resume delay in milliseconds; 0 disables it
        #[arg(long, default_value_t = 25_000)]
        expiry_ms: u64,
    },
    /// Resume pooled traffic
    Resume,
    /// Check coordinator component health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.token.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.token))?,
        );
    }

    match cli.command {
        Commands::Pause {
            timeout_ms,
            expiry_ms,
        } => {
            let res = client
                .post(format!("{}/v1/pause", cli.url))
                .headers(headers)
                .json(&serde_json::json!({
                    "timeout_ms": timeout_ms,
                    "expiry_ms": expiry_ms,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Resume => {
            let res = client
                .post(format!("{}/v1/resume", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client
                .get(format!("{}/v1/health", cli.url))
                .headers(headers)
                .send()
                .await?;

            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: control API returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
                return Ok(());
            }

            let report: HealthReport = res.json().await?;
            print!("{}", report.render());
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: control API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
