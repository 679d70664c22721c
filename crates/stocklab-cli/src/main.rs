//! stocklab: request stock research reports from a remote A2A analysis agent
//!
//! Usage:
//!   stocklab analyze AAPL
//!   stocklab batch AAPL TSLA MSFT
//!   stocklab card
//!
//! The remote agent address comes from `~/.stocklab/config.toml`,
//! `A2A_SERVER_URL`, or `--server`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

use stocklab_a2a::{A2aClient, A2aError, ClientOptions};
use stocklab_core::{AppConfig, StockReport, normalize_symbol};

#[derive(Parser, Debug)]
#[command(name = "stocklab", version, about = "Stock analysis via the A2A protocol")]
struct Cli {
    /// Config file (defaults to ~/.stocklab/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the A2A stock analysis server
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a report for one symbol
    Analyze {
        symbol: String,
        /// Print the raw report JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Request reports for several symbols concurrently
    Batch {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Show the remote agent's card
    Card,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(server) = &cli.server {
        config.a2a.server_url = server.clone();
        config.validate()?;
    }
    Ok(config)
}

fn init_tracing(config: &AppConfig) {
    let default_filter = if config.debug {
        "debug".to_string()
    } else {
        format!("{},reqwest=warn,hyper=warn,hyper_util=warn", config.log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, config: AppConfig) -> Result<()> {
    let client = A2aClient::new(ClientOptions::from(&config.a2a));
    let server = config.a2a.server_url.as_str();

    match command {
        Command::Analyze { symbol, json } => {
            let symbol = normalize_symbol(&symbol)?;
            info!("Requesting analysis of {} from {}", symbol, server);
            let report = client.request_analysis(server, &symbol).await?;
            print_report(&report, json)?;
        }
        Command::Batch { symbols } => {
            let symbols = symbols
                .iter()
                .map(|s| normalize_symbol(s))
                .collect::<Result<Vec<_>, _>>()?;
            run_batch(&client, server, &symbols).await?;
        }
        Command::Card => {
            let card = client.fetch_agent_card(server).await?;
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        Command::Config => {
            let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

async fn run_batch(client: &A2aClient, server: &str, symbols: &[String]) -> Result<()> {
    debug!("Running {} analyses concurrently", symbols.len());
    let results = futures_util::future::join_all(
        symbols
            .iter()
            .map(|symbol| client.request_analysis(server, symbol)),
    )
    .await;

    let mut failures = 0;
    for (symbol, result) in symbols.iter().zip(results) {
        match result {
            Ok(report) => {
                println!("{}", section_header(&format!("{}: {}", symbol, report.company_name)));
                println!("{}", report.to_markdown());
            }
            Err(e) => {
                failures += 1;
                println!("{}", section_header(symbol));
                println!("{}: {}", e.kind(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} analyses failed", failures, symbols.len());
    }
    Ok(())
}

fn print_report(report: &StockReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.to_markdown());
    }
    Ok(())
}

fn section_header(title: &str) -> String {
    let rule = "=".repeat(60);
    format!("\n{}\n {}\n{}", rule, title, rule)
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<A2aError>() {
        Some(a2a) => {
            eprintln!("Error [{}]: {}", a2a.kind(), a2a);
            if let Some(hint) = a2a.hint() {
                eprintln!("\nTip: {}", hint);
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["stocklab", "analyze", "aapl", "--json"]).unwrap();
        match cli.command {
            Command::Analyze { symbol, json } => {
                assert_eq!(symbol, "aapl");
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_batch_requires_symbols() {
        assert!(Cli::try_parse_from(["stocklab", "batch"]).is_err());
        let cli = Cli::try_parse_from(["stocklab", "batch", "AAPL", "TSLA"]).unwrap();
        assert!(matches!(cli.command, Command::Batch { ref symbols } if symbols.len() == 2));
    }

    #[test]
    fn test_global_server_flag() {
        let cli =
            Cli::try_parse_from(["stocklab", "card", "--server", "http://10.1.1.1:8001"]).unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://10.1.1.1:8001"));
    }

    #[test]
    fn test_section_header() {
        let header = section_header("AAPL");
        assert!(header.contains(" AAPL\n"));
        assert_eq!(header.matches(&"=".repeat(60)).count(), 2);
    }

    #[tokio::test]
    async fn test_batch_reports_failures() {
        let client = A2aClient::default();
        let err = run_batch(&client, "http://127.0.0.1:1", &["AAPL".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1 of 1 analyses failed"));
    }
}
