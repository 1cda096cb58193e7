//! Main entry point for TMT Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tmt_translator::cli::commands::{self, Commands};
use tmt_translator::{Lang, TranslationGateway, TranslatorConfig};

/// TMT Translator - rate-limited English/Chinese machine translation
#[derive(Parser, Debug)]
#[command(name = "tmt-translator", version, about, long_about = None)]
struct Args {
    /// Config file (JSON or YAML); defaults to TMT_* environment variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// API endpoint (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Maximum requests per second (overrides config)
    #[arg(long)]
    qps: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// `--verbose` wins over `RUST_LOG`; otherwise `RUST_LOG`, then info
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("tmt_translator=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tmt_translator=info"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(log_filter(args.verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = args.command else {
        println!("Please specify a command. Use --help for more information.");
        return Ok(());
    };

    // Override config with CLI args if provided
    let mut config = TranslatorConfig::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(qps) = args.qps {
        config.qps = qps;
    }

    let gateway = TranslationGateway::from_config(&config)?;

    match command {
        Commands::En2zh { text, json } => {
            commands::handle_text(&gateway, Lang::En, Lang::Zh, &text, json).await?;
        }
        Commands::Zh2en { text, json } => {
            commands::handle_text(&gateway, Lang::Zh, Lang::En, &text, json).await?;
        }
        Commands::File {
            input,
            output,
            from,
            to,
        } => {
            commands::handle_file(&gateway, input, output, from, to).await?;
        }
    }

    Ok(())
}
