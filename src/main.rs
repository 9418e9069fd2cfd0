//! symptom-scribe: extract structured symptom records from a patient's
//! description with a language model.
//!
//! Usage:
//!   symptom-scribe serve
//!   symptom-scribe extract "I've had a dry cough for a week"
//!   echo "..." | symptom-scribe extract

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use symptom_scribe::{
    clients::{OpenAiClient, SymptomModel},
    config::Config,
    extractor::process_symptoms,
    http::start_http_server,
    render::render_text,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "symptom-scribe")]
#[command(about = "Patient symptom extractor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web form (default)
    Serve,
    /// Extract symptoms once and print them; reads stdin when no text is given
    Extract {
        /// Patient description
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_writer(std::io::stderr)
        .init();
    config.log_warnings();

    let client = OpenAiClient::new(&config.model)?;
    info!(
        "Using model {} at {}",
        client.model(),
        client.endpoint()
    );
    let model: Arc<dyn SymptomModel> = Arc::new(client);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => start_http_server(Arc::new(config), model).await?,
        Commands::Extract { text } => {
            let input = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read description from stdin")?;
                    buf
                }
            };
            let outcome = process_symptoms(model.as_ref(), &input).await;
            print!("{}", render_text(&outcome));
            if outcome.is_error() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
