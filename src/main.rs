use anyhow::{Context, Result};
use bat::PrettyPrinter;
use clap::Parser;
use cliclack::{input, spinner};
use console::style;
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use coursebot::providers::configs::gemini::GeminiProviderConfig;
use coursebot::session::SessionHistory;
use coursebot::tools::{NotesIndex, ToolExecutor, ToolRegistry};
use coursebot::ResponseGenerator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gemini API Key (can also be set via GEMINI_API_KEY environment variable)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Model to use (defaults to GEMINI_MODEL, then gemini-1.5-flash)
    #[arg(short, long)]
    model: Option<String>,

    /// Directory of course notes to expose through the search tool
    #[arg(short, long)]
    notes: Option<PathBuf>,

    /// Number of previous exchanges sent as context
    #[arg(long, default_value_t = 2)]
    history: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("warn".parse().expect("valid log directive"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Environment config, with command line flags on top
    let mut config = GeminiProviderConfig::from_env_with_key(cli.api_key)
        .context("API key must be provided via --api-key or GEMINI_API_KEY environment variable")?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    let generator = ResponseGenerator::from_config(config)?;

    let mut registry = ToolRegistry::new();
    if let Some(dir) = &cli.notes {
        let index = NotesIndex::load(dir)?;
        info!(passages = index.len(), dir = %dir.display(), "course notes indexed");
        registry.register(index.into_tool())?;
    }
    let declarations = registry.declarations();
    let executor: Option<&dyn ToolExecutor> = if registry.is_empty() {
        None
    } else {
        Some(&registry)
    };

    let mut history = SessionHistory::new(cli.history);

    println!(
        "Course assistant {}",
        style("- type \"exit\" to end the session").dim()
    );
    println!("\n");

    loop {
        let message_text: String = input("Message:").placeholder("").multiline().interact()?;

        if message_text.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        let spin = spinner();
        spin.start("awaiting reply");

        let context = history.render();
        let result = generator
            .generate(&message_text, context.as_deref(), &declarations, executor)
            .await;

        spin.stop("");

        match result {
            Ok(answer) => {
                render(&answer);
                history.push(message_text, answer);
            }
            Err(e) => {
                error!(error = %e, "generation failed");
                println!("{}", style(format!("Error: {}", e)).red());
            }
        }
        println!("\n");
    }
    Ok(())
}

fn render(content: &str) {
    let printed = PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print();

    if printed.is_err() {
        println!("{}", content);
    }
}
