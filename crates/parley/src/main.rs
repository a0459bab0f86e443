//! parley CLI - prompt dispatch with model fallback.
//!
//! # Usage
//!
//! ```bash
//! # Single prompt through the configured fallback list
//! parley "Name three rust crates for image processing"
//!
//! # Force one model, attach an image
//! parley "Describe this photo" --model claude-3-haiku-20240307 --media photo.jpg
//!
//! # Batch mode: one prompt per line, responses to a file
//! parley --batch-file prompts.txt --output responses.txt --workers 4
//! ```

use clap::Parser;
use parley_core::{Config, Dispatcher};
use std::path::PathBuf;

mod cli;
mod logging;

/// Send prompts to LLMs with fallback, media attachments, and batch mode.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Prompt to send (omit when using --batch-file)
    pub prompt: Option<String>,

    /// Model id to use instead of the configured fallback list
    #[arg(short, long)]
    pub model: Option<String>,

    /// Media files to attach to the prompt
    #[arg(long, value_name = "PATH", conflicts_with = "batch_file")]
    pub media: Vec<PathBuf>,

    /// File with one prompt per line for batch processing
    #[arg(short, long, value_name = "FILE", conflicts_with = "prompt")]
    pub batch_file: Option<PathBuf>,

    /// File to write batch responses to (one per line)
    #[arg(short, long, value_name = "FILE", requires = "batch_file")]
    pub output: Option<PathBuf>,

    /// Worker count for batch mode (defaults to available parallelism)
    #[arg(short, long, requires = "batch_file")]
    pub workers: Option<usize>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logging isn't initialized yet, so config warnings go to stderr directly.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: failed to load config: {e}\n  Using default configuration.");
            Config::default()
        }
    };
    logging::init(&config, args.verbose, args.json_logs);

    tracing::debug!("parley v{}", parley_core::VERSION);

    let dispatcher = Dispatcher::new(config);
    cli::execute(args, dispatcher).await
}
