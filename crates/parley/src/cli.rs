//! Command execution for the two CLI modes.

use anyhow::Context;
use parley_core::{AskOptions, Dispatcher};
use std::path::Path;

use crate::Cli;

/// Dispatch to single-prompt or batch mode. Neither mode selected is a
/// usage error.
pub async fn execute(args: Cli, dispatcher: Dispatcher) -> anyhow::Result<()> {
    if let Some(batch_file) = &args.batch_file {
        run_batch(&dispatcher, &args, batch_file).await
    } else if let Some(prompt) = &args.prompt {
        run_single(&dispatcher, &args, prompt).await
    } else {
        eprintln!("error: provide a PROMPT or --batch-file; see --help");
        std::process::exit(2);
    }
}

async fn run_single(dispatcher: &Dispatcher, args: &Cli, prompt: &str) -> anyhow::Result<()> {
    let options = AskOptions {
        data: None,
        models: args.model.clone().map(|m| vec![m]),
        media: args.media.clone(),
    };
    let response = dispatcher.ask(prompt, &options).await?;
    println!("{response}");
    Ok(())
}

async fn run_batch(
    dispatcher: &Dispatcher,
    args: &Cli,
    batch_file: &Path,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(batch_file)
        .with_context(|| format!("failed to read batch prompts file {}", batch_file.display()))?;
    let prompts = parse_prompts(&content);

    if prompts.is_empty() {
        eprintln!("No prompts found in {}.", batch_file.display());
        return Ok(());
    }

    tracing::info!(count = prompts.len(), "processing prompts in batch mode");
    let responses = dispatcher
        .ask_batch(
            &prompts,
            args.model.clone().map(|m| vec![m]),
            args.workers,
        )
        .await?;

    match &args.output {
        Some(path) => {
            let mut lines = responses.join("\n");
            lines.push('\n');
            std::fs::write(path, lines)
                .with_context(|| format!("failed to write batch output to {}", path.display()))?;
            println!("Batch output written to {}", path.display());
        }
        None => {
            for (i, response) in responses.iter().enumerate() {
                println!("Response for prompt {}:\n{}\n---", i + 1, response);
            }
        }
    }
    Ok(())
}

/// One prompt per non-blank line, whitespace-trimmed.
fn parse_prompts(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prompts_skips_blank_lines() {
        let prompts = parse_prompts("first\n\n  \nsecond  \n");
        assert_eq!(prompts, vec!["first", "second"]);
    }

    #[test]
    fn parse_prompts_of_empty_file_is_empty() {
        assert!(parse_prompts("").is_empty());
        assert!(parse_prompts("\n \n").is_empty());
    }
}
