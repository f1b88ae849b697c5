//! The `aureus questions` command.

use std::path::PathBuf;

use anyhow::Result;

use aureus_core::source::FetchOutcome;
use aureus_providers::config::load_config_from;

pub async fn execute(
    topic: String,
    count: usize,
    json: bool,
    provider: Option<String>,
    model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let source = super::build_source(&config, provider.as_deref(), model.as_deref())?;

    let outcome = source.fetch_outcome(&topic, count).await;
    if let FetchOutcome::Fallback { reason, .. } = &outcome {
        eprintln!("Generation failed ({reason}); showing the built-in questions instead.");
    }
    let questions = outcome.into_questions();

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    println!("{} questions about {topic}", questions.len());
    for (i, question) in questions.iter().enumerate() {
        println!("\n{}. [{}] {}", i + 1, question.difficulty(), question.prompt());
        for option in question.options() {
            let marker = if question.is_correct(option) { "*" } else { " " };
            println!("   {marker} {option}");
        }
    }

    Ok(())
}
