//! The `aureus play` command.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use aureus_core::engine::{AnswerOutcome, Phase, SessionEngine, SessionResult};
use aureus_core::ledger::Wallet;
use aureus_core::model::Question;
use aureus_core::reward::max_reward;
use aureus_core::source::{QuestionSource, StaticQuestionSource};
use aureus_providers::config::load_config_from;

use super::wallet::render_statement;

pub struct PlayOptions {
    pub rounds: u32,
    pub offline: bool,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub delay_ms: Option<u64>,
    pub config_path: Option<PathBuf>,
}

pub async fn execute(opts: PlayOptions) -> Result<()> {
    let config = load_config_from(opts.config_path.as_deref())?;

    let mut engine_config = config.engine_config();
    if let Some(ms) = opts.delay_ms {
        engine_config.advance_delay = Duration::from_millis(ms);
    }

    let source: Arc<dyn QuestionSource> = if opts.offline {
        Arc::new(StaticQuestionSource::fallback())
    } else {
        Arc::new(super::build_source(
            &config,
            opts.provider.as_deref(),
            opts.model.as_deref(),
        )?)
    };

    let wallet = Arc::new(Wallet::with_welcome_bonus(
        config.username.clone(),
        config.welcome_bonus,
    ));
    let question_count = engine_config.question_count;
    let engine = SessionEngine::new(source, wallet.clone(), engine_config);
    let mut updates = engine.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "Welcome, {}. Your purse holds {} coins.",
        wallet.username(),
        wallet.balance()
    );
    println!(
        "The Oracle's Challenge: {question_count} questions, up to {} coins per session.",
        max_reward(question_count as u32)
    );

    'rounds: for round in 1..=opts.rounds {
        if opts.rounds > 1 {
            println!("\n=== Round {round} of {} ===", opts.rounds);
        }
        println!("The Oracle is consulting the stars...");
        if !engine.start().await {
            continue;
        }
        if let Some(topic) = engine.snapshot().topic {
            println!("Topic: {topic}");
        }

        loop {
            let view = engine.snapshot();
            if view.phase == Phase::Finished {
                if let Some(result) = &view.result {
                    print_result(result);
                }
                break;
            }
            let (Phase::InProgress, Some(question)) = (view.phase, view.question) else {
                break;
            };

            print_question(&question, view.question_index, view.total_questions);

            let choice = loop {
                print!("Your answer (1-4, q to quit): ");
                std::io::stdout().flush()?;

                let Some(line) = lines.next_line().await? else {
                    engine.return_home();
                    println!();
                    break 'rounds;
                };
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") {
                    engine.return_home();
                    println!("Leaving the Oracle's hall.");
                    break 'rounds;
                }
                match resolve_choice(&question, line) {
                    Some(option) => break option,
                    None => println!("Pick a number from 1 to 4, or type one of the options."),
                }
            };

            match engine.answer(&choice) {
                AnswerOutcome::Recorded { correct: true, .. } => println!("Correct!"),
                AnswerOutcome::Recorded { correct_option, .. } => {
                    println!("Not quite. The answer was {correct_option}.")
                }
                AnswerOutcome::Ignored => {}
            }

            // Hold the verdict on screen until the engine moves on.
            updates
                .wait_for(|v| v.selected.is_none() || v.phase != Phase::InProgress)
                .await?;
        }
    }

    println!("\n{}", render_statement(&wallet));
    Ok(())
}

fn print_question(question: &Question, index: usize, total: usize) {
    println!(
        "\nQuestion {} of {} [{}]",
        index + 1,
        total,
        question.difficulty()
    );
    println!("{}", question.prompt());
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
}

fn print_result(result: &SessionResult) {
    let heading = if result.perfect {
        "Perfection!"
    } else {
        "Well Fought!"
    };
    println!("\n{heading}");
    println!(
        "You answered {} out of {} correctly.",
        result.score, result.total
    );
    if result.credited {
        println!(
            "+{} coins ({}/{})",
            result.reward, result.score, result.total
        );
    } else {
        println!("No coins this time ({}/{}).", result.score, result.total);
    }
}

/// Map player input to one of the question's options.
///
/// Accepts a 1-based option number or the option text, case-insensitively.
fn resolve_choice(question: &Question, input: &str) -> Option<String> {
    let options = question.options();
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .cloned();
    }
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(input))
        .cloned()
}
