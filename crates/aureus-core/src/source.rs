//! Question sources.
//!
//! A `QuestionSource` never fails: when live generation goes wrong it hands
//! back the fixed fallback set instead, so a session always has something to
//! play.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::model::{Difficulty, Question};
use crate::parser::parse_questions;
use crate::prompt::{question_schema, trivia_prompt, SYSTEM_PROMPT};
use crate::traits::{GenerateRequest, LlmProvider};

/// Default bound on a single backend call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Completion budget for one batch of questions.
const MAX_TOKENS: u32 = 2048;

/// Anything that can supply a batch of questions for a topic.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Up to `count` questions about `topic`. Total: never errors.
    async fn fetch_questions(&self, topic: &str, count: usize) -> Vec<Question>;
}

/// What a fetch produced, and whether it had to degrade.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Questions generated for the requested topic.
    Fetched(Vec<Question>),
    /// Generation failed; the fallback set was substituted.
    Fallback {
        questions: Vec<Question>,
        reason: String,
    },
}

impl FetchOutcome {
    pub fn questions(&self) -> &[Question] {
        match self {
            FetchOutcome::Fetched(questions) => questions,
            FetchOutcome::Fallback { questions, .. } => questions,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback { .. })
    }

    pub fn into_questions(self) -> Vec<Question> {
        match self {
            FetchOutcome::Fetched(questions) => questions,
            FetchOutcome::Fallback { questions, .. } => questions,
        }
    }
}

/// The fixed general-knowledge set used when generation fails.
pub fn fallback_questions() -> Vec<Question> {
    [
        (
            "Which ancient civilization built the Machu Picchu complex?",
            ["Aztec", "Maya", "Inca", "Olmec"],
            "Inca",
            Difficulty::Easy,
        ),
        (
            "Who painted 'The School of Athens'?",
            ["Michelangelo", "Leonardo da Vinci", "Raphael", "Donatello"],
            "Raphael",
            Difficulty::Medium,
        ),
        (
            "What is the chemical symbol for Gold?",
            ["Ag", "Au", "Fe", "Cu"],
            "Au",
            Difficulty::Easy,
        ),
    ]
    .into_iter()
    .filter_map(|(prompt, options, correct, difficulty)| {
        let options = options.iter().map(|o| o.to_string()).collect();
        Question::new(prompt, options, correct, difficulty).ok()
    })
    .collect()
}

/// Source backed by a generative-AI provider.
pub struct GeneratedQuestionSource {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl GeneratedQuestionSource {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Fetch with visibility into whether the fallback was used.
    pub async fn fetch_outcome(&self, topic: &str, count: usize) -> FetchOutcome {
        if count == 0 {
            return FetchOutcome::Fetched(Vec::new());
        }

        match self.try_fetch(topic, count).await {
            Ok(questions) => {
                tracing::info!(
                    provider = self.provider.name(),
                    topic,
                    "generated {} questions",
                    questions.len()
                );
                FetchOutcome::Fetched(questions)
            }
            Err(e) => {
                let provider_error = e.downcast_ref::<ProviderError>();
                let permanent = provider_error.is_some_and(ProviderError::is_permanent);
                if let Some(retry_after_ms) =
                    provider_error.and_then(ProviderError::retry_after_ms)
                {
                    tracing::warn!(
                        provider = self.provider.name(),
                        retry_after_ms,
                        "rate limited, using fallback set"
                    );
                } else if permanent {
                    tracing::warn!(
                        provider = self.provider.name(),
                        "question generation unavailable, check provider config: {e:#}"
                    );
                } else {
                    tracing::warn!(
                        provider = self.provider.name(),
                        topic,
                        "question generation failed, using fallback set: {e:#}"
                    );
                }
                FetchOutcome::Fallback {
                    questions: fallback_questions(),
                    reason: format!("{e:#}"),
                }
            }
        }
    }

    async fn try_fetch(&self, topic: &str, count: usize) -> anyhow::Result<Vec<Question>> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: trivia_prompt(topic, count),
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_TOKENS,
            temperature: self.temperature,
            response_schema: Some(question_schema()),
        };

        let response = tokio::time::timeout(self.timeout, self.provider.generate(&request))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;

        Ok(parse_questions(&response.content, count)?)
    }
}

#[async_trait]
impl QuestionSource for GeneratedQuestionSource {
    async fn fetch_questions(&self, topic: &str, count: usize) -> Vec<Question> {
        self.fetch_outcome(topic, count).await.into_questions()
    }
}

/// Source that serves a fixed list, ignoring the topic.
#[derive(Debug, Clone)]
pub struct StaticQuestionSource {
    questions: Vec<Question>,
}

impl StaticQuestionSource {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Serves the fallback set; used for offline play.
    pub fn fallback() -> Self {
        Self::new(fallback_questions())
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch_questions(&self, _topic: &str, count: usize) -> Vec<Question> {
        self.questions.iter().take(count).cloned().collect()
    }
}
