//! Trivia session engine.
//!
//! Drives one playthrough at a time through `Idle → Loading → InProgress →
//! Finished`. Every session is stamped with a generation number; the question
//! fetch and the delayed advance after an answer both carry the generation
//! they were started under, and anything that completes for a superseded
//! generation is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ledger::Ledger;
use crate::model::Question;
use crate::reward::{is_perfect, reward, reward_description};
use crate::source::QuestionSource;
use crate::topics::{default_topics, pick_topic};

/// Configuration for the session engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Questions requested per session.
    pub question_count: usize,
    /// Pause between answering and moving on, so the player sees the verdict.
    pub advance_delay: Duration,
    /// Topic pool a session draws from.
    pub topics: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            question_count: 3,
            advance_delay: Duration::from_millis(1500),
            topics: default_topics(),
        }
    }
}

/// Where the engine is in a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    InProgress,
    Finished,
}

/// The coarse state a host UI routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Idle,
    Active,
    Finished,
}

impl From<Phase> for Screen {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Idle => Screen::Idle,
            Phase::Loading | Phase::InProgress => Screen::Active,
            Phase::Finished => Screen::Finished,
        }
    }
}

/// The player's answer to one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    pub selected: Option<String>,
    pub correct: Option<bool>,
}

/// Settled outcome of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub reward: u64,
    pub perfect: bool,
    /// Whether the reward was handed to the ledger.
    pub credited: bool,
}

/// What happened to an answer action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// No session in progress, or the current question was already answered.
    Ignored,
    Recorded {
        correct: bool,
        correct_option: String,
    },
}

/// Read-only picture of the engine for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: Phase,
    pub topic: Option<String>,
    /// 0-based position of the current question.
    pub question_index: usize,
    pub total_questions: usize,
    /// The question on screen; only set while in progress.
    pub question: Option<Question>,
    pub selected: Option<String>,
    pub is_correct: Option<bool>,
    pub score: u32,
    pub result: Option<SessionResult>,
}

impl SessionView {
    fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            topic: None,
            question_index: 0,
            total_questions: 0,
            question: None,
            selected: None,
            is_correct: None,
            score: 0,
            result: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.phase.into()
    }
}

struct Session {
    topic: String,
    questions: Vec<Question>,
    index: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
}

impl Session {
    fn new(topic: String) -> Self {
        Self {
            topic,
            questions: Vec::new(),
            index: 0,
            score: 0,
            answers: Vec::new(),
        }
    }

    fn install(&mut self, questions: Vec<Question>) {
        self.answers = vec![AnswerRecord::default(); questions.len()];
        self.questions = questions;
        self.index = 0;
        self.score = 0;
    }

    /// Correct answers according to the settled answer records.
    fn settled_score(&self) -> u32 {
        self.answers
            .iter()
            .filter(|a| a.correct == Some(true))
            .count() as u32
    }
}

struct Inner {
    phase: Phase,
    generation: u64,
    session: Option<Session>,
    result: Option<SessionResult>,
    pending_advance: Option<JoinHandle<()>>,
}

impl Inner {
    /// Drop the current session and invalidate everything it scheduled.
    fn reset(&mut self) {
        if let Some(handle) = self.pending_advance.take() {
            handle.abort();
        }
        self.generation += 1;
        self.session = None;
        self.result = None;
    }

    /// Settle the session and enter `Finished`. Returns the ledger credit to
    /// make, if any.
    fn finish(&mut self) -> Option<(u64, String)> {
        let session = self.session.as_ref()?;
        let score = session.settled_score();
        let total = session.questions.len() as u32;
        let amount = reward(score, total);
        let credit = (amount > 0).then(|| (amount, reward_description(score, total)));

        tracing::info!(
            topic = %session.topic,
            score,
            total,
            reward = amount,
            "trivia session finished"
        );

        self.result = Some(SessionResult {
            topic: session.topic.clone(),
            score,
            total,
            reward: amount,
            perfect: is_perfect(score, total),
            credited: credit.is_some(),
        });
        self.phase = Phase::Finished;
        credit
    }

    fn view(&self) -> SessionView {
        let Some(session) = &self.session else {
            return SessionView {
                phase: self.phase,
                result: self.result.clone(),
                ..SessionView::idle()
            };
        };

        let in_progress = self.phase == Phase::InProgress;
        let record = session.answers.get(session.index).filter(|_| in_progress);

        SessionView {
            phase: self.phase,
            topic: Some(session.topic.clone()),
            question_index: session.index,
            total_questions: session.questions.len(),
            question: session
                .questions
                .get(session.index)
                .filter(|_| in_progress)
                .cloned(),
            selected: record.and_then(|r| r.selected.clone()),
            is_correct: record.and_then(|r| r.correct),
            score: session.score,
            result: self.result.clone(),
        }
    }
}

struct Shared {
    ledger: Arc<dyn Ledger>,
    state: Mutex<Inner>,
    updates: watch::Sender<SessionView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(inner.view());
    }

    /// Hand a finished session's reward to the ledger, then announce it.
    fn settle(&self, credit: Option<(u64, String)>) {
        if let Some((amount, description)) = credit {
            self.ledger.credit(amount, &description);
        }
        let inner = self.lock();
        self.publish(&inner);
    }

    /// Fired by the delayed-advance task.
    fn advance(&self, generation: u64, index: usize) {
        let credit = {
            let mut inner = self.lock();
            if inner.generation != generation || inner.phase != Phase::InProgress {
                tracing::debug!(generation, "dropping stale advance");
                return;
            }
            inner.pending_advance = None;

            let Some(session) = inner.session.as_mut() else {
                return;
            };
            if session.index != index {
                tracing::debug!(index, "dropping advance for an earlier question");
                return;
            }

            if index + 1 < session.questions.len() {
                session.index += 1;
                self.publish(&inner);
                return;
            }
            inner.finish()
        };
        self.settle(credit);
    }
}

/// Puts the engine back to `Idle` if a `start` is dropped mid-fetch.
struct LoadingGuard<'a> {
    shared: &'a Shared,
    generation: u64,
}

impl LoadingGuard<'_> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        if inner.generation != self.generation || inner.phase != Phase::Loading {
            return;
        }
        tracing::debug!(generation = self.generation, "question fetch abandoned");
        inner.reset();
        inner.phase = Phase::Idle;
        self.shared.publish(&inner);
    }
}

/// Runs trivia sessions against a question source and a ledger.
///
/// `answer` schedules its delayed advance with `tokio::spawn`, so it must be
/// called from within a Tokio runtime.
#[derive(Clone)]
pub struct SessionEngine {
    source: Arc<dyn QuestionSource>,
    config: EngineConfig,
    shared: Arc<Shared>,
}

impl SessionEngine {
    pub fn new(
        source: Arc<dyn QuestionSource>,
        ledger: Arc<dyn Ledger>,
        config: EngineConfig,
    ) -> Self {
        let (updates, _) = watch::channel(SessionView::idle());
        Self {
            source,
            config,
            shared: Arc::new(Shared {
                ledger,
                state: Mutex::new(Inner {
                    phase: Phase::Idle,
                    generation: 0,
                    session: None,
                    result: None,
                    pending_advance: None,
                }),
                updates,
            }),
        }
    }

    /// Start a new session (also "play again").
    ///
    /// Picks a random topic, fetches questions and enters `InProgress`, or
    /// `Finished` straight away when the source had nothing to offer. Returns
    /// `false` if the start was refused because a fetch is already in flight,
    /// or if the session was abandoned before its questions arrived.
    pub async fn start(&self) -> bool {
        let (generation, topic) = {
            let mut inner = self.shared.lock();
            if inner.phase == Phase::Loading {
                tracing::debug!("start ignored, questions already loading");
                return false;
            }
            inner.reset();
            let topic = pick_topic(&self.config.topics, &mut rand::thread_rng());
            inner.session = Some(Session::new(topic.clone()));
            inner.phase = Phase::Loading;
            self.shared.publish(&inner);
            (inner.generation, topic)
        };

        tracing::info!(%topic, count = self.config.question_count, "starting trivia session");
        let loading = LoadingGuard {
            shared: &self.shared,
            generation,
        };
        let questions = self
            .source
            .fetch_questions(&topic, self.config.question_count)
            .await;
        loading.disarm();

        let credit = {
            let mut inner = self.shared.lock();
            if inner.generation != generation || inner.phase != Phase::Loading {
                tracing::debug!(generation, "discarding questions for an abandoned session");
                return false;
            }
            let Some(session) = inner.session.as_mut() else {
                return false;
            };
            session.install(questions);

            if session.questions.is_empty() {
                tracing::warn!(%topic, "no questions available, finishing with nothing to play");
                inner.finish()
            } else {
                inner.phase = Phase::InProgress;
                self.shared.publish(&inner);
                return true;
            }
        };
        self.shared.settle(credit);
        true
    }

    /// Answer the current question.
    ///
    /// Only the first answer per question counts; it is scored by exact match
    /// and the move to the next question is scheduled after the configured
    /// delay. Anything else is ignored.
    pub fn answer(&self, option: &str) -> AnswerOutcome {
        let mut inner = self.shared.lock();
        if inner.phase != Phase::InProgress {
            tracing::debug!(phase = ?inner.phase, "answer ignored, no session in progress");
            return AnswerOutcome::Ignored;
        }
        let generation = inner.generation;

        let Some(session) = inner.session.as_mut() else {
            return AnswerOutcome::Ignored;
        };
        let index = session.index;
        let (Some(question), Some(record)) =
            (session.questions.get(index), session.answers.get_mut(index))
        else {
            return AnswerOutcome::Ignored;
        };
        if record.selected.is_some() {
            tracing::debug!(index, "answer ignored, question already answered");
            return AnswerOutcome::Ignored;
        }

        let correct = question.is_correct(option);
        let correct_option = question.correct_option().to_string();
        record.selected = Some(option.to_string());
        record.correct = Some(correct);
        if correct {
            session.score += 1;
        }

        let shared = Arc::clone(&self.shared);
        let delay = self.config.advance_delay;
        inner.pending_advance = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.advance(generation, index);
        }));
        self.shared.publish(&inner);

        AnswerOutcome::Recorded {
            correct,
            correct_option,
        }
    }

    /// Abandon whatever is going on and go back to `Idle`.
    pub fn return_home(&self) {
        let mut inner = self.shared.lock();
        inner.reset();
        inner.phase = Phase::Idle;
        self.shared.publish(&inner);
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().phase
    }

    pub fn screen(&self) -> Screen {
        self.phase().into()
    }

    pub fn snapshot(&self) -> SessionView {
        self.shared.lock().view()
    }

    /// Watch the engine; a new view is published after every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.shared.updates.subscribe()
    }
}
