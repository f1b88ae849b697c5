//! The pool of themes a session draws its topic from.

use rand::seq::SliceRandom;
use rand::Rng;

/// Themes offered by the Oracle, one of which is chosen per session.
pub const TOPIC_POOL: [&str; 5] = [
    "Ancient History",
    "Renaissance Art",
    "Classical Music",
    "Natural Philosophy",
    "Mythology",
];

/// Topic used when a caller does not name one.
pub const DEFAULT_TOPIC: &str = "general knowledge";

/// Pick one topic uniformly at random. Falls back to [`DEFAULT_TOPIC`] for an
/// empty pool.
pub fn pick_topic<R: Rng + ?Sized>(pool: &[String], rng: &mut R) -> String {
    pool.choose(rng)
        .cloned()
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string())
}

/// The built-in pool as owned strings.
pub fn default_topics() -> Vec<String> {
    TOPIC_POOL.iter().map(|t| t.to_string()).collect()
}
