//! Reward calculation for finished trivia sessions.

/// Coins earned per correct answer.
pub const COINS_PER_CORRECT: u64 = 10;

/// One-time bonus for answering every question of a non-empty session.
pub const PERFECT_BONUS: u64 = 20;

/// Coins earned for `score` correct answers out of `total`.
///
/// `10 * score`, plus `20` when every question was answered correctly and
/// there was at least one question.
pub fn reward(score: u32, total: u32) -> u64 {
    let base = u64::from(score) * COINS_PER_CORRECT;
    if is_perfect(score, total) {
        base + PERFECT_BONUS
    } else {
        base
    }
}

/// Whether a score counts as a perfect run.
pub fn is_perfect(score: u32, total: u32) -> bool {
    total > 0 && score == total
}

/// The most a session of `total` questions can pay out.
pub fn max_reward(total: u32) -> u64 {
    reward(total, total)
}

/// Ledger description for a session reward.
pub fn reward_description(score: u32, total: u32) -> String {
    format!("Oracle's Challenge Reward ({score}/{total})")
}
