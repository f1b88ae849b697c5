//! The coin ledger: the single place a finished session's reward lands.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything that can be credited with coins.
///
/// `credit` is the only mutation the session engine performs. Callers pass a
/// positive amount.
pub trait Ledger: Send + Sync {
    fn credit(&self, amount: u64, description: &str);
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// One entry in the wallet's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub title: String,
    pub amount: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
}

/// Starting balance granted to a fresh wallet.
pub const WELCOME_BONUS: u64 = 100;

/// Default player name.
pub const DEFAULT_USERNAME: &str = "NoblePlayer";

#[derive(Debug)]
struct WalletState {
    balance: u64,
    transactions: Vec<Transaction>,
}

/// In-memory wallet: a balance plus its transaction history.
#[derive(Debug)]
pub struct Wallet {
    username: String,
    state: Mutex<WalletState>,
}

impl Wallet {
    /// An empty wallet with no history.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            state: Mutex::new(WalletState {
                balance: 0,
                transactions: Vec::new(),
            }),
        }
    }

    /// A wallet seeded with a "Welcome Bonus" credit.
    pub fn with_welcome_bonus(username: impl Into<String>, bonus: u64) -> Self {
        let wallet = Self::new(username);
        wallet.credit(bonus, "Welcome Bonus");
        wallet
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn balance(&self) -> u64 {
        self.lock().balance
    }

    /// Full history, oldest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    /// The `n` most recent transactions, newest first.
    pub fn recent(&self, n: usize) -> Vec<Transaction> {
        self.lock()
            .transactions
            .iter()
            .rev()
            .take(n)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, WalletState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::with_welcome_bonus(DEFAULT_USERNAME, WELCOME_BONUS)
    }
}

impl Ledger for Wallet {
    fn credit(&self, amount: u64, description: &str) {
        if amount == 0 {
            tracing::debug!("ignoring zero credit: {description}");
            return;
        }

        let mut state = self.lock();
        state.balance = state.balance.saturating_add(amount);
        state.transactions.push(Transaction {
            id: Uuid::new_v4(),
            title: description.to_string(),
            amount,
            timestamp: Utc::now(),
            kind: TransactionKind::Credit,
        });
        tracing::info!(
            user = %self.username,
            amount,
            balance = state.balance,
            "credited: {description}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wallet_has_welcome_bonus() {
        let wallet = Wallet::default();
        assert_eq!(wallet.username(), "NoblePlayer");
        assert_eq!(wallet.balance(), 100);
        let history = wallet.transactions();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Welcome Bonus");
        assert_eq!(history[0].kind, TransactionKind::Credit);
    }

    #[test]
    fn credit_appends_and_increases_balance() {
        let wallet = Wallet::new("tester");
        wallet.credit(50, "Oracle's Challenge Reward (3/3)");
        wallet.credit(20, "Oracle's Challenge Reward (2/3)");

        assert_eq!(wallet.balance(), 70);
        let history = wallet.transactions();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].amount, 50);
        assert_eq!(history[1].title, "Oracle's Challenge Reward (2/3)");
        assert_ne!(history[0].id, history[1].id);
    }

    #[test]
    fn zero_credit_is_ignored() {
        let wallet = Wallet::new("tester");
        wallet.credit(0, "nothing");
        assert_eq!(wallet.balance(), 0);
        assert!(wallet.transactions().is_empty());
    }

    #[test]
    fn recent_is_newest_first() {
        let wallet = Wallet::with_welcome_bonus("tester", 100);
        for amount in [10, 20, 30] {
            wallet.credit(amount, "reward");
        }
        let recent = wallet.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount, 30);
        assert_eq!(recent[1].amount, 20);
        assert_eq!(wallet.recent(10).len(), 4);
    }

    #[test]
    fn transaction_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Credit).unwrap(),
            "\"credit\""
        );
    }
}
