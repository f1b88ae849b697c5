//! aureus-core: trivia session engine, question model, rewards and ledger.
//!
//! This crate holds everything the rewards arcade needs apart from the
//! concrete AI backends: validated questions, the never-failing question
//! source, the reward formula, the wallet ledger and the session engine that
//! ties them together.

pub mod engine;
pub mod error;
pub mod ledger;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod reward;
pub mod source;
pub mod topics;
pub mod traits;
