//! Provider error types.
//!
//! The enum itself is defined in `aureus-core` so the question source can
//! classify failures; it is re-exported here for provider implementations.

pub use aureus_core::error::ProviderError;
