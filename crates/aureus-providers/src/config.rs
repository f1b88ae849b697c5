//! Arcade configuration and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use aureus_core::engine::EngineConfig;
use aureus_core::ledger::{DEFAULT_USERNAME, WELCOME_BONUS};
use aureus_core::source::DEFAULT_FETCH_TIMEOUT;
use aureus_core::topics::default_topics;
use aureus_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single question-generation backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Mock {
        /// Fixed response text; the built-in batch when absent.
        #[serde(default)]
        response: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Mock { response } => f
                .debug_struct("Mock")
                .field("response", &response.as_ref().map(|r| r.len()))
                .finish(),
        }
    }
}

/// Top-level arcade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used when none is named.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model used when none is named.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature; some variety keeps replays fresh.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Questions per session.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Pause after an answer before the next question, in milliseconds.
    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,
    /// Upper bound on one generation call before falling back, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Player name shown on the wallet.
    #[serde(default = "default_username")]
    pub username: String,
    /// Coins granted to a fresh wallet.
    #[serde(default = "default_welcome_bonus")]
    pub welcome_bonus: u64,
    /// Topic pool sessions draw from.
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_question_count() -> usize {
    3
}
fn default_advance_delay() -> u64 {
    1500
}
fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}
fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}
fn default_welcome_bonus() -> u64 {
    WELCOME_BONUS
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            question_count: default_question_count(),
            advance_delay_ms: default_advance_delay(),
            fetch_timeout_secs: default_fetch_timeout(),
            username: default_username(),
            welcome_bonus: default_welcome_bonus(),
            topics: default_topics(),
        }
    }
}

impl ArcadeConfig {
    /// Session engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            question_count: self.question_count,
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            topics: self.topics.clone(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Check value ranges a TOML file can get wrong.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.question_count >= 1, "question_count must be at least 1");
        anyhow::ensure!(
            (0.0..=2.0).contains(&self.temperature),
            "temperature must be between 0.0 and 2.0"
        );
        anyhow::ensure!(!self.topics.is_empty(), "topics must not be empty");
        anyhow::ensure!(self.fetch_timeout_secs >= 1, "fetch_timeout_secs must be at least 1");
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Mock { response } => ProviderConfig::Mock {
            response: response.clone(),
        },
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `aureus.toml` in the current directory
/// 2. `~/.config/aureus/config.toml`
///
/// Environment variable overrides: `AUREUS_GEMINI_KEY`, `AUREUS_OPENAI_KEY`.
pub fn load_config_from(path: Option<&Path>) -> Result<ArcadeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("aureus.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ArcadeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ArcadeConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("AUREUS_GEMINI_KEY") {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("AUREUS_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("aureus"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    tracing::debug!(provider = name, "creating provider");
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Ok(Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?)),
        ProviderConfig::Mock { response } => Ok(Box::new(match response {
            Some(r) => MockProvider::with_fixed_response(r),
            None => MockProvider::default(),
        })),
    }
}
