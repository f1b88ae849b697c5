//! The `aureus init` command.

use anyhow::Result;

const CONFIG_FILE: &str = "aureus.toml";

pub fn execute() -> Result<()> {
    if std::path::Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }

    std::fs::write(CONFIG_FILE, SAMPLE_CONFIG)?;
    println!("Created {CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit {CONFIG_FILE})");
    println!("  2. Run: aureus play");
    println!("  3. No key yet? Run: aureus play --offline");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# aureus configuration

default_provider = "gemini"
default_model = "gemini-2.5-flash"
temperature = 0.7
question_count = 3
advance_delay_ms = 1500
fetch_timeout_secs = 30
username = "NoblePlayer"
welcome_bonus = 100
topics = [
    "Ancient History",
    "Renaissance Art",
    "Classical Music",
    "Natural Philosophy",
    "Mythology",
]

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
"#;
