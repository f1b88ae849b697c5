//! The `aureus list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use aureus_providers::config::load_config_from;
use aureus_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;
    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }

        let provider = create_provider(name, &config.providers[name])?;
        let models = provider.available_models();
        if models.is_empty() {
            continue;
        }

        found_any = true;
        let default = if *name == config.default_provider {
            " (default)"
        } else {
            ""
        };
        println!("Provider: {name}{default}");
        for model in &models {
            println!(
                "  {} - {} ({}K context)",
                model.id,
                model.name,
                model.max_context / 1000,
            );
        }
        println!();
    }

    if !found_any {
        println!("No providers configured. Run `aureus init` to create a config file.");
    }

    Ok(())
}
