// Configuration loader
// Loads provider credentials and run settings from ~/.elicit/config.toml
// or environment variables

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::provider::ProviderEntry;
use super::settings::Config;

/// `~/.elicit/config.toml`, if a home directory can be determined
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration.
///
/// Resolution order: the explicit path (must exist), then
/// `~/.elicit/config.toml`, then `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(config) = config_from_env(|key| std::env::var(key).ok()) {
        tracing::debug!(
            provider = config.provider.display_name(),
            "Using provider from environment"
        );
        config.validate().context("Configuration validation failed")?;
        return Ok(config);
    }

    bail!(
        "No configuration found. Create {} with:\n\n\
        [provider]\n\
        type = \"openai\"\n\
        api_key = \"sk-...\"\n\n\
        Alternatively, set an environment variable:\n\
        export OPENAI_API_KEY=\"sk-...\"  or  export ANTHROPIC_API_KEY=\"sk-ant-...\"",
        default_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("~/{CONFIG_DIR_NAME}/{CONFIG_FILE_NAME}"))
    );
}

/// Load and validate a TOML configuration file
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::debug!(
        path = %path.display(),
        provider = config.provider.display_name(),
        "Loaded configuration"
    );

    Ok(config)
}

fn config_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<Config> {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_key) = non_empty("OPENAI_API_KEY") {
        return Some(Config::new(ProviderEntry::Openai {
            api_key,
            model: None,
            base_url: None,
        }));
    }

    if let Some(api_key) = non_empty("ANTHROPIC_API_KEY") {
        return Some(Config::new(ProviderEntry::Claude {
            api_key,
            model: None,
            base_url: None,
        }));
    }

    None
}
