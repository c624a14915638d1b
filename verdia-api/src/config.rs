//! Research provider configuration resolution
//!
//! The summarization endpoint needs an API key. Resolution priority is
//! ENV → TOML, with a warning when both are set.

use std::time::Duration;
use tracing::{info, warn};
use verdia_common::config::TomlConfig;
use verdia_common::{Error, Result};

use crate::research::ResearchClientSettings;

/// Environment variable holding the summarization API key
pub const SUMMARY_API_KEY_ENV: &str = "VERDIA_SUMMARY_API_KEY";

/// Default per-call timeout for provider requests
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Resolve the summarization API key from ENV → TOML
pub fn resolve_summary_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(SUMMARY_API_KEY_ENV).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .research
        .summary_api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Summary API key found in both environment and TOML config. \
             Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Summary API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("Summary API key loaded from TOML config");
        return Ok(key);
    }

    Err(Error::Config(format!(
        "Summary API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: research.summary_api_key = \"your-key\"",
        SUMMARY_API_KEY_ENV
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Per-call timeout for provider requests
pub fn provider_timeout(toml_config: &TomlConfig) -> Duration {
    Duration::from_secs(
        toml_config
            .research
            .timeout_secs
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
    )
}

/// Build research client settings from the TOML config, with endpoint and
/// model overrides applied on top of the compiled defaults
pub fn research_client_settings(toml_config: &TomlConfig) -> Result<ResearchClientSettings> {
    let api_key = resolve_summary_api_key(toml_config)?;
    let mut settings = ResearchClientSettings::new(api_key, provider_timeout(toml_config));

    if let Some(model) = &toml_config.research.summary_model {
        settings.summary_model = model.clone();
    }
    if let Some(url) = &toml_config.research.evidence_base_url {
        settings.evidence_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = &toml_config.research.summary_base_url {
        settings.summary_base_url = url.trim_end_matches('/').to_string();
    }

    Ok(settings)
}
