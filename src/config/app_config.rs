use std::env;
use std::error::Error;

use super::probe_config::ProbeConfig;

/// Load the probe configuration from a YAML file.
/// A `.env` file is honoured first, then the file named by the `CONFIG_FILE`
/// environment variable (default `config.yml`) is read and parsed into a `ProbeConfig`.
pub fn load_config() -> Result<ProbeConfig, Box<dyn Error>> {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    let config_file_location =
        env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yml".to_string());
    let config_str = std::fs::read_to_string(&config_file_location)
        .map_err(|e| format!("Failed to read {config_file_location}: {e}"))?;

    let config = parse_config(&config_str)?;
    log::info!(
        "Loaded probe for {} {} from {}",
        config.method,
        config.address,
        config_file_location
    );
    Ok(config)
}

/// Parse a probe configuration from its YAML representation.
pub fn parse_config(yaml: &str) -> Result<ProbeConfig, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}
