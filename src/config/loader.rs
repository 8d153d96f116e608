//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PrefillConfig;
use super::secret::secret_string_opt;
use crate::domain::errors::PrefillError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PrefillConfig
/// 4. Applies environment variable overrides (PREFILL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is unset
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use prefill::config::loader::load_config;
///
/// let config = load_config("prefill.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PrefillConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PrefillError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PrefillError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PrefillConfig = toml::from_str(&contents)
        .map_err(|e| PrefillError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PrefillError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced environment variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PrefillError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(PrefillError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using PREFILL_* prefix
///
/// Environment variables follow the pattern: PREFILL_<SECTION>_<KEY>
/// For example: PREFILL_CONNECTOR_BASE_URL, PREFILL_CONNECTOR_WORKPLACE_ID
fn apply_env_overrides(config: &mut PrefillConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("PREFILL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Connector overrides
    let connector = &mut config.connector;
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_BASE_URL") {
        connector.base_url = val;
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_MANDANT_ID") {
        connector.mandant_id = val;
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_CLIENT_SYSTEM_ID") {
        connector.client_system_id = val;
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_WORKPLACE_ID") {
        connector.workplace_id = val;
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_USER_ID") {
        connector.user_id = Some(val);
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_USERNAME") {
        connector.username = Some(val);
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_PASSWORD") {
        connector.password = secret_string_opt(Some(val));
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_TLS_VERIFY") {
        connector.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_TLS_CA_CERT") {
        connector.tls_ca_cert = Some(val);
    }
    if let Ok(val) = std::env::var("PREFILL_CONNECTOR_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            connector.timeout_seconds = timeout;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PREFILL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("PREFILL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
