//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ConcordConfig;
use crate::domain::errors::ConcordError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ConcordConfig
/// 4. Applies environment variable overrides (CONCORD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use concord::config::load_config;
///
/// let config = load_config("concord.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ConcordConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConcordError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ConcordError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ConcordConfig = toml::from_str(&contents)
        .map_err(|e| ConcordError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ConcordError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Referencing an unset variable is an
/// error so misconfigured deployments fail at startup instead of sending
/// literal placeholders over the wire.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ConcordError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the CONCORD_* prefix
///
/// Environment variables follow the pattern: CONCORD_<SECTION>_<KEY>
/// For example: CONCORD_FHIR_BASE_URL, CONCORD_APPLICATION_DRY_RUN
fn apply_env_overrides(config: &mut ConcordConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("CONCORD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("CONCORD_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Storage overrides
    if let Ok(val) = std::env::var("CONCORD_STORAGE_BASE_URL") {
        config.storage.base_url = Some(val);
    }
    if let Ok(val) = std::env::var("CONCORD_STORAGE_ROOT_PATH") {
        config.storage.root_path = Some(val);
    }
    if let Ok(val) = std::env::var("CONCORD_STORAGE_TOKEN") {
        config.storage.token = Some(val);
    }

    // FHIR store overrides
    if let Ok(val) = std::env::var("CONCORD_FHIR_BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Ok(val) = std::env::var("CONCORD_FHIR_AUTH_TYPE") {
        config.fhir.auth_type = val;
    }
    if let Ok(val) = std::env::var("CONCORD_FHIR_USERNAME") {
        config.fhir.username = Some(val);
    }
    if let Ok(val) = std::env::var("CONCORD_FHIR_PASSWORD") {
        config.fhir.password = Some(val);
    }
    if let Ok(val) = std::env::var("CONCORD_FHIR_TOKEN") {
        config.fhir.token = Some(val);
    }

    // Ingestion overrides
    if let Ok(val) = std::env::var("CONCORD_INGESTION_ARCHIVE_PROCESSED") {
        config.ingestion.archive_processed = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CONCORD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CONCORD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
