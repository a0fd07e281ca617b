//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "concord.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Concord configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point storage at your landing bucket (http or local backend)");
                println!("  3. Set the FHIR store base URL and credentials:");
                println!("     - Set CONCORD_FHIR_TOKEN (if using bearer auth)");
                println!("     - Set CONCORD_FHIR_USERNAME / CONCORD_FHIR_PASSWORD (if basic)");
                println!("  4. Validate configuration: concord validate-config");
                println!("  5. Ingest a file: concord ingest --bucket landing --name csv/batch-01.csv");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Concord Configuration File
# Clinical Record Harmonization Engine

[application]
log_level = "info"
dry_run = false

[storage]
backend = "http"  # http | local
base_url = "https://storage.example.com"
# root_path = "./data"  # for the local backend
timeout_seconds = 30

[fhir]
base_url = "https://fhir.example.com/fhir"

# Authentication (none, basic, or bearer)
auth_type = "bearer"
token = "${CONCORD_FHIR_TOKEN}"

[ingestion]
archive_processed = false

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Concord Configuration File
# Clinical Record Harmonization Engine
#
# This file contains all configuration options with examples and explanations.
#
# Concord ingests files landed in object storage (CSV extracts, HL7v2-style
# segmented messages, or pre-built FHIR bundles), maps them to FHIR
# Patient/Observation resources, and submits them to a FHIR store as one
# atomic transaction per file.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (parse and map but don't submit to the FHIR store)
dry_run = false

# ============================================================================
# Object Storage Configuration
# ============================================================================
[storage]
# Backend: "http" for a REST object store, "local" for a filesystem root
backend = "http"

# Base URL of the HTTP object store (objects addressed as {base_url}/{bucket}/{name})
base_url = "https://storage.example.com"

# Root directory for the local backend (bucket maps to a subdirectory)
# root_path = "./data"

# Optional bearer token for the HTTP backend
# token = "${CONCORD_STORAGE_TOKEN}"

# Request timeout in seconds
timeout_seconds = 30

# ============================================================================
# FHIR Store Configuration
# ============================================================================
[fhir]
# Base URL of the FHIR store; transaction bundles are POSTed here
base_url = "https://fhir.example.com/fhir"

# Authentication type (none, basic, or bearer)
auth_type = "bearer"

# Bearer token (use environment variable)
token = "${CONCORD_FHIR_TOKEN}"

# Basic auth credentials (when auth_type = "basic")
# username = "${CONCORD_FHIR_USERNAME}"
# password = "${CONCORD_FHIR_PASSWORD}"

# Request timeout in seconds
timeout_seconds = 30

# Transport-level retry with exponential backoff
[fhir.retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

# ============================================================================
# Ingestion Behavior
# ============================================================================
[ingestion]
# Move successfully submitted objects under the processed/ prefix
archive_processed = false

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging (JSON, rotated)
local_enabled = false

# Local log file path
local_path = "logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "concord.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "concord.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let config = InitArgs::generate_minimal_config();
        assert!(config.contains("[application]"));
        assert!(config.contains("[storage]"));
        assert!(config.contains("[fhir]"));
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = InitArgs::generate_config_with_examples();
        assert!(config.contains("# Concord Configuration File"));
        assert!(config.contains("archive_processed"));
        assert!(config.contains("[fhir.retry]"));
    }

    #[test]
    fn test_generated_configs_parse_as_toml() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let parsed: std::result::Result<toml::Value, _> = toml::from_str(&content);
            assert!(parsed.is_ok());
        }
    }
}
