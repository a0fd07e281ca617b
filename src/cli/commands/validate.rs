//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Concord configuration file.

use crate::config::load_config;
use crate::config::StorageBackend;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load configuration (load_config validates as part of loading)
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);

        match config.storage.backend {
            StorageBackend::Http => {
                println!("  Storage Backend: http");
                println!(
                    "  Storage Base URL: {}",
                    config.storage.base_url.as_deref().unwrap_or("-")
                );
            }
            StorageBackend::Local => {
                println!("  Storage Backend: local");
                println!(
                    "  Storage Root: {}",
                    config.storage.root_path.as_deref().unwrap_or("-")
                );
            }
        }

        println!("  FHIR Store: {}", config.fhir.base_url);
        println!("  FHIR Auth Type: {}", config.fhir.auth_type);
        println!("  Archive Processed: {}", config.ingestion.archive_processed);
        println!("  File Logging: {}", config.logging.local_enabled);
        println!();
        Ok(0)
    }
}
