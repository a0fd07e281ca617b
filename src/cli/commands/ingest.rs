//! Ingest command implementation
//!
//! This module implements the `ingest` command: it builds (or reads) a
//! file-landed event payload, runs it through the harmonization dispatcher,
//! and prints the resulting report as JSON.

use crate::config::load_config;
use crate::core::dispatch::Dispatcher;
use clap::Args;
use serde_json::json;
use std::fs;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Bucket holding the landed object
    #[arg(short, long, requires = "name")]
    pub bucket: Option<String>,

    /// Object path within the bucket (e.g. csv/batch-01.csv)
    #[arg(short, long, requires = "bucket")]
    pub name: Option<String>,

    /// Path to a file containing the raw event payload JSON
    #[arg(long, conflicts_with_all = ["bucket", "name"])]
    pub event_file: Option<String>,

    /// Dry run mode - parse and map without submitting to the FHIR store
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting ingest command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply dry-run flag from CLI
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        // Build the event payload
        let payload = match (&self.event_file, &self.bucket, &self.name) {
            (Some(path), _, _) => {
                let raw = fs::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            (None, Some(bucket), Some(name)) => json!({"bucket": bucket, "name": name}),
            _ => {
                eprintln!("Either --event-file or both --bucket and --name are required");
                return Ok(2);
            }
        };

        let dispatcher = match Dispatcher::from_config(&config) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match dispatcher.handle(&payload).await {
            Ok(report) => {
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Ingestion failed");
                eprintln!("Error: {e}");
                // Bad event shapes are the caller's fault; everything else
                // is a processing failure.
                Ok(match e.http_status() {
                    400 => 4,
                    _ => 5,
                })
            }
        }
    }
}
