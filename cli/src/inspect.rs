#![deny(missing_docs)]

//! # Inspect Command
//!
//! Prints the normalized specification without calling any remote service.

use std::path::PathBuf;

use apidoc_core::{load_spec, Specification};

use crate::error::{CliError, CliResult};

/// Serialization used for the dump.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the OpenAPI spec file (JSON or YAML).
    pub spec: PathBuf,

    /// Dump format.
    #[clap(long, value_enum, default_value_t = DumpFormat::Json)]
    pub format: DumpFormat,
}

/// Executes the inspection.
pub fn execute(args: &InspectArgs) -> CliResult<()> {
    let spec = load_spec(&args.spec)?;
    println!("{}", dump(&spec, args.format)?);
    Ok(())
}

/// Serializes the specification.
pub fn dump(spec: &Specification, format: DumpFormat) -> CliResult<String> {
    match format {
        DumpFormat::Json => serde_json::to_string_pretty(spec)
            .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e))),
        DumpFormat::Yaml => serde_yaml::to_string(spec)
            .map_err(|e| CliError::General(format!("Failed to serialize YAML: {}", e))),
    }
}
