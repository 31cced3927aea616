// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuromesh Configuration
//!
//! TOML-based configuration (`neuromesh.toml`) with environment-variable
//! overrides and an explicit validation pass. Every section has defaults,
//! so an absent file yields a working configuration.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod loader;
mod types;
mod validation;

pub use loader::{find_config_file, load_config, load_config_from, CONFIG_FILE_NAME};
pub use types::{LoggingConfig, NetworkConfig, RunConfig, SimulationConfig};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
