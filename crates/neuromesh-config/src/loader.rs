// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support.
//!
//! Loading order:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides, `NEUROMESH_` prefix)
//!
//! The file is searched at `NEUROMESH_CONFIG_PATH`, then the current
//! directory, then parent directories (up to five levels). A missing file
//! is not an error for [`load_config`]: defaults apply.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::validation::validate;
use crate::{ConfigError, ConfigResult, SimulationConfig};

pub const CONFIG_FILE_NAME: &str = "neuromesh.toml";

/// Find the configuration file, if one exists.
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NEUROMESH_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by NEUROMESH_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    for path in search_paths {
        if path.exists() {
            return Ok(path);
        }
    }
    Err(ConfigError::FileNotFound(format!(
        "no {CONFIG_FILE_NAME} found in current or parent directories"
    )))
}

/// Load configuration: file if present, defaults otherwise, environment
/// overrides on top, validated.
pub fn load_config() -> ConfigResult<SimulationConfig> {
    let mut config = match find_config_file() {
        Ok(path) => parse_file(&path)?,
        Err(ConfigError::FileNotFound(_)) => SimulationConfig::default(),
        Err(other) => return Err(other),
    };
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Load configuration from an explicit path (the file must exist).
pub fn load_config_from(path: impl AsRef<Path>) -> ConfigResult<SimulationConfig> {
    let mut config = parse_file(path.as_ref())?;
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> ConfigResult<SimulationConfig> {
    let contents = fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn apply_env_overrides(config: &mut SimulationConfig) {
    if let Ok(value) = env::var("NEUROMESH_TIME_STEP") {
        if let Ok(parsed) = value.parse() {
            config.network.time_step = parsed;
        }
    }
    if let Ok(value) = env::var("NEUROMESH_UPDATE_DISCIPLINE") {
        config.network.update_discipline = value;
    }
    if let Ok(value) = env::var("NEUROMESH_SEED") {
        if let Ok(parsed) = value.parse() {
            config.network.seed = parsed;
        }
    }
    if let Ok(value) = env::var("NEUROMESH_LOG_LEVEL") {
        config.logging.level = value;
    }
}
