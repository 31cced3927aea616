// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation.

use crate::{ConfigError, ConfigResult, SimulationConfig};

const DISCIPLINES: &[&str] = &["buffered", "immediate"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check a loaded configuration for values the engine would reject later.
pub fn validate(config: &SimulationConfig) -> ConfigResult<()> {
    if config.network.time_step <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "network.time_step must be positive, got {}",
            config.network.time_step
        )));
    }
    let discipline = config.network.update_discipline.to_ascii_lowercase();
    if !DISCIPLINES.contains(&discipline.as_str()) {
        return Err(ConfigError::Validation(format!(
            "network.update_discipline must be one of {DISCIPLINES:?}, got '{}'",
            config.network.update_discipline
        )));
    }
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of {LOG_LEVELS:?}, got '{}'",
            config.logging.level
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(validate(&SimulationConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_discipline_rejected() {
        let mut config = SimulationConfig::default();
        config.network.update_discipline = "eventual".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_positive_time_step_rejected() {
        let mut config = SimulationConfig::default();
        config.network.time_step = 0.0;
        assert!(validate(&config).is_err());
    }
}
