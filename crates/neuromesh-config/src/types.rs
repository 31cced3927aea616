// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions.
//!
//! Each struct maps to a section of `neuromesh.toml`. Every section and
//! field is optional in the file; defaults are defined here.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub network: NetworkConfig,
    pub run: RunConfig,
    pub logging: LoggingConfig,
}

/// Network-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Simulation step size.
    pub time_step: f64,
    /// Default update discipline: "buffered" or "immediate".
    pub update_discipline: String,
    /// Seed for the simulation-owned generator.
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            time_step: 0.1,
            update_discipline: "buffered".to_string(),
            seed: 0,
        }
    }
}

/// Run-loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop a bounded run after this many iterations. 0 means unbounded.
    pub max_iterations: u64,
    /// Partition the buffered snapshot phase across worker threads.
    pub parallel_snapshot: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iterations: 0,
            parallel_snapshot: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
