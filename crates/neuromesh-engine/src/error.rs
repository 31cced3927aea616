// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for the simulation engine.

use neuromesh_graph::GraphError;

/// Errors surfaced by stepping, training, and coupling application.
///
/// Step execution stops at the first failing action and reports which
/// action failed; updates already committed within that step are not rolled
/// back (steps are not transactional across actions).
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("update action '{description}' failed: {source}")]
    ActionFailed {
        description: String,
        #[source]
        source: Box<NetworkError>,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("training row {index} out of range ({rows} rows)")]
    RowOutOfRange { index: usize, rows: usize },

    #[error("row length {actual} does not match {expected} neurons")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error("training set has {inputs} input rows but {targets} target rows")]
    TrainingSetMismatch { inputs: usize, targets: usize },

    #[error("{0}")]
    Action(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
