// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for graph operations.

use neuromesh_neural::types::{ArrayId, GroupId, MatrixId, NeuronId, SynapseId};

/// Errors that can occur while mutating or querying the graph.
///
/// Note what is *not* here: inserting a duplicate (source, target) synapse
/// is a silent no-op returning the existing id, and degree requests beyond
/// the candidate pool are capped. Only structural impossibilities are
/// errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphError {
    #[error("Neuron not found: {0}")]
    NeuronNotFound(NeuronId),

    #[error("Synapse not found: {0}")]
    SynapseNotFound(SynapseId),

    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("Neuron array not found: {0}")]
    ArrayNotFound(ArrayId),

    #[error("Weight matrix not found: {0}")]
    MatrixNotFound(MatrixId),

    #[error("Shape mismatch: expected {expected_rows}x{expected_cols}, got {actual_rows}x{actual_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Neural configuration error: {0}")]
    Neural(#[from] neuromesh_neural::NeuralError),
}

pub type Result<T> = core::result::Result<T, GraphError>;
