// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for neural computation.

use super::ids::NeuronId;

/// Errors raised by rule and responder configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NeuralError {
    #[error("Invalid parameter for {rule}: {message}")]
    InvalidParameter {
        rule: &'static str,
        message: String,
    },

    #[error("Rule state mismatch on {0}: expected {1}")]
    StateMismatch(NeuronId, &'static str),

    #[error("Bounds inverted: lower {lower} is not below upper {upper}")]
    InvertedBounds { lower: f64, upper: f64 },
}

pub type Result<T> = core::result::Result<T, NeuralError>;
