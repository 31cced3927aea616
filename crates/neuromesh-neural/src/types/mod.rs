// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared across the workspace.

mod error;
mod ids;
mod polarity;

pub use error::{NeuralError, Result};
pub use ids::{ArrayId, GroupId, MatrixId, NeuronId, SynapseId};
pub use polarity::Polarity;
