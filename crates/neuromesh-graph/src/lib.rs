// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuromesh Graph Model
//!
//! The mutable data structure the simulation engine operates on: neurons and
//! synapses, their aggregations (groups, collections, synapse groups), and
//! the matrix-based duals ([`NeuronArray`], [`WeightMatrix`]) used for batch
//! operation.
//!
//! The graph is an arena: every element lives in an id-keyed table owned by
//! [`NetworkGraph`], and every cross-reference (fan-in, fan-out, group
//! membership, matrix endpoints) is a stable integer handle. There are no
//! owning pointers between elements, so deletion is a table operation plus
//! index maintenance, and serialization walks plain tables.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
mod graph;
mod group;
mod matrix;
mod neuron;
mod synapse;

pub use error::{GraphError, Result};
pub use graph::NetworkGraph;
pub use group::{Layout, LineOrientation, NeuronCollection, NeuronGroup, SynapseGroup};
pub use matrix::{NeuronArray, WeightMatrix};
pub use neuron::Neuron;
pub use synapse::{LearningRule, Synapse, SynapsePhase};

// The id and polarity types originate in neuromesh-neural; re-export them so
// graph consumers need a single import path.
pub use neuromesh_neural::types::{ArrayId, GroupId, MatrixId, NeuronId, Polarity, SynapseId};
