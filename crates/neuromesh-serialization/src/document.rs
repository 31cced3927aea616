// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The document layout.

use serde::{Deserialize, Serialize};

use neuromesh_engine::ActionDescriptor;
use neuromesh_graph::{
    Neuron, NeuronArray, NeuronCollection, NeuronGroup, Synapse, SynapseGroup, WeightMatrix,
};

/// The persisted form of a network. Element order within each table is
/// insertion order, which deserialization preserves — neurons must be
/// restored before the synapses that reference them.
#[derive(Debug, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub format: String,
    pub version: u32,

    pub time: f64,
    pub time_step: f64,
    pub iterations: u64,
    pub rng_seed: u64,

    pub neurons: Vec<Neuron>,
    pub synapses: Vec<Synapse>,
    pub groups: Vec<NeuronGroup>,
    pub collections: Vec<NeuronCollection>,
    pub synapse_groups: Vec<SynapseGroup>,
    pub arrays: Vec<NeuronArray>,
    pub matrices: Vec<WeightMatrix>,

    pub actions: Vec<ActionDescriptor>,
}
