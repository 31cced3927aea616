// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuromesh Network Documents
//!
//! Full-graph serialization: every neuron, synapse, group, collection,
//! array, matrix, rule, and responder — with configuration and meaningful
//! accumulated state — round-trips through a versioned JSON document, and a
//! document reconstructs an executable, steppable [`Network`].
//!
//! Transients (in-flight delay queues, fan indices) are not persisted:
//! indices are rebuilt from the synapse table on load and delay lines
//! restart empty. Custom update actions are closures; they are recorded by
//! description only and skipped with a warning when the document is
//! rebuilt.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use neuromesh_engine::{ActionDescriptor, Network, UpdateAction};
use neuromesh_graph::{
    NetworkGraph, Neuron, NeuronArray, NeuronCollection, NeuronGroup, Synapse, SynapseGroup,
    WeightMatrix,
};

mod document;

pub use document::NetworkDocument;

/// Identifies a neuromesh document regardless of file extension.
pub const FORMAT_TAG: &str = "neuromesh-network";

/// Current document version. Bump on breaking layout changes.
pub const DOCUMENT_VERSION: u32 = 1;

/// Document I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Not a neuromesh document: format tag '{0}'")]
    InvalidFormat(String),

    #[error("Version mismatch: document version {document_version}, expected {expected_version}")]
    VersionMismatch {
        document_version: u32,
        expected_version: u32,
    },

    #[error("Document references missing elements: {0}")]
    Graph(#[from] neuromesh_graph::GraphError),
}

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Capture a network into a document.
pub fn document_from(network: &Network) -> NetworkDocument {
    let graph = &network.graph;
    let neurons: Vec<Neuron> = graph.neurons().cloned().collect();
    let synapses: Vec<Synapse> = graph.synapses().cloned().collect();

    let mut groups: Vec<NeuronGroup> = graph.groups().cloned().collect();
    groups.sort_by_key(|g| g.id());
    let mut collections: Vec<NeuronCollection> = graph.collections().cloned().collect();
    collections.sort_by_key(|c| c.id());
    let mut synapse_groups: Vec<SynapseGroup> = graph.synapse_groups().cloned().collect();
    synapse_groups.sort_by_key(|g| g.id());

    let arrays: Vec<NeuronArray> = graph.arrays().cloned().collect();
    let matrices: Vec<WeightMatrix> = graph.matrices().cloned().collect();

    let actions = network.update_manager.descriptors();
    for action in &actions {
        if let ActionDescriptor::Custom { description } = action {
            warn!(
                action = %description,
                "custom update action cannot round-trip; it will be skipped on load"
            );
        }
    }

    NetworkDocument {
        format: FORMAT_TAG.to_string(),
        version: DOCUMENT_VERSION,
        time: network.time(),
        time_step: network.time_step(),
        iterations: network.iterations(),
        rng_seed: network.rng_seed(),
        neurons,
        synapses,
        groups,
        collections,
        synapse_groups,
        arrays,
        matrices,
        actions,
    }
}

/// Rebuild a steppable network from a document. Fan-in/fan-out indices and
/// id counters are derived from the tables; unknown versions are rejected.
pub fn network_from(document: NetworkDocument) -> Result<Network> {
    if document.format != FORMAT_TAG {
        return Err(DocumentError::InvalidFormat(document.format));
    }
    if document.version != DOCUMENT_VERSION {
        return Err(DocumentError::VersionMismatch {
            document_version: document.version,
            expected_version: DOCUMENT_VERSION,
        });
    }

    let graph = NetworkGraph::restore(
        document.neurons,
        document.synapses,
        document.groups,
        document.collections,
        document.synapse_groups,
        document.arrays,
        document.matrices,
    )?;

    let mut actions = Vec::with_capacity(document.actions.len());
    for descriptor in &document.actions {
        match UpdateAction::from_descriptor(descriptor) {
            Some(action) => actions.push(action),
            None => warn!(?descriptor, "skipping non-reconstructible update action"),
        }
    }

    Ok(Network::from_parts(
        graph,
        document.time,
        document.time_step,
        document.iterations,
        document.rng_seed,
        actions,
    ))
}

pub fn to_writer<W: Write>(network: &Network, writer: W) -> Result<()> {
    let document = document_from(network);
    serde_json::to_writer_pretty(writer, &document)
        .map_err(|e| DocumentError::Serialization(e.to_string()))
}

pub fn from_reader<R: Read>(reader: R) -> Result<Network> {
    let document: NetworkDocument = serde_json::from_reader(reader)
        .map_err(|e| DocumentError::Deserialization(e.to_string()))?;
    network_from(document)
}

/// Save a network to a document file.
pub fn save_network<P: AsRef<Path>>(network: &Network, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    to_writer(network, BufWriter::new(file))?;
    info!(path = %path.as_ref().display(), "saved network document");
    Ok(())
}

/// Load a network from a document file.
pub fn load_network<P: AsRef<Path>>(path: P) -> Result<Network> {
    let file = File::open(path.as_ref())?;
    let network = from_reader(BufReader::new(file))?;
    info!(
        path = %path.as_ref().display(),
        neurons = network.graph.neuron_count(),
        synapses = network.graph.synapse_count(),
        "loaded network document"
    );
    Ok(network)
}
