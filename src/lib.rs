// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuromesh
//!
//! A network simulation engine for building and running neural-network and
//! agent-environment simulations: a mutable graph of neurons and synapses
//! (plus a matrix-based dual for batch operation), pluggable per-neuron
//! dynamics and per-synapse spike responders, seeded topology generators,
//! and a tick-based scheduler with explicit immediate and buffered update
//! disciplines.
//!
//! This umbrella crate re-exports the workspace members:
//!
//! - [`neural`]: update rules, spike responders, and their state holders
//! - [`graph`]: neurons, synapses, groups, and matrix duals
//! - [`connect`]: seeded connection strategies
//! - [`engine`]: the network aggregate root, scheduler, and run loop
//! - [`serialization`]: versioned network documents
//! - [`config`]: TOML configuration
//!
//! ## Quick start
//!
//! ```
//! use neuromesh::connect::{AllToAll, ConnectionStrategy};
//! use neuromesh::engine::Network;
//! use neuromesh::neural::rules::UpdateRule;
//!
//! let mut network = Network::new();
//! let a = network.graph.add_neuron(UpdateRule::default());
//! let b = network.graph.add_neuron(UpdateRule::default());
//! AllToAll::new(false)
//!     .connect(&mut network.graph, &[a, b], &[a, b])
//!     .unwrap();
//! network.step().unwrap();
//! ```

pub use neuromesh_config as config;
pub use neuromesh_connect as connect;
pub use neuromesh_engine as engine;
pub use neuromesh_graph as graph;
pub use neuromesh_neural as neural;
pub use neuromesh_serialization as serialization;

use engine::{Network, UpdateAction, UpdateDiscipline, UpdateManager};

/// Build a network from a loaded configuration: seed, time step, and the
/// default whole-graph update action per the configured discipline.
pub fn network_from_config(config: &config::SimulationConfig) -> Network {
    let mut network = Network::with_seed(config.network.seed);
    network.set_time_step(config.network.time_step);

    let discipline: UpdateDiscipline = config
        .network
        .update_discipline
        .parse()
        .unwrap_or_default();
    let manager: &mut UpdateManager = &mut network.update_manager;
    manager.clear();
    match (discipline, config.run.parallel_snapshot) {
        (UpdateDiscipline::Buffered, true) => manager.add_action(UpdateAction::ConcurrentBuffered),
        (UpdateDiscipline::Buffered, false) => manager.add_action(UpdateAction::Buffered),
        (UpdateDiscipline::Immediate, _) => manager.add_action(UpdateAction::Immediate),
    }
    network
}
