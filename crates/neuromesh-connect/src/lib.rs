// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuromesh Connection Strategies
//!
//! Topology generators: given ordered source and target pools, produce a set
//! of edges according to a randomized or deterministic rule.
//!
//! Every randomized strategy owns its own generator, seeded at construction:
//!
//! - two instances built with the same seed produce identical edge sets for
//!   identical inputs;
//! - different seeds produce different sets (with overwhelming probability);
//! - invoking one instance twice produces different sets each time, because
//!   the generator state advances.
//!
//! Self-connections are excluded or included per an explicit flag on each
//! strategy, never inferred. All edge creation goes through the graph's
//! duplicate-checking insert, so a pair can never be connected twice in the
//! same direction.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod all_to_all;
mod distance_decay;
mod fixed_degree;
mod one_to_one;
mod radial;
mod sparse;
mod util;

pub use all_to_all::AllToAll;
pub use distance_decay::{DecayFunction, DistanceDecay};
pub use fixed_degree::{DegreeDirection, FixedDegree};
pub use one_to_one::OneToOne;
pub use radial::{RadialGaussian, RadialProbabilistic};
pub use sparse::Sparse;
pub use util::polarize_synapses;

use neuromesh_graph::{NetworkGraph, NeuronId, Result, SynapseId};

/// A topology generator. `connect` takes `&mut self` because randomized
/// strategies advance their internal generator on every invocation.
pub trait ConnectionStrategy {
    fn name(&self) -> &'static str;

    /// Create edges between the pools and return the newly created synapses.
    /// Pairs that are already connected are left alone and not reported.
    fn connect(
        &mut self,
        graph: &mut NetworkGraph,
        sources: &[NeuronId],
        targets: &[NeuronId],
    ) -> Result<Vec<SynapseId>>;
}
