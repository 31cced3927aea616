// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Density-based sparse connection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use neuromesh_graph::{NetworkGraph, NeuronId, Result, SynapseId};

use crate::util::{polarize_synapses, sample_candidates};
use crate::ConnectionStrategy;

/// Connect a density-controlled random subset of the possible pairs.
///
/// With `equalize_efferents` every source gets exactly
/// `floor(density × pool)` targets (drawn without replacement); otherwise
/// each possible pair is connected independently with probability
/// `density`, so the realized density is only approximate. Created edges
/// are polarized to the target excitatory fraction.
#[derive(Debug, Clone)]
pub struct Sparse {
    /// Probability that any given source-target pair is connected.
    pub density: f64,
    /// Fraction of created synapses given excitatory (positive) strength.
    pub excitatory_fraction: f64,
    pub self_connections_allowed: bool,
    /// Give every source the same number of efferents instead of sampling
    /// per pair.
    pub equalize_efferents: bool,
    rng: StdRng,
}

impl Sparse {
    pub fn new(density: f64, seed: u64) -> Self {
        Self {
            density,
            excitatory_fraction: 1.0,
            self_connections_allowed: false,
            equalize_efferents: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ConnectionStrategy for Sparse {
    fn name(&self) -> &'static str {
        "Sparse"
    }

    fn connect(
        &mut self,
        graph: &mut NetworkGraph,
        sources: &[NeuronId],
        targets: &[NeuronId],
    ) -> Result<Vec<SynapseId>> {
        let mut synapses = Vec::new();
        if self.equalize_efferents {
            for &source in sources {
                let candidates: Vec<NeuronId> = targets
                    .iter()
                    .copied()
                    .filter(|&t| self.self_connections_allowed || t != source)
                    .collect();
                let per_source = (self.density * candidates.len() as f64).floor() as usize;
                for target in sample_candidates(candidates, per_source, &mut self.rng) {
                    if graph.synapse_between(source, target).is_none() {
                        synapses.push(graph.add_synapse(source, target)?);
                    }
                }
            }
        } else {
            for &source in sources {
                for &target in targets {
                    if source == target && !self.self_connections_allowed {
                        continue;
                    }
                    if self.rng.gen::<f64>() < self.density
                        && graph.synapse_between(source, target).is_none()
                    {
                        synapses.push(graph.add_synapse(source, target)?);
                    }
                }
            }
        }
        polarize_synapses(graph, &synapses, self.excitatory_fraction, &mut self.rng)?;
        debug!(
            count = synapses.len(),
            density = self.density,
            equalized = self.equalize_efferents,
            "sparse connection"
        );
        Ok(synapses)
    }
}
