// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Connection probability as a decay function of distance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use neuromesh_graph::{NetworkGraph, NeuronId, Result, SynapseId};

use crate::util::distance;
use crate::ConnectionStrategy;

/// The decay profile applied to the pair distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayFunction {
    /// `exp(-d / λ)`
    Exponential,
    /// `exp(-(d / λ)²)`
    Gaussian,
    /// `max(0, 1 - d / λ)`
    Linear,
}

/// Connect each pair with probability given by a decay function of the
/// Euclidean distance between the endpoints, scaled by `length_scale`.
#[derive(Debug, Clone)]
pub struct DistanceDecay {
    pub decay_function: DecayFunction,
    pub length_scale: f64,
    pub self_connections_allowed: bool,
    rng: StdRng,
}

impl DistanceDecay {
    pub fn new(decay_function: DecayFunction, length_scale: f64, seed: u64) -> Self {
        Self {
            decay_function,
            length_scale,
            self_connections_allowed: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn probability(&self, dist: f64) -> f64 {
        let scaled = dist / self.length_scale;
        match self.decay_function {
            DecayFunction::Exponential => (-scaled).exp(),
            DecayFunction::Gaussian => (-(scaled * scaled)).exp(),
            DecayFunction::Linear => (1.0 - scaled).max(0.0),
        }
    }
}

impl ConnectionStrategy for DistanceDecay {
    fn name(&self) -> &'static str {
        "Distance Decay"
    }

    fn connect(
        &mut self,
        graph: &mut NetworkGraph,
        sources: &[NeuronId],
        targets: &[NeuronId],
    ) -> Result<Vec<SynapseId>> {
        let mut synapses = Vec::new();
        for &source in sources {
            for &target in targets {
                if source == target && !self.self_connections_allowed {
                    continue;
                }
                let probability = self.probability(distance(graph, source, target)?);
                if self.rng.gen::<f64>() < probability
                    && graph.synapse_between(source, target).is_none()
                {
                    synapses.push(graph.add_synapse(source, target)?);
                }
            }
        }
        debug!(count = synapses.len(), "distance-decay connection");
        Ok(synapses)
    }
}
