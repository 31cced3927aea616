// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Distance-based connectors over the neurons' 2-D positions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use neuromesh_graph::{NetworkGraph, NeuronId, Polarity, Result, SynapseId};

use crate::util::distance;
use crate::ConnectionStrategy;

/// Radial connector with independent radii and probabilities per target
/// polarity: a source connects to an in-range inhibitory neighbor with
/// `inhibitory_probability`, and to an in-range excitatory (or unpolarized)
/// neighbor with `excitatory_probability`. Created strengths carry the
/// source polarity's sign.
#[derive(Debug, Clone)]
pub struct RadialProbabilistic {
    pub excitatory_radius: f64,
    pub inhibitory_radius: f64,
    pub excitatory_probability: f64,
    pub inhibitory_probability: f64,
    pub self_connections_allowed: bool,
    rng: StdRng,
}

impl RadialProbabilistic {
    pub fn new(seed: u64) -> Self {
        Self {
            excitatory_radius: 100.0,
            inhibitory_radius: 80.0,
            excitatory_probability: 0.8,
            inhibitory_probability: 0.8,
            self_connections_allowed: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ConnectionStrategy for RadialProbabilistic {
    fn name(&self) -> &'static str {
        "Radial (Probabilistic)"
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
                let (radius, probability) = match graph.neuron(target)?.polarity {
                    Polarity::Inhibitory => (self.inhibitory_radius, self.inhibitory_probability),
                    _ => (self.excitatory_radius, self.excitatory_probability),
                };
                if distance(graph, source, target)? > radius {
                    continue;
                }
                if self.rng.gen::<f64>() < probability
                    && graph.synapse_between(source, target).is_none()
                {
                    let id = graph.add_synapse(source, target)?;
                    let sign = graph.neuron(source)?.polarity.sign();
                    graph.synapse_mut(id)?.force_set_strength(sign);
                    synapses.push(id);
                }
            }
        }
        debug!(count = synapses.len(), "radial probabilistic connection");
        Ok(synapses)
    }
}

const DEFAULT_EE_CONST: f64 = 0.2;
const DEFAULT_EI_CONST: f64 = 0.3;
const DEFAULT_IE_CONST: f64 = 0.4;
const DEFAULT_II_CONST: f64 = 0.1;
const DEFAULT_DIST_CONST: f64 = 0.25;

/// Gaussian distance drop-off with a scaling constant per polarity pair.
///
/// The probability of connecting a source of polarity x to a target of
/// polarity y at distance d is `min(C_xy * exp(-(d/λ)²), 1)`. Unpolarized
/// endpoints use the `non_polar_const`. Lambda is roughly the average
/// connection distance.
#[derive(Debug, Clone)]
pub struct RadialGaussian {
    pub ee_const: f64,
    pub ei_const: f64,
    pub ie_const: f64,
    pub ii_const: f64,
    pub non_polar_const: f64,
    pub lambda: f64,
    pub self_connections_allowed: bool,
    rng: StdRng,
}

impl RadialGaussian {
    pub fn new(lambda: f64, seed: u64) -> Self {
        Self {
            ee_const: DEFAULT_EE_CONST,
            ei_const: DEFAULT_EI_CONST,
            ie_const: DEFAULT_IE_CONST,
            ii_const: DEFAULT_II_CONST,
            non_polar_const: DEFAULT_DIST_CONST,
            lambda,
            self_connections_allowed: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pair_constant(&self, source: Polarity, target: Polarity) -> f64 {
        match (source, target) {
            (Polarity::Excitatory, Polarity::Excitatory) => self.ee_const,
            (Polarity::Excitatory, Polarity::Inhibitory) => self.ei_const,
            (Polarity::Inhibitory, Polarity::Excitatory) => self.ie_const,
            (Polarity::Inhibitory, Polarity::Inhibitory) => self.ii_const,
            _ => self.non_polar_const,
        }
    }

    fn connect_probability(&self, constant: f64, dist: f64) -> f64 {
        let scaled = dist / self.lambda;
        (constant * (-(scaled * scaled)).exp()).min(1.0)
    }
}

impl ConnectionStrategy for RadialGaussian {
    fn name(&self) -> &'static str {
        "Radial (Gaussian)"
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
                let source_polarity = graph.neuron(source)?.polarity;
                let target_polarity = graph.neuron(target)?.polarity;
                let constant = self.pair_constant(source_polarity, target_polarity);
                let dist = distance(graph, source, target)?;
                let probability = self.connect_probability(constant, dist);
                if self.rng.gen::<f64>() < probability
                    && graph.synapse_between(source, target).is_none()
                {
                    let id = graph.add_synapse(source, target)?;
                    graph
                        .synapse_mut(id)?
                        .force_set_strength(source_polarity.sign());
                    synapses.push(id);
                }
            }
        }
        debug!(
            count = synapses.len(),
            lambda = self.lambda,
            "radial gaussian connection"
        );
        Ok(synapses)
    }
}
