// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Fixed in-degree / out-degree connector.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use neuromesh_graph::{NetworkGraph, NeuronId, Result, SynapseId};

use crate::util::{distance, sample_candidates};
use crate::ConnectionStrategy;

/// Whether the degree constraint counts connections radiating out from each
/// source or arriving in at each target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeDirection {
    In,
    Out,
}

/// Give every node exactly `degree` connections, drawn uniformly from the
/// candidate pool. The degree is silently capped to the pool size; it is
/// never an error to ask for more than is available. An optional radius
/// restricts candidates to those within Euclidean range — nodes outside the
/// radius are excluded entirely, regardless of the requested degree.
#[derive(Debug, Clone)]
pub struct FixedDegree {
    pub degree: usize,
    pub direction: DegreeDirection,
    pub radius: Option<f64>,
    pub self_connections_allowed: bool,
    rng: StdRng,
}

impl FixedDegree {
    pub fn new(degree: usize, direction: DegreeDirection, seed: u64) -> Self {
        Self {
            degree,
            direction,
            radius: None,
            self_connections_allowed: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn candidates(
        &self,
        graph: &NetworkGraph,
        anchor: NeuronId,
        pool: &[NeuronId],
    ) -> Result<Vec<NeuronId>> {
        let mut out = Vec::with_capacity(pool.len());
        for &candidate in pool {
            if candidate == anchor && !self.self_connections_allowed {
                continue;
            }
            if let Some(radius) = self.radius {
                if distance(graph, anchor, candidate)? > radius {
                    continue;
                }
            }
            out.push(candidate);
        }
        Ok(out)
    }
}

impl ConnectionStrategy for FixedDegree {
    fn name(&self) -> &'static str {
        "Fixed Degree"
    }

    fn connect(
        &mut self,
        graph: &mut NetworkGraph,
        sources: &[NeuronId],
        targets: &[NeuronId],
    ) -> Result<Vec<SynapseId>> {
        let mut synapses = Vec::new();
        match self.direction {
            DegreeDirection::Out => {
                for &source in sources {
                    let candidates = self.candidates(graph, source, targets)?;
                    let keep = self.degree.min(candidates.len());
                    for target in sample_candidates(candidates, keep, &mut self.rng) {
                        if graph.synapse_between(source, target).is_none() {
                            synapses.push(graph.add_synapse(source, target)?);
                        }
                    }
                }
            }
            DegreeDirection::In => {
                for &target in targets {
                    let candidates = self.candidates(graph, target, sources)?;
                    let keep = self.degree.min(candidates.len());
                    for source in sample_candidates(candidates, keep, &mut self.rng) {
                        if graph.synapse_between(source, target).is_none() {
                            synapses.push(graph.add_synapse(source, target)?);
                        }
                    }
                }
            }
        }
        debug!(
            count = synapses.len(),
            degree = self.degree,
            "fixed-degree connection"
        );
        Ok(synapses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_neural::rules::UpdateRule;

    fn pool(graph: &mut NetworkGraph, n: usize) -> Vec<NeuronId> {
        (0..n).map(|_| graph.add_neuron(UpdateRule::default())).collect()
    }

    #[test]
    fn test_out_degree_exact() {
        let mut graph = NetworkGraph::new();
        let neurons = pool(&mut graph, 10);
        let mut strategy = FixedDegree::new(3, DegreeDirection::Out, 4);
        strategy.connect(&mut graph, &neurons, &neurons).unwrap();
        for &n in &neurons {
            assert_eq!(graph.neuron(n).unwrap().fan_out().len(), 3);
        }
    }

    #[test]
    fn test_in_degree_exact() {
        let mut graph = NetworkGraph::new();
        let neurons = pool(&mut graph, 10);
        let mut strategy = FixedDegree::new(4, DegreeDirection::In, 4);
        strategy.connect(&mut graph, &neurons, &neurons).unwrap();
        for &n in &neurons {
            assert_eq!(graph.neuron(n).unwrap().fan_in().len(), 4);
        }
    }

    #[test]
    fn test_degree_capped_to_small_pool() {
        let mut graph = NetworkGraph::new();
        let neurons = pool(&mut graph, 3);
        // Degree 2 over 3 nodes with self-connections allowed: never more
        // than 2 efferents per node even though the request leaves room for
        // a third candidate.
        let mut strategy = FixedDegree::new(2, DegreeDirection::Out, 9);
        strategy.self_connections_allowed = true;
        strategy.connect(&mut graph, &neurons, &neurons).unwrap();
        for &n in &neurons {
            assert!(graph.neuron(n).unwrap().fan_out().len() <= 2);
        }

        // Degree larger than the pool is capped, not an error.
        let mut graph = NetworkGraph::new();
        let neurons = pool(&mut graph, 3);
        let mut greedy = FixedDegree::new(100, DegreeDirection::Out, 9);
        greedy.connect(&mut graph, &neurons, &neurons).unwrap();
        for &n in &neurons {
            assert_eq!(graph.neuron(n).unwrap().fan_out().len(), 2);
        }
    }

    #[test]
    fn test_radius_restriction_beats_degree() {
        let mut graph = NetworkGraph::new();
        let a = graph.add_neuron_at(UpdateRule::default(), 0.0, 0.0);
        let b = graph.add_neuron_at(UpdateRule::default(), 500.0, 0.0);
        let mut strategy = FixedDegree::new(5, DegreeDirection::Out, 1);
        strategy.radius = Some(100.0);
        let synapses = strategy.connect(&mut graph, &[a, b], &[a, b]).unwrap();
        // The two nodes are farther apart than the radius: no edges at all,
        // regardless of the requested degree.
        assert!(synapses.is_empty());
    }
}
