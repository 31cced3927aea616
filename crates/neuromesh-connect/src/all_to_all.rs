// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Connect every source to every target.

use tracing::debug;

use neuromesh_graph::{NetworkGraph, NeuronId, Result, SynapseId};

use crate::ConnectionStrategy;

/// The deterministic dense connector: every (source, target) pair gets an
/// edge. Over an N-neuron recurrent pool this yields N·(N−1) edges, or N²
/// when self-connections are allowed.
#[derive(Debug, Clone, Copy)]
pub struct AllToAll {
    pub self_connections_allowed: bool,
}

impl AllToAll {
    pub fn new(self_connections_allowed: bool) -> Self {
        Self {
            self_connections_allowed,
        }
    }
}

impl Default for AllToAll {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ConnectionStrategy for AllToAll {
    fn name(&self) -> &'static str {
        "All to All"
    }

    fn connect(
        &mut self,
        graph: &mut NetworkGraph,
        sources: &[NeuronId],
        targets: &[NeuronId],
    ) -> Result<Vec<SynapseId>> {
        let mut synapses = Vec::with_capacity(sources.len() * targets.len());
        for &source in sources {
            for &target in targets {
                if source == target && !self.self_connections_allowed {
                    continue;
                }
                if graph.synapse_between(source, target).is_some() {
                    continue;
                }
                synapses.push(graph.add_synapse(source, target)?);
            }
        }
        debug!(
            count = synapses.len(),
            sources = sources.len(),
            targets = targets.len(),
            "all-to-all connection"
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
    fn test_recurrent_without_self_connections() {
        let mut graph = NetworkGraph::new();
        let neurons = pool(&mut graph, 5);
        let synapses = AllToAll::new(false)
            .connect(&mut graph, &neurons, &neurons)
            .unwrap();
        assert_eq!(synapses.len(), 5 * 4);
    }

    #[test]
    fn test_recurrent_with_self_connections() {
        let mut graph = NetworkGraph::new();
        let neurons = pool(&mut graph, 5);
        let synapses = AllToAll::new(true)
            .connect(&mut graph, &neurons, &neurons)
            .unwrap();
        assert_eq!(synapses.len(), 5 * 5);
    }

    #[test]
    fn test_bipartite() {
        let mut graph = NetworkGraph::new();
        let sources = pool(&mut graph, 3);
        let targets = pool(&mut graph, 4);
        let synapses = AllToAll::new(false)
            .connect(&mut graph, &sources, &targets)
            .unwrap();
        assert_eq!(synapses.len(), 12);
    }

    #[test]
    fn test_rerun_reports_nothing_new() {
        let mut graph = NetworkGraph::new();
        let neurons = pool(&mut graph, 3);
        let mut strategy = AllToAll::new(false);
        strategy.connect(&mut graph, &neurons, &neurons).unwrap();
        let second = strategy.connect(&mut graph, &neurons, &neurons).unwrap();
        assert!(second.is_empty());
        assert_eq!(graph.synapse_count(), 6);
    }
}
