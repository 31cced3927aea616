// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Connect sources to targets pairwise by index.

use tracing::debug;

use neuromesh_graph::{NetworkGraph, NeuronId, Result, SynapseId};

use crate::ConnectionStrategy;

/// Index-aligned pairing: source i connects to target i, sized to
/// `min(|sources|, |targets|)` pairs. With `use_bidirectional` each pair is
/// connected both ways.
#[derive(Debug, Clone, Copy)]
pub struct OneToOne {
    pub use_bidirectional: bool,
}

impl OneToOne {
    pub fn new(use_bidirectional: bool) -> Self {
        Self { use_bidirectional }
    }
}

impl Default for OneToOne {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ConnectionStrategy for OneToOne {
    fn name(&self) -> &'static str {
        "One to One"
    }

    fn connect(
        &mut self,
        graph: &mut NetworkGraph,
        sources: &[NeuronId],
        targets: &[NeuronId],
    ) -> Result<Vec<SynapseId>> {
        let pairs = sources.len().min(targets.len());
        let mut synapses = Vec::with_capacity(if self.use_bidirectional {
            pairs * 2
        } else {
            pairs
        });
        for (&source, &target) in sources.iter().zip(targets.iter()) {
            if graph.synapse_between(source, target).is_none() {
                synapses.push(graph.add_synapse(source, target)?);
            }
            if self.use_bidirectional && graph.synapse_between(target, source).is_none() {
                synapses.push(graph.add_synapse(target, source)?);
            }
        }
        debug!(count = synapses.len(), pairs, "one-to-one connection");
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
    fn test_sized_to_smaller_pool() {
        let mut graph = NetworkGraph::new();
        let sources = pool(&mut graph, 5);
        let targets = pool(&mut graph, 3);
        let synapses = OneToOne::new(false)
            .connect(&mut graph, &sources, &targets)
            .unwrap();
        assert_eq!(synapses.len(), 3);
        // Aligned by index.
        assert!(graph.synapse_between(sources[0], targets[0]).is_some());
        assert!(graph.synapse_between(sources[2], targets[2]).is_some());
        assert!(graph.synapse_between(sources[3], targets[0]).is_none());
    }

    #[test]
    fn test_bidirectional_doubles_edges() {
        let mut graph = NetworkGraph::new();
        let sources = pool(&mut graph, 2);
        let targets = pool(&mut graph, 4);
        let synapses = OneToOne::new(true)
            .connect(&mut graph, &sources, &targets)
            .unwrap();
        assert_eq!(synapses.len(), 4);
        assert!(graph.synapse_between(targets[1], sources[1]).is_some());
    }
}
