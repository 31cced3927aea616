// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Helpers shared by the connection strategies.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use neuromesh_graph::{NetworkGraph, NeuronId, Result, SynapseId};

/// Euclidean distance between two neurons' positions.
pub(crate) fn distance(graph: &NetworkGraph, a: NeuronId, b: NeuronId) -> Result<f64> {
    let a = graph.neuron(a)?;
    let b = graph.neuron(b)?;
    Ok(a.distance_to(b))
}

/// Assign excitatory (+1) and inhibitory (-1) strengths to a batch of new
/// synapses so that `excitatory_fraction` of them are excitatory. Which
/// synapses end up excitatory is chosen by the caller's generator.
pub fn polarize_synapses(
    graph: &mut NetworkGraph,
    synapses: &[SynapseId],
    excitatory_fraction: f64,
    rng: &mut StdRng,
) -> Result<()> {
    let fraction = excitatory_fraction.clamp(0.0, 1.0);
    let mut shuffled: Vec<SynapseId> = synapses.to_vec();
    shuffled.shuffle(rng);
    let excitatory_count = (fraction * shuffled.len() as f64).round() as usize;
    for (index, id) in shuffled.into_iter().enumerate() {
        let strength = if index < excitatory_count { 1.0 } else { -1.0 };
        graph.synapse_mut(id)?.force_set_strength(strength);
    }
    Ok(())
}

/// Shuffle the candidate list and keep the first `keep` entries.
pub(crate) fn sample_candidates(
    mut candidates: Vec<NeuronId>,
    keep: usize,
    rng: &mut StdRng,
) -> Vec<NeuronId> {
    candidates.shuffle(rng);
    candidates.truncate(keep);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_neural::rules::UpdateRule;
    use rand::SeedableRng;

    #[test]
    fn test_polarize_fraction() {
        let mut graph = NetworkGraph::new();
        let neurons: Vec<NeuronId> =
            (0..10).map(|_| graph.add_neuron(UpdateRule::default())).collect();
        let hub = graph.add_neuron(UpdateRule::default());
        let synapses: Vec<SynapseId> = neurons
            .iter()
            .map(|&n| graph.add_synapse(n, hub).unwrap())
            .collect();

        let mut rng = StdRng::seed_from_u64(1);
        polarize_synapses(&mut graph, &synapses, 0.7, &mut rng).unwrap();

        let excitatory = synapses
            .iter()
            .filter(|&&s| graph.synapse(s).unwrap().strength() > 0.0)
            .count();
        assert_eq!(excitatory, 7);
    }
}
