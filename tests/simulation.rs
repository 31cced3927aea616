// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! End-to-end scenarios through the umbrella crate: configuration, run
//! loops, couplings, training, and persistence working together.

use ndarray::array;

use neuromesh::config::SimulationConfig;
use neuromesh::connect::{ConnectionStrategy, OneToOne};
use neuromesh::engine::coupling::{ActivationProducer, InputConsumer};
use neuromesh::engine::{RunHandle, TrainingHarness, TrainingSet, UpdateAction};
use neuromesh::neural::rules::{ClippingMode, LinearRule, UpdateRule};
use neuromesh::{network_from_config, serialization};

fn linear_unclipped() -> UpdateRule {
    UpdateRule::Linear(LinearRule {
        clipping: ClippingMode::NoClipping,
        ..LinearRule::default()
    })
}

#[test]
fn configured_network_runs_and_persists() {
    let mut config = SimulationConfig::default();
    config.network.time_step = 1.0;
    config.network.seed = 21;
    let mut network = network_from_config(&config);

    let input_group = network
        .graph
        .create_group(3, linear_unclipped(), Default::default());
    let output_group = network
        .graph
        .create_group(3, linear_unclipped(), Default::default());
    let inputs = network.graph.group(input_group).unwrap().neurons().to_vec();
    let outputs = network
        .graph
        .group(output_group)
        .unwrap()
        .neurons()
        .to_vec();
    let synapses = OneToOne::new(false)
        .connect(&mut network.graph, &inputs, &outputs)
        .unwrap();
    network
        .graph
        .add_synapse_group(input_group, output_group, synapses, "One to One")
        .unwrap();

    for &id in &inputs {
        let neuron = network.graph.neuron_mut(id).unwrap();
        neuron.set_activation(0.5);
        neuron.clamped = true;
    }

    let handle = RunHandle::new();
    network.run(Some(3), &handle).unwrap();
    for &id in &outputs {
        assert_eq!(network.graph.neuron(id).unwrap().activation(), 0.5);
    }

    // Round-trip through the document format and keep stepping.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.json");
    serialization::save_network(&network, &path).unwrap();
    let mut reloaded = serialization::load_network(&path).unwrap();
    assert_eq!(reloaded.iterations(), 3);
    reloaded.step().unwrap();
    assert_eq!(reloaded.iterations(), 4);
}

#[test]
fn coupling_transfers_once_per_step() {
    let mut network = neuromesh::engine::Network::new();
    let producer = network.graph.add_neuron(linear_unclipped());
    let consumer = network.graph.add_neuron(linear_unclipped());
    network.graph.neuron_mut(producer).unwrap().set_activation(0.3);
    network.graph.neuron_mut(producer).unwrap().clamped = true;

    // Couplings run before the neuron update so the transferred value is
    // consumed the same step.
    network.update_manager.clear();
    network.update_manager.add_action(UpdateAction::ApplyCouplings);
    network.update_manager.add_action(UpdateAction::Buffered);
    network
        .couplings
        .couple(ActivationProducer(producer), InputConsumer(consumer));

    network.step().unwrap();
    assert_eq!(network.graph.neuron(consumer).unwrap().activation(), 0.3);
}

#[test]
fn external_trainer_drives_weights_between_steps() {
    let mut network = neuromesh::engine::Network::new();
    let input = network.graph.add_neuron(linear_unclipped());
    network.graph.neuron_mut(input).unwrap().clamped = true;
    let output = network.graph.add_neuron(linear_unclipped());
    let synapse = network.graph.add_synapse(input, output).unwrap();
    network.graph.synapse_mut(synapse).unwrap().force_set_strength(0.0);

    let set = TrainingSet::new(
        array![[1.0], [1.0], [1.0], [1.0]],
        array![[0.8], [0.8], [0.8], [0.8]],
    )
    .unwrap();
    let inputs = [input];
    let outputs = [output];
    let harness = TrainingHarness::new(&inputs, &outputs, &set);
    let handle = RunHandle::new();

    // A toy delta rule living entirely outside the engine: nudge the weight
    // toward the target after each row.
    for _epoch in 0..20 {
        harness
            .run_epoch(&mut network, &handle, |net, _row, outs, targets| {
                let error = targets[0] - outs[0];
                let current = net.graph.synapse(synapse).unwrap().strength();
                net.graph
                    .synapse_mut(synapse)
                    .unwrap()
                    .force_set_strength(current + 0.2 * error);
                Ok(())
            })
            .unwrap();
    }

    let learned = network.graph.synapse(synapse).unwrap().strength();
    assert!(
        (learned - 0.8).abs() < 0.05,
        "weight did not converge: {learned}"
    );
}
