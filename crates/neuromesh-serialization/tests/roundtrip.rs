// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Document round-trip tests: a saved network reloads into a steppable
//! network with the same structure and behavior.

use neuromesh_connect::{ConnectionStrategy, Sparse};
use neuromesh_engine::{Network, UpdateAction};
use neuromesh_graph::Layout;
use neuromesh_neural::responders::SpikeResponder;
use neuromesh_neural::rules::{SigmoidalRule, SpikingThresholdRule, UpdateRule};
use neuromesh_serialization::{
    document_from, load_network, network_from, save_network, DocumentError, DOCUMENT_VERSION,
};

fn build_network() -> Network {
    let mut network = Network::with_seed(7);
    network.set_time_step(0.5);

    let group = network.graph.create_group(
        4,
        UpdateRule::Sigmoidal(SigmoidalRule::default()),
        Layout::default(),
    );
    let spiker = network
        .graph
        .add_neuron(UpdateRule::SpikingThreshold(SpikingThresholdRule::default()));
    network.graph.neuron_mut(spiker).unwrap().label = "trigger".into();

    let members = network.graph.group(group).unwrap().neurons().to_vec();
    let synapse = network.graph.add_synapse(spiker, members[0]).unwrap();
    {
        let synapse = network.graph.synapse_mut(synapse).unwrap();
        synapse.set_delay(3);
        synapse.set_responder(SpikeResponder::Step {
            response_height: 1.5,
            response_duration: 2,
        });
        synapse.force_set_strength(0.8);
    }

    let mut sparse = Sparse::new(0.5, 11);
    let synapses = sparse
        .connect(&mut network.graph, &members, &members)
        .unwrap();
    network
        .graph
        .add_synapse_group(group, group, synapses, sparse.name())
        .unwrap();

    let source = network.graph.add_array(3);
    let target = network.graph.add_array(2);
    network.graph.add_matrix(source, target).unwrap();
    network
        .update_manager
        .add_action(UpdateAction::PropagateMatrices);
    network
}

#[test]
fn test_structure_survives_round_trip() {
    let network = build_network();
    let document = document_from(&network);
    let restored = network_from(document).unwrap();

    assert_eq!(restored.graph.neuron_count(), network.graph.neuron_count());
    assert_eq!(
        restored.graph.synapse_count(),
        network.graph.synapse_count()
    );
    assert_eq!(restored.time_step(), network.time_step());
    assert_eq!(restored.rng_seed(), network.rng_seed());
    assert_eq!(
        restored.update_manager.len(),
        network.update_manager.len()
    );

    let original = network.graph.neuron_by_label("trigger").unwrap();
    let reloaded = restored.graph.neuron_by_label("trigger").unwrap();
    assert_eq!(original.id(), reloaded.id());
    // Fan indices were rebuilt, not persisted.
    assert_eq!(
        restored.graph.neuron(reloaded.id()).unwrap().fan_out().len(),
        network.graph.neuron(original.id()).unwrap().fan_out().len()
    );
}

#[test]
fn test_reloaded_network_steps_identically() {
    let mut original = build_network();
    let document = document_from(&original);
    let mut restored = network_from(document).unwrap();

    let ids = original.graph.neuron_ids().to_vec();
    for _ in 0..10 {
        original.step().unwrap();
        restored.step().unwrap();
    }
    for id in ids {
        let a = original.graph.neuron(id).unwrap().activation();
        let b = restored.graph.neuron(id).unwrap().activation();
        assert!(
            (a - b).abs() < 1e-12,
            "activations diverged on {id}: {a} vs {b}"
        );
    }
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.json");
    let network = build_network();
    save_network(&network, &path).unwrap();
    let restored = load_network(&path).unwrap();
    assert_eq!(restored.graph.neuron_count(), network.graph.neuron_count());
}

#[test]
fn test_version_mismatch_is_hard_error() {
    let network = build_network();
    let mut document = document_from(&network);
    document.version = DOCUMENT_VERSION + 1;
    match network_from(document) {
        Err(DocumentError::VersionMismatch {
            document_version, ..
        }) => assert_eq!(document_version, DOCUMENT_VERSION + 1),
        Err(other) => panic!("expected version mismatch, got {other:?}"),
        Ok(_) => panic!("expected version mismatch, got a network"),
    }
}

#[test]
fn test_wrong_format_tag_rejected() {
    let network = build_network();
    let mut document = document_from(&network);
    document.format = "something-else".into();
    assert!(matches!(
        network_from(document),
        Err(DocumentError::InvalidFormat(_))
    ));
}
