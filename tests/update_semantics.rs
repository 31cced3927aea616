// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Update discipline semantics: immediate vs. buffered visibility, the
//! concurrent snapshot equivalence, spike propagation timing, and delay
//! lines, exercised through whole networks.

use neuromesh::connect::{ConnectionStrategy, Sparse};
use neuromesh::engine::{Network, UpdateAction};
use neuromesh::neural::responders::SpikeResponder;
use neuromesh::neural::rules::{
    ClippingMode, LinearRule, SpikingThresholdRule, UpdateRule,
};

fn linear_unclipped() -> UpdateRule {
    UpdateRule::Linear(LinearRule {
        clipping: ClippingMode::NoClipping,
        ..LinearRule::default()
    })
}

fn spiker() -> UpdateRule {
    UpdateRule::SpikingThreshold(SpikingThresholdRule { threshold: 0.5 })
}

/// A -> B in insertion order: immediate update lets B see A's new value in
/// the same step; buffered update shows B only A's pre-step value.
#[test]
fn immediate_vs_buffered_visibility() {
    for (action, same_step_value) in [
        (UpdateAction::Immediate, 0.5),
        (UpdateAction::Buffered, 0.0),
    ] {
        let mut network = Network::new();
        let a = network.graph.add_neuron(linear_unclipped());
        let b = network.graph.add_neuron(linear_unclipped());
        network.graph.add_synapse(a, b).unwrap();

        network.update_manager.clear();
        network.update_manager.add_action(action);

        network.graph.neuron_mut(a).unwrap().add_input_value(0.5);
        network.step().unwrap();

        assert_eq!(network.graph.neuron(a).unwrap().activation(), 0.5);
        assert_eq!(
            network.graph.neuron(b).unwrap().activation(),
            same_step_value
        );
    }
}

/// Priority update is immediate-mode in ascending priority order: giving
/// the downstream neuron the lower priority makes it update first, so it
/// sees only the upstream neuron's pre-step value.
#[test]
fn priority_order_overrides_insertion_order() {
    let mut network = Network::new();
    let a = network.graph.add_neuron(linear_unclipped());
    let b = network.graph.add_neuron(linear_unclipped());
    network.graph.add_synapse(a, b).unwrap();
    network.graph.neuron_mut(a).unwrap().update_priority = 10;
    network.graph.neuron_mut(b).unwrap().update_priority = 0;

    network.update_manager.clear();
    network.update_manager.add_action(UpdateAction::Priority);

    network.graph.neuron_mut(a).unwrap().add_input_value(0.5);
    network.step().unwrap();

    assert_eq!(network.graph.neuron(a).unwrap().activation(), 0.5);
    // Under plain immediate update (insertion order) this would be 0.5.
    assert_eq!(network.graph.neuron(b).unwrap().activation(), 0.0);
}

fn random_spiking_network(action: UpdateAction) -> Network {
    let mut network = Network::with_seed(3);
    let neurons: Vec<_> = (0..20)
        .map(|i| {
            let rule = if i % 3 == 0 { spiker() } else { linear_unclipped() };
            network.graph.add_neuron_at(rule, i as f64 * 10.0, 0.0)
        })
        .collect();
    let mut sparse = Sparse::new(0.3, 17);
    let synapses = sparse
        .connect(&mut network.graph, &neurons, &neurons)
        .unwrap();
    for (i, &s) in synapses.iter().enumerate() {
        let synapse = network.graph.synapse_mut(s).unwrap();
        if i % 4 == 0 {
            synapse.set_delay((i % 3) as u32 + 1);
        }
        if i % 5 == 0 {
            synapse.set_responder(SpikeResponder::JumpAndDecay {
                jump_height: 1.0,
                base_line: 0.0,
                time_constant: 3.0,
            });
        }
    }
    network.update_manager.clear();
    network.update_manager.add_action(action);
    // Kick the network so something propagates.
    for &n in &neurons {
        network.graph.neuron_mut(n).unwrap().add_input_value(0.8);
    }
    network
}

/// The parallel snapshot phase must preserve the exact buffered results.
#[test]
fn concurrent_buffered_matches_sequential_buffered() {
    let mut sequential = random_spiking_network(UpdateAction::Buffered);
    let mut concurrent = random_spiking_network(UpdateAction::ConcurrentBuffered);

    let ids = sequential.graph.neuron_ids().to_vec();
    for _ in 0..25 {
        sequential.step().unwrap();
        concurrent.step().unwrap();
    }
    for id in ids {
        let a = sequential.graph.neuron(id).unwrap().activation();
        let b = concurrent.graph.neuron(id).unwrap().activation();
        assert!(
            (a - b).abs() < 1e-12,
            "snapshot parallelism changed results on {id}: {a} vs {b}"
        );
    }
}

/// Step responder end to end: a spike emitted at step t contributes 0 at t,
/// the configured height for the next D steps, then 0 again.
#[test]
fn step_responder_pulse_timing() {
    const HEIGHT: f64 = 2.0;
    const DURATION: u32 = 3;

    let mut network = Network::new();
    let a = network.graph.add_neuron(spiker());
    let b = network.graph.add_neuron(linear_unclipped());
    let s = network.graph.add_synapse(a, b).unwrap();
    network
        .graph
        .synapse_mut(s)
        .unwrap()
        .set_responder(SpikeResponder::Step {
            response_height: HEIGHT,
            response_duration: DURATION,
        });

    // One step's worth of drive: a single spike at step 1.
    network.graph.neuron_mut(a).unwrap().add_input_value(1.0);

    let mut received = Vec::new();
    for _ in 0..(DURATION as usize + 4) {
        network.step().unwrap();
        // Linear slope-1 target: activation equals the contribution it
        // received this step.
        received.push(network.graph.neuron(b).unwrap().activation());
    }

    // Spike step: nothing received.
    assert_eq!(received[0], 0.0);
    assert!(network.graph.neuron(a).unwrap().last_spike_time().is_some());
    // Next DURATION steps: the pulse height.
    for step in 1..=DURATION as usize {
        assert_eq!(received[step], HEIGHT, "step {step}");
    }
    // After the pulse: back to zero.
    for step in (DURATION as usize + 1)..received.len() {
        assert_eq!(received[step], 0.0, "step {step}");
    }
}

/// A value produced at step t crosses a delay-d synapse at step t+d.
#[test]
fn delay_line_shifts_contribution() {
    const DELAY: u32 = 3;

    let mut network = Network::new();
    let a = network.graph.add_neuron(linear_unclipped());
    let b = network.graph.add_neuron(linear_unclipped());
    let s = network.graph.add_synapse(a, b).unwrap();
    network.graph.synapse_mut(s).unwrap().set_delay(DELAY);

    // Clamp the source at a constant drive.
    network.graph.neuron_mut(a).unwrap().set_activation(1.0);
    network.graph.neuron_mut(a).unwrap().clamped = true;

    let mut received = Vec::new();
    for _ in 0..(DELAY as usize + 2) {
        network.step().unwrap();
        received.push(network.graph.neuron(b).unwrap().activation());
    }
    // Nothing for `DELAY` steps, then the source value arrives.
    for step in 0..DELAY as usize {
        assert_eq!(received[step], 0.0, "step {step}");
    }
    assert_eq!(received[DELAY as usize], 1.0);
    assert_eq!(received[DELAY as usize + 1], 1.0);
}

/// Spiking sources with no responder still behave connectionist-style: the
/// activation (1 on the spike step) times the strength crosses the synapse.
#[test]
fn spiker_without_responder_is_connectionist() {
    let mut network = Network::new();
    let a = network.graph.add_neuron(spiker());
    let b = network.graph.add_neuron(linear_unclipped());
    network.graph.add_synapse(a, b).unwrap();

    network.graph.neuron_mut(a).unwrap().add_input_value(1.0);
    network.step().unwrap();
    assert_eq!(network.graph.neuron(a).unwrap().activation(), 1.0);
    assert_eq!(network.graph.neuron(b).unwrap().activation(), 0.0);

    network.step().unwrap();
    // B reads A's spike-step activation one step later (buffered).
    assert_eq!(network.graph.neuron(b).unwrap().activation(), 1.0);
}
