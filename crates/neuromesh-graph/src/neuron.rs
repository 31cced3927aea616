// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The neuron: a node in the simulation graph.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use neuromesh_neural::rules::{RuleOutcome, RuleState, TimeType, UpdateRule};
use neuromesh_neural::types::{NeuronId, Polarity, SynapseId};

/// A node in the network graph. Most of the simulation's logic flows through
/// here: inputs accumulate in `input`, the update rule maps them to a new
/// activation, and spiking rules raise the `spiked` flag for responders to
/// observe on the following step.
///
/// Fan-in and fan-out are indices maintained by the owning
/// [`crate::NetworkGraph`]; they are rebuilt from the synapse table after
/// deserialization and are therefore not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neuron {
    id: NeuronId,
    pub label: String,

    /// The main state variable.
    activation: f64,

    /// Aggregates all inputs (from other nodes, couplings, or scripts) to
    /// this node. Cleared when the update rule consumes it.
    input: f64,

    /// A clamped neuron keeps its externally set value; the update rule is
    /// skipped entirely.
    pub clamped: bool,

    /// Used by topology generators when assigning strengths and selecting
    /// radial candidates.
    pub polarity: Polarity,

    update_rule: UpdateRule,
    rule_state: RuleState,

    /// Smaller values update first under priority-based update.
    pub update_priority: i32,

    /// Amount added/removed when the value is manually adjusted.
    pub increment: f64,

    pub x: f64,
    pub y: f64,

    /// True exactly when the last rule application produced a spike.
    spiked: bool,

    /// Incoming synapses, in creation order.
    #[serde(skip)]
    fan_in: Vec<SynapseId>,

    /// Outgoing synapses keyed by target. This map carries the structural
    /// invariant of at most one synapse per ordered (source, target) pair.
    #[serde(skip)]
    fan_out: AHashMap<NeuronId, SynapseId>,
}

impl Neuron {
    pub fn new(id: NeuronId, update_rule: UpdateRule) -> Self {
        let rule_state = update_rule.default_state();
        Self {
            id,
            label: String::new(),
            activation: 0.0,
            input: 0.0,
            clamped: false,
            polarity: Polarity::Both,
            update_rule,
            rule_state,
            update_priority: 0,
            increment: 0.1,
            x: 0.0,
            y: 0.0,
            spiked: false,
            fan_in: Vec::new(),
            fan_out: AHashMap::new(),
        }
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    /// Set the activation directly. Works regardless of the clamped flag;
    /// external writers (trainers, couplings) use this.
    pub fn set_activation(&mut self, value: f64) {
        self.activation = value;
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    /// Add to the input accumulator. External components sending activation
    /// into the network use this so that several writers can contribute
    /// within one step. Inputs are cleared when the rule consumes them.
    pub fn add_input_value(&mut self, to_add: f64) {
        self.input += to_add;
    }

    pub fn clear_input(&mut self) {
        self.input = 0.0;
    }

    pub fn spiked(&self) -> bool {
        self.spiked
    }

    /// Reset the spike flag at the start of an update, before the rule gets
    /// a chance to raise it again.
    pub fn clear_spike(&mut self) {
        self.spiked = false;
    }

    pub fn update_rule(&self) -> &UpdateRule {
        &self.update_rule
    }

    /// Assign a new update rule. The state holder is replaced whenever the
    /// rule family changes, so stale auxiliary state never leaks across
    /// rule types.
    pub fn set_update_rule(&mut self, rule: UpdateRule) {
        if std::mem::discriminant(&self.update_rule) != std::mem::discriminant(&rule) {
            self.rule_state = rule.default_state();
        }
        self.update_rule = rule;
    }

    pub fn rule_state(&self) -> &RuleState {
        &self.rule_state
    }

    pub fn rule_state_mut(&mut self) -> &mut RuleState {
        &mut self.rule_state
    }

    pub fn time_type(&self) -> TimeType {
        self.update_rule.time_type()
    }

    pub fn last_spike_time(&self) -> Option<f64> {
        self.rule_state.last_spike_time()
    }

    /// Commit one rule application: new activation, spike flag, and a fresh
    /// input accumulator.
    pub fn commit(&mut self, outcome: RuleOutcome) {
        self.activation = outcome.activation;
        self.spiked = outcome.spiked;
        self.input = 0.0;
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Euclidean distance to another neuron's position.
    pub fn distance_to(&self, other: &Neuron) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn increment_activation(&mut self) {
        self.activation += self.increment;
    }

    pub fn decrement_activation(&mut self) {
        self.activation -= self.increment;
    }

    /// Zero the neuron: activation, pending input, and rule state.
    pub fn clear(&mut self) {
        self.activation = 0.0;
        self.input = 0.0;
        self.spiked = false;
        self.rule_state = self.update_rule.default_state();
    }

    pub fn fan_in(&self) -> &[SynapseId] {
        &self.fan_in
    }

    pub fn fan_out(&self) -> &AHashMap<NeuronId, SynapseId> {
        &self.fan_out
    }

    pub fn fan_out_to(&self, target: NeuronId) -> Option<SynapseId> {
        self.fan_out.get(&target).copied()
    }

    pub(crate) fn add_to_fan_in(&mut self, synapse: SynapseId) {
        self.fan_in.push(synapse);
    }

    pub(crate) fn remove_from_fan_in(&mut self, synapse: SynapseId) {
        self.fan_in.retain(|&s| s != synapse);
    }

    pub(crate) fn add_to_fan_out(&mut self, target: NeuronId, synapse: SynapseId) {
        self.fan_out.insert(target, synapse);
    }

    pub(crate) fn remove_from_fan_out(&mut self, target: NeuronId) {
        self.fan_out.remove(&target);
    }

    pub(crate) fn clear_indices(&mut self) {
        self.fan_in.clear();
        self.fan_out.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_neural::rules::{LinearRule, SpikingThresholdRule};

    #[test]
    fn test_rule_change_replaces_state_holder() {
        let mut n = Neuron::new(NeuronId(0), UpdateRule::Linear(LinearRule::default()));
        assert_eq!(*n.rule_state(), RuleState::Empty);

        n.set_update_rule(UpdateRule::SpikingThreshold(SpikingThresholdRule::default()));
        assert!(matches!(n.rule_state(), RuleState::Spiking(_)));

        // Same family: the holder is preserved.
        n.set_update_rule(UpdateRule::SpikingThreshold(SpikingThresholdRule {
            threshold: 2.0,
        }));
        assert!(matches!(n.rule_state(), RuleState::Spiking(_)));
    }

    #[test]
    fn test_input_accumulates_until_commit() {
        let mut n = Neuron::new(NeuronId(0), UpdateRule::default());
        n.add_input_value(0.25);
        n.add_input_value(0.25);
        assert_eq!(n.input(), 0.5);
        n.commit(RuleOutcome::activation(0.5));
        assert_eq!(n.input(), 0.0);
        assert_eq!(n.activation(), 0.5);
    }

    #[test]
    fn test_distance() {
        let mut a = Neuron::new(NeuronId(0), UpdateRule::default());
        let mut b = Neuron::new(NeuronId(1), UpdateRule::default());
        a.set_position(0.0, 0.0);
        b.set_position(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
