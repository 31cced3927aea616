// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The synapse: a directed, weighted connection with an optional spike
//! responder and a delay line.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use neuromesh_neural::responders::{ResponderState, SpikeResponder};
use neuromesh_neural::types::{NeuronId, SynapseId};

/// How a synapse's strength changes during simulation. `Static` synapses
/// only change through explicit writes (trainer or user); `Hebbian`
/// strengthens with correlated activity when a synapse-update action runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum LearningRule {
    #[default]
    Static,
    Hebbian {
        learning_rate: f64,
    },
}

/// One step of synapse output, computed without mutating the synapse. Used
/// by the concurrent buffered update to run the read phase in parallel and
/// commit sequentially.
#[derive(Debug, Clone, Copy)]
pub struct SynapsePhase {
    /// Value produced this step, before the delay line.
    raw: f64,
    /// Responder state after this step.
    responder_state: ResponderState,
    /// The post-synaptic response that will be visible after commit.
    pub psr: f64,
}

/// A directed connection between two neurons.
///
/// The post-synaptic response (`psr`) is the totality of this synapse's
/// output: `strength × source activation` in the connectionist case, or the
/// spike responder's time-extended output for spiking sources. A non-zero
/// delay routes the response through a ring buffer so a value produced at
/// step t becomes visible at step t + delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synapse {
    id: SynapseId,
    source: NeuronId,
    target: NeuronId,

    strength: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,

    delay: u32,

    pub responder: SpikeResponder,
    pub responder_state: ResponderState,

    pub learning_rule: LearningRule,

    /// Disabled synapses pass no activation at all.
    pub enabled: bool,

    /// Frozen synapses ignore clipped strength writes (learning); only
    /// force-writes change them.
    pub frozen: bool,

    /// In-flight delayed responses. Transient: reset on clear and on load.
    #[serde(skip)]
    delay_line: VecDeque<f64>,

    #[serde(skip)]
    psr: f64,
}

impl Synapse {
    pub const DEFAULT_UPPER_BOUND: f64 = 100.0;
    pub const DEFAULT_LOWER_BOUND: f64 = -100.0;

    pub fn new(id: SynapseId, source: NeuronId, target: NeuronId) -> Self {
        Self {
            id,
            source,
            target,
            strength: 1.0,
            upper_bound: Self::DEFAULT_UPPER_BOUND,
            lower_bound: Self::DEFAULT_LOWER_BOUND,
            delay: 0,
            responder: SpikeResponder::None,
            responder_state: ResponderState::None,
            learning_rule: LearningRule::Static,
            enabled: true,
            frozen: false,
            delay_line: VecDeque::new(),
            psr: 0.0,
        }
    }

    pub fn id(&self) -> SynapseId {
        self.id
    }

    pub fn source(&self) -> NeuronId {
        self.source
    }

    pub fn target(&self) -> NeuronId {
        self.target
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Set the strength, clipped to the synapse bounds. Ignored when the
    /// synapse is frozen.
    pub fn set_strength(&mut self, strength: f64) {
        if self.frozen {
            return;
        }
        self.strength = self.clip(strength);
    }

    /// Set the strength without clipping or the frozen check. Trainer and
    /// explicit user writes come through here.
    pub fn force_set_strength(&mut self, strength: f64) {
        self.strength = strength;
    }

    /// Utility for learning rules: clip a value to this synapse's bounds.
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.lower_bound, self.upper_bound)
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Set the delay in steps. The internal queue is resized and zeroed, so
    /// previously queued responses are discarded.
    pub fn set_delay(&mut self, delay: u32) {
        self.delay = delay;
        self.delay_line.clear();
        self.delay_line.resize(delay as usize, 0.0);
    }

    /// Derive the delay from the Euclidean distance between the endpoint
    /// positions and a maximum propagation speed (distance units per step).
    pub fn delay_from_distance(&mut self, distance: f64, propagation_speed: f64) {
        let steps = if propagation_speed > 0.0 {
            (distance / propagation_speed).ceil() as u32
        } else {
            0
        };
        self.set_delay(steps);
    }

    /// Assign a new spike responder, replacing its state holder.
    pub fn set_responder(&mut self, responder: SpikeResponder) {
        self.responder_state = responder.default_state();
        self.responder = responder;
    }

    /// The current post-synaptic response: this synapse's contribution to
    /// its target's input accumulator for the current step.
    pub fn psr(&self) -> f64 {
        self.psr
    }

    /// Compute one step of output without committing it.
    pub fn phase(&self, source_activation: f64, source_spiked: bool, dt: f64) -> SynapsePhase {
        if !self.enabled {
            return SynapsePhase {
                raw: 0.0,
                responder_state: self.responder_state,
                psr: 0.0,
            };
        }
        let mut responder_state = self.responder_state;
        let raw = if self.responder.is_none() {
            // The connectionist case: one term of a classical weighted input.
            self.strength * source_activation
        } else {
            self.responder
                .apply(source_spiked, self.strength, dt, &mut responder_state)
        };
        let psr = if self.delay == 0 {
            raw
        } else {
            self.delay_line.front().copied().unwrap_or(0.0)
        };
        SynapsePhase {
            raw,
            responder_state,
            psr,
        }
    }

    /// Commit a previously computed phase: advance the responder state and
    /// the delay line, and publish the post-synaptic response.
    pub fn commit_phase(&mut self, phase: SynapsePhase) {
        self.responder_state = phase.responder_state;
        if !self.enabled {
            self.psr = 0.0;
            return;
        }
        if self.delay == 0 {
            self.psr = phase.raw;
        } else {
            if self.delay_line.len() < self.delay as usize {
                self.delay_line.resize(self.delay as usize, 0.0);
            }
            self.delay_line.push_back(phase.raw);
            self.psr = self.delay_line.pop_front().unwrap_or(0.0);
        }
    }

    /// Update the output of this synapse for the current step.
    pub fn update_psr(&mut self, source_activation: f64, source_spiked: bool, dt: f64) {
        let phase = self.phase(source_activation, source_spiked, dt);
        self.commit_phase(phase);
    }

    /// Apply the learning rule, if any. Reads are the activations committed
    /// at the end of the previous phase, so buffered updates always feed a
    /// consistent pre-step pair here.
    pub fn apply_learning(&mut self, source_activation: f64, target_activation: f64, dt: f64) {
        match self.learning_rule {
            LearningRule::Static => {}
            LearningRule::Hebbian { learning_rate } => {
                let delta = learning_rate * source_activation * target_activation * dt;
                self.set_strength(self.strength + delta);
            }
        }
    }

    /// Clear the response process: zero the post-synaptic response, drop all
    /// queued delayed values, and reset responder timers. Strength is
    /// untouched; clearing is not unlearning.
    pub fn clear(&mut self) {
        self.psr = 0.0;
        self.responder_state = self.responder.default_state();
        for value in self.delay_line.iter_mut() {
            *value = 0.0;
        }
    }

    /// Restore transient state after deserialization.
    pub(crate) fn reset_transient(&mut self) {
        self.delay_line.clear();
        self.delay_line.resize(self.delay as usize, 0.0);
        self.psr = 0.0;
    }
}
