// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Spike Responders
//!
//! A spike responder converts a (delayed) spike event arriving at a synapse
//! into a time-extended scalar contribution to the target neuron's input
//! accumulator. Each synapse owns its responder configuration and a private
//! [`ResponderState`]; contributions from multiple synapses into one target
//! simply sum.
//!
//! State is plain data: structurally copying a synapse clones the state, so
//! timers never alias between the copy and the original.

use serde::{Deserialize, Serialize};

/// Per-synapse spike response model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SpikeResponder {
    /// No response process: the synapse contributes `strength × source
    /// activation` every step (the connectionist case).
    #[default]
    None,
    /// A fixed-height pulse lasting `response_duration` steps after the
    /// spike arrives.
    Step {
        response_height: f64,
        response_duration: u32,
    },
    /// Jump to `jump_height` on arrival, then decay exponentially toward
    /// `base_line` with the given time constant.
    JumpAndDecay {
        jump_height: f64,
        base_line: f64,
        time_constant: f64,
    },
    /// Difference of exponentials: a fast rise followed by a slower decay.
    RiseAndDecay {
        maximum_response: f64,
        rise_constant: f64,
        decay_constant: f64,
    },
    /// Use-dependent short-term plasticity: the jump amplitude is modulated
    /// by a utilization/resource pair (facilitation and depression), and the
    /// response decays like a jump-and-decay.
    ShortTermPlasticity {
        mean_utilization: f64,
        facilitation_constant: f64,
        depression_constant: f64,
        time_constant: f64,
    },
}

/// Private response-process state, one per synapse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ResponderState {
    #[default]
    None,
    Step {
        steps_remaining: u32,
    },
    Decay {
        value: f64,
    },
    RiseAndDecay {
        value: f64,
        recovery: f64,
    },
    Stp {
        utilization: f64,
        resources: f64,
        value: f64,
    },
}

impl SpikeResponder {
    pub fn name(&self) -> &'static str {
        match self {
            SpikeResponder::None => "None",
            SpikeResponder::Step { .. } => "Step",
            SpikeResponder::JumpAndDecay { .. } => "Jump and Decay",
            SpikeResponder::RiseAndDecay { .. } => "Rise and Decay",
            SpikeResponder::ShortTermPlasticity { .. } => "Short-Term Plasticity",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SpikeResponder::None)
    }

    /// The state holder this responder needs. Assigning a responder to a
    /// synapse replaces its holder.
    pub fn default_state(&self) -> ResponderState {
        match self {
            SpikeResponder::None => ResponderState::None,
            SpikeResponder::Step { .. } => ResponderState::Step { steps_remaining: 0 },
            SpikeResponder::JumpAndDecay { base_line, .. } => {
                ResponderState::Decay { value: *base_line }
            }
            SpikeResponder::RiseAndDecay { .. } => ResponderState::RiseAndDecay {
                value: 0.0,
                recovery: 0.0,
            },
            SpikeResponder::ShortTermPlasticity {
                mean_utilization, ..
            } => ResponderState::Stp {
                utilization: *mean_utilization,
                resources: 1.0,
                value: 0.0,
            },
        }
    }

    /// Advance the response process by one step. `spike_arrived` is whether
    /// the source's spike (after the synapse delay) reaches the responder on
    /// this step. Returns the post-synaptic response for this step, already
    /// scaled by the synapse strength.
    pub fn apply(
        &self,
        spike_arrived: bool,
        strength: f64,
        dt: f64,
        state: &mut ResponderState,
    ) -> f64 {
        match (self, state) {
            (SpikeResponder::None, _) => 0.0,

            (
                SpikeResponder::Step {
                    response_height,
                    response_duration,
                },
                ResponderState::Step { steps_remaining },
            ) => {
                if spike_arrived {
                    *steps_remaining = *response_duration;
                }
                if *steps_remaining > 0 {
                    *steps_remaining -= 1;
                    response_height * strength
                } else {
                    0.0
                }
            }

            (
                SpikeResponder::JumpAndDecay {
                    jump_height,
                    base_line,
                    time_constant,
                },
                ResponderState::Decay { value },
            ) => {
                if spike_arrived {
                    *value = *jump_height;
                } else {
                    *value += dt / time_constant * (base_line - *value);
                }
                *value * strength
            }

            (
                SpikeResponder::RiseAndDecay {
                    maximum_response,
                    rise_constant,
                    decay_constant,
                },
                ResponderState::RiseAndDecay { value, recovery },
            ) => {
                if spike_arrived {
                    *recovery = 1.0;
                }
                *value += dt / decay_constant * (maximum_response * *recovery - *value);
                *recovery += dt / rise_constant * -*recovery;
                *value * strength
            }

            (
                SpikeResponder::ShortTermPlasticity {
                    mean_utilization,
                    facilitation_constant,
                    depression_constant,
                    time_constant,
                },
                ResponderState::Stp {
                    utilization,
                    resources,
                    value,
                },
            ) => {
                *utilization += dt * (mean_utilization - *utilization) / facilitation_constant;
                *resources += dt * (1.0 - *resources) / depression_constant;
                if spike_arrived {
                    *utilization += mean_utilization * (1.0 - *utilization);
                    let amplitude = *utilization * *resources;
                    *resources -= amplitude;
                    *value = amplitude;
                } else {
                    *value += dt / time_constant * -*value;
                }
                *value * strength
            }

            // Holder variant lagging behind a responder reassignment: reset
            // and retry once with the matching holder.
            (responder, state) => {
                *state = responder.default_state();
                responder.apply(spike_arrived, strength, dt, state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_responder_pulse_shape() {
        let responder = SpikeResponder::Step {
            response_height: 2.0,
            response_duration: 3,
        };
        let mut state = responder.default_state();

        // Nothing before a spike arrives.
        assert_eq!(responder.apply(false, 1.0, 1.0, &mut state), 0.0);
        // Height for exactly `duration` steps from arrival.
        assert_eq!(responder.apply(true, 1.0, 1.0, &mut state), 2.0);
        assert_eq!(responder.apply(false, 1.0, 1.0, &mut state), 2.0);
        assert_eq!(responder.apply(false, 1.0, 1.0, &mut state), 2.0);
        // Then back to zero.
        assert_eq!(responder.apply(false, 1.0, 1.0, &mut state), 0.0);
    }

    #[test]
    fn test_step_responder_restarts_on_new_spike() {
        let responder = SpikeResponder::Step {
            response_height: 1.0,
            response_duration: 2,
        };
        let mut state = responder.default_state();
        responder.apply(true, 1.0, 1.0, &mut state);
        // Second spike mid-pulse restarts the counter.
        responder.apply(true, 1.0, 1.0, &mut state);
        assert_eq!(responder.apply(false, 1.0, 1.0, &mut state), 1.0);
        assert_eq!(responder.apply(false, 1.0, 1.0, &mut state), 0.0);
    }

    #[test]
    fn test_jump_and_decay() {
        let responder = SpikeResponder::JumpAndDecay {
            jump_height: 1.0,
            base_line: 0.0,
            time_constant: 2.0,
        };
        let mut state = responder.default_state();
        let jump = responder.apply(true, 1.0, 1.0, &mut state);
        assert_eq!(jump, 1.0);
        let decayed = responder.apply(false, 1.0, 1.0, &mut state);
        assert!(decayed < jump && decayed > 0.0);
    }

    #[test]
    fn test_rise_and_decay_rises_then_falls() {
        let responder = SpikeResponder::RiseAndDecay {
            maximum_response: 1.0,
            rise_constant: 2.0,
            decay_constant: 4.0,
        };
        let mut state = responder.default_state();
        let mut values = vec![responder.apply(true, 1.0, 1.0, &mut state)];
        for _ in 0..20 {
            values.push(responder.apply(false, 1.0, 1.0, &mut state));
        }
        let peak_index = values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        // The response builds up before it decays.
        assert!(peak_index > 0);
        assert!(values[peak_index] > values[0]);
        assert!(*values.last().unwrap() < values[peak_index]);
    }

    #[test]
    fn test_stp_depresses_under_rapid_spiking() {
        let responder = SpikeResponder::ShortTermPlasticity {
            mean_utilization: 0.5,
            facilitation_constant: 50.0,
            depression_constant: 50.0,
            time_constant: 2.0,
        };
        let mut state = responder.default_state();
        let first = responder.apply(true, 1.0, 1.0, &mut state);
        let mut last = first;
        // Spiking every step exhausts resources: amplitude falls.
        for _ in 0..10 {
            last = responder.apply(true, 1.0, 1.0, &mut state);
        }
        assert!(last < first);
    }

    #[test]
    fn test_responder_state_copies_do_not_alias() {
        let responder = SpikeResponder::Step {
            response_height: 1.0,
            response_duration: 5,
        };
        let mut original = responder.default_state();
        responder.apply(true, 1.0, 1.0, &mut original);
        let mut copy = original;
        // Advancing the copy leaves the original untouched.
        responder.apply(false, 1.0, 1.0, &mut copy);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_inhibitory_strength_flips_sign() {
        let responder = SpikeResponder::Step {
            response_height: 2.0,
            response_duration: 1,
        };
        let mut state = responder.default_state();
        assert_eq!(responder.apply(true, -1.0, 1.0, &mut state), -2.0);
    }

    #[test]
    fn test_mismatched_state_recovers() {
        let responder = SpikeResponder::JumpAndDecay {
            jump_height: 3.0,
            base_line: 0.0,
            time_constant: 2.0,
        };
        let mut state = ResponderState::Step { steps_remaining: 9 };
        assert_eq!(responder.apply(true, 1.0, 1.0, &mut state), 3.0);
        assert!(matches!(state, ResponderState::Decay { .. }));
    }
}
