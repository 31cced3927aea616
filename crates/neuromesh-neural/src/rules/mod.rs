// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuron Update Rules
//!
//! An update rule maps a neuron's accumulated weighted input, its bias, and
//! its own prior state to a new activation value. Spiking variants also
//! raise a discrete "spiked" signal and record the spike time.
//!
//! Rules are a closed sum type ([`UpdateRule`]); per-rule auxiliary state
//! lives in [`RuleState`] so that an Izhikevich recovery variable or an
//! oscillator phase accumulator never leaks into the neuron itself.
//!
//! Two contracts every variant honors:
//! - Bounds are applied as the *last* step of the computation; inputs are
//!   never clamped.
//! - `derivative` is analytic, zero outside any configured saturation
//!   bounds, and equal to the configured slope (or the rule-specific value)
//!   inside them.

mod decay;
mod izhikevich;
mod linear;
mod oscillator;
mod random;
mod sigmoidal;
mod spiking_threshold;

pub use decay::DecayRule;
pub use izhikevich::IzhikevichRule;
pub use linear::{ClippingMode, LinearRule};
pub use oscillator::OscillatorRule;
pub use random::RandomRule;
pub use sigmoidal::{SigmoidalRule, SquashingFamily};

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
pub use spiking_threshold::SpikingThresholdRule;

use crate::types::Result;

/// Whether a rule treats update iterations as discrete time steps or as an
/// integration of continuous time by `dt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeType {
    Discrete,
    Continuous,
}

/// Inputs available to a rule application. The generator is owned by the
/// simulation context (one per network), not by the rule: rules stay plain
/// data and two networks with equal seeds evolve identically.
pub struct RuleContext<'a> {
    /// Accumulated weighted input plus any externally added input.
    pub input: f64,
    /// Activation before this update.
    pub activation: f64,
    /// Simulation time at the start of this step.
    pub time: f64,
    /// Integration step size.
    pub dt: f64,
    /// Simulation-owned generator for stochastic rules.
    pub rng: &'a mut StdRng,
}

/// Result of one rule application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleOutcome {
    pub activation: f64,
    pub spiked: bool,
}

impl RuleOutcome {
    pub fn activation(activation: f64) -> Self {
        Self {
            activation,
            spiked: false,
        }
    }

    pub fn spike(activation: f64) -> Self {
        Self {
            activation,
            spiked: true,
        }
    }
}

/// Spike bookkeeping shared by all spiking rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikingData {
    /// Time of the most recent spike, negative infinity before any spike.
    pub last_spike_time: f64,
}

impl Default for SpikingData {
    fn default() -> Self {
        Self {
            last_spike_time: f64::NEG_INFINITY,
        }
    }
}

impl SpikingData {
    pub fn record_spike(&mut self, time: f64) {
        self.last_spike_time = time;
    }

    /// Rewind bookkeeping when the network clock is set backwards
    /// (e.g. a reset): spike times are re-expressed relative to the new
    /// origin, clamped at zero.
    pub fn rewind(&mut self, old_time: f64, new_time: f64) {
        if self.last_spike_time.is_finite() {
            let elapsed = old_time - self.last_spike_time;
            self.last_spike_time = (new_time - elapsed).max(0.0);
        }
    }
}

/// Opaque per-neuron state holder. Each rule family declares which variant
/// it needs via [`UpdateRule::default_state`]; the graph stores whatever it
/// is handed without inspecting it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum RuleState {
    #[default]
    Empty,
    Spiking(SpikingData),
    Izhikevich {
        recovery: f64,
        spiking: SpikingData,
    },
    Oscillator {
        phase: f64,
    },
}

impl RuleState {
    /// Spike bookkeeping, if this holder carries any.
    pub fn spiking_data_mut(&mut self) -> Option<&mut SpikingData> {
        match self {
            RuleState::Spiking(data) => Some(data),
            RuleState::Izhikevich { spiking, .. } => Some(spiking),
            _ => None,
        }
    }

    pub fn last_spike_time(&self) -> Option<f64> {
        match self {
            RuleState::Spiking(data) => Some(data.last_spike_time),
            RuleState::Izhikevich { spiking, .. } => Some(spiking.last_spike_time),
            _ => None,
        }
    }
}

/// Per-neuron activation dynamics. One of these is assigned to every neuron;
/// the graph dispatches on the variant each step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpdateRule {
    Linear(LinearRule),
    Sigmoidal(SigmoidalRule),
    Decay(DecayRule),
    Izhikevich(IzhikevichRule),
    SpikingThreshold(SpikingThresholdRule),
    Oscillator(OscillatorRule),
    Random(RandomRule),
}

impl Default for UpdateRule {
    fn default() -> Self {
        UpdateRule::Linear(LinearRule::default())
    }
}

impl UpdateRule {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateRule::Linear(_) => "Linear",
            UpdateRule::Sigmoidal(_) => "Sigmoidal",
            UpdateRule::Decay(_) => "Decay",
            UpdateRule::Izhikevich(_) => "Izhikevich",
            UpdateRule::SpikingThreshold(_) => "Spiking Threshold",
            UpdateRule::Oscillator(_) => "Oscillator",
            UpdateRule::Random(_) => "Random",
        }
    }

    /// Compute the new activation (and spike flag) from the accumulated
    /// input and the rule's prior state.
    pub fn apply(&self, ctx: RuleContext<'_>, state: &mut RuleState) -> RuleOutcome {
        let outcome = match self {
            UpdateRule::Linear(rule) => rule.apply(&ctx),
            UpdateRule::Sigmoidal(rule) => rule.apply(&ctx),
            UpdateRule::Decay(rule) => rule.apply(&ctx),
            UpdateRule::Izhikevich(rule) => rule.apply(&ctx, state),
            UpdateRule::SpikingThreshold(rule) => rule.apply(&ctx),
            UpdateRule::Oscillator(rule) => rule.apply(&ctx, state),
            UpdateRule::Random(rule) => rule.apply(ctx.rng),
        };
        if outcome.spiked {
            if let Some(data) = state.spiking_data_mut() {
                data.record_spike(ctx.time);
            }
        }
        outcome
    }

    /// Analytic derivative of the activation function evaluated at the given
    /// activation. Zero outside saturation bounds.
    pub fn derivative(&self, activation: f64) -> f64 {
        match self {
            UpdateRule::Linear(rule) => rule.derivative(activation),
            UpdateRule::Sigmoidal(rule) => rule.derivative(activation),
            UpdateRule::Decay(rule) => rule.derivative(activation),
            // Spiking and generator dynamics are not differentiable; trainers
            // never select them.
            UpdateRule::Izhikevich(_)
            | UpdateRule::SpikingThreshold(_)
            | UpdateRule::Oscillator(_)
            | UpdateRule::Random(_) => 0.0,
        }
    }

    /// Whether this rule can raise the discrete spike signal.
    pub fn is_spiking(&self) -> bool {
        matches!(
            self,
            UpdateRule::Izhikevich(_) | UpdateRule::SpikingThreshold(_)
        )
    }

    pub fn time_type(&self) -> TimeType {
        match self {
            UpdateRule::Izhikevich(_) | UpdateRule::Oscillator(_) => TimeType::Continuous,
            _ => TimeType::Discrete,
        }
    }

    /// The state holder this rule needs. Assigning a rule to a neuron
    /// replaces the holder whenever the variant changes.
    pub fn default_state(&self) -> RuleState {
        match self {
            UpdateRule::Izhikevich(_) => RuleState::Izhikevich {
                recovery: 0.0,
                spiking: SpikingData::default(),
            },
            UpdateRule::SpikingThreshold(_) => RuleState::Spiking(SpikingData::default()),
            UpdateRule::Oscillator(_) => RuleState::Oscillator { phase: 0.0 },
            _ => RuleState::Empty,
        }
    }

    /// Saturation bounds, for rules that have them.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            UpdateRule::Linear(rule) => rule.bounds(),
            UpdateRule::Sigmoidal(rule) => Some((rule.lower_bound, rule.upper_bound)),
            UpdateRule::Decay(rule) => Some((rule.lower_bound, rule.upper_bound)),
            UpdateRule::Random(rule) => Some((rule.lower_bound, rule.upper_bound)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            UpdateRule::Linear(rule) => rule.validate(),
            UpdateRule::Sigmoidal(rule) => rule.validate(),
            UpdateRule::Decay(rule) => rule.validate(),
            UpdateRule::Izhikevich(rule) => rule.validate(),
            UpdateRule::SpikingThreshold(rule) => rule.validate(),
            UpdateRule::Oscillator(rule) => rule.validate(),
            UpdateRule::Random(rule) => rule.validate(),
        }
    }
}
