// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuromesh Neural Computation
//!
//! All per-node and per-edge dynamics in one place:
//! - **Types**: core type definitions (`NeuronId`, `SynapseId`, `Polarity`, ...)
//! - **Rules**: neuron update rules (linear, sigmoidal, Izhikevich, ...)
//! - **Responders**: spike responders converting delayed spike events into
//!   time-extended input contributions
//!
//! Rules and responders are closed sum types: every variant is known at
//! compile time and dispatch is an exhaustive `match`. Auxiliary per-neuron
//! and per-synapse state lives in separate data-holder enums so that
//! different rules can keep different fields (a recovery variable, a phase
//! accumulator) without the host graph knowing the details.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod responders;
pub mod rules;
pub mod types;

pub use responders::{ResponderState, SpikeResponder};
pub use rules::{
    ClippingMode, RuleContext, RuleOutcome, RuleState, SpikingData, SquashingFamily, TimeType,
    UpdateRule,
};
pub use types::{ArrayId, GroupId, MatrixId, NeuralError, NeuronId, Polarity, Result, SynapseId};
