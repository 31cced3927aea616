// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neuromesh Simulation Engine
//!
//! The aggregate root: a [`Network`] owns the graph, the simulation clock,
//! and an ordered list of update actions, and drives one discrete
//! simulation step at a time on a single logical thread.
//!
//! Two update disciplines are first-class and explicitly selected, never
//! inferred:
//!
//! - **Immediate**: each neuron recomputes from the current state of its
//!   inputs as they are updated, so iteration order affects results.
//! - **Buffered**: all inputs are computed from a pre-step snapshot, then
//!   all activations commit together, removing order dependence.
//!
//! "Concurrency" here means cooperative suspension, not parallel mutation:
//! run loops and training loops check a stop flag once per iteration, and
//! external components read or write the graph between steps. The one
//! parallel path, [`update::UpdateAction::ConcurrentBuffered`], partitions
//! the snapshot phase across workers and commits sequentially, preserving
//! the buffered guarantee.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod coupling;
mod error;
mod network;
mod run;
pub mod trainer;
pub mod update;

pub use coupling::{AttributeValue, Consumable, Coupling, CouplingSet, Producible};
pub use error::{NetworkError, Result};
pub use network::Network;
pub use run::{spawn_run, RunHandle};
pub use trainer::{TrainingHarness, TrainingSet};
pub use update::{ActionDescriptor, CustomAction, UpdateAction, UpdateDiscipline, UpdateManager};
