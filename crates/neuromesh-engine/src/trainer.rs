// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Trainer Boundary
//!
//! The engine does not implement gradient or optimizer logic. It exposes
//! the hooks an external trainer drives: row-indexed training data, forced
//! activation writes (tolerated even on clamped neurons and mid-step), and
//! a cooperative loop with a per-iteration stop check.

use ndarray::{Array2, ArrayView1};
use tracing::debug;

use neuromesh_graph::NeuronId;

use crate::error::{NetworkError, Result};
use crate::network::Network;
use crate::run::RunHandle;

/// Row-aligned input/target data. Row access is explicitly checked: an
/// out-of-range row is an error, never a silent wrap or clamp.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    inputs: Array2<f64>,
    targets: Array2<f64>,
}

impl TrainingSet {
    pub fn new(inputs: Array2<f64>, targets: Array2<f64>) -> Result<Self> {
        if inputs.nrows() != targets.nrows() {
            return Err(NetworkError::TrainingSetMismatch {
                inputs: inputs.nrows(),
                targets: targets.nrows(),
            });
        }
        Ok(Self { inputs, targets })
    }

    pub fn rows(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn input_row(&self, index: usize) -> Result<ArrayView1<'_, f64>> {
        if index >= self.rows() {
            return Err(NetworkError::RowOutOfRange {
                index,
                rows: self.rows(),
            });
        }
        Ok(self.inputs.row(index))
    }

    pub fn target_row(&self, index: usize) -> Result<ArrayView1<'_, f64>> {
        if index >= self.rows() {
            return Err(NetworkError::RowOutOfRange {
                index,
                rows: self.rows(),
            });
        }
        Ok(self.targets.row(index))
    }
}

/// Wires a training set to input and output neurons and drives the network
/// row by row. The external trainer observes each row's outputs and targets
/// and writes weights/activations directly; this harness only sequences the
/// steps and honors the stop flag.
pub struct TrainingHarness<'a> {
    pub input_neurons: &'a [NeuronId],
    pub output_neurons: &'a [NeuronId],
    pub set: &'a TrainingSet,
}

impl<'a> TrainingHarness<'a> {
    pub fn new(
        input_neurons: &'a [NeuronId],
        output_neurons: &'a [NeuronId],
        set: &'a TrainingSet,
    ) -> Self {
        Self {
            input_neurons,
            output_neurons,
            set,
        }
    }

    /// Force one input row onto the input neurons.
    pub fn apply_input_row(&self, network: &mut Network, row: usize) -> Result<()> {
        let values = self.set.input_row(row)?;
        if values.len() != self.input_neurons.len() {
            return Err(NetworkError::RowLengthMismatch {
                expected: self.input_neurons.len(),
                actual: values.len(),
            });
        }
        for (&id, &value) in self.input_neurons.iter().zip(values.iter()) {
            network.graph.neuron_mut(id)?.set_activation(value);
        }
        Ok(())
    }

    /// One pass over all rows: for each row, force the inputs, step the
    /// network, and hand (outputs, targets) to the observer, which performs
    /// whatever weight updates it wants between steps. The stop flag is
    /// checked once per row; stopping mid-epoch leaves prior rows' effects
    /// in place. Returns the number of rows processed.
    pub fn run_epoch(
        &self,
        network: &mut Network,
        handle: &RunHandle,
        mut observer: impl FnMut(&mut Network, usize, &[f64], &[f64]) -> Result<()>,
    ) -> Result<u64> {
        let mut processed = 0;
        for row in 0..self.set.rows() {
            if !handle.is_running() {
                break;
            }
            self.apply_input_row(network, row)?;
            network.step()?;
            let outputs = network.read_activations(self.output_neurons)?;
            let targets = self.set.target_row(row)?;
            observer(
                network,
                row,
                &outputs,
                targets.as_slice().unwrap_or(&[]),
            )?;
            processed += 1;
        }
        debug!(processed, "training epoch finished");
        Ok(processed)
    }
}
