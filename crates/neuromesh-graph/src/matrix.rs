// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Matrix-based duals of the neuron/synapse representation.
//!
//! A [`NeuronArray`] holds a vector of activations instead of individual
//! neuron objects; a [`WeightMatrix`] holds a dense weight block instead of
//! individual synapses. Shapes must agree with the connected layer sizes at
//! all times; a mismatch is a hard error, never a silent reshape.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use neuromesh_neural::rules::{RuleContext, UpdateRule};
use neuromesh_neural::types::{ArrayId, MatrixId};

use crate::error::{GraphError, Result};

/// A layer of activations for batch/vectorized operation.
///
/// Arrays carry a single update rule applied element-wise. Stateful rule
/// families (spiking, oscillator) are not meaningful element-wise and fall
/// back to passing inputs through; arrays are intended for the
/// linear/sigmoidal/decay families used in training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronArray {
    id: ArrayId,
    pub label: String,
    activations: Array1<f64>,
    inputs: Array1<f64>,
    pub update_rule: UpdateRule,
}

impl NeuronArray {
    pub fn new(id: ArrayId, size: usize) -> Self {
        Self {
            id,
            label: String::new(),
            activations: Array1::zeros(size),
            inputs: Array1::zeros(size),
            update_rule: UpdateRule::default(),
        }
    }

    pub fn id(&self) -> ArrayId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.activations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activations.is_empty()
    }

    pub fn activations(&self) -> &Array1<f64> {
        &self.activations
    }

    /// Replace all activations. The length must match the layer size.
    pub fn set_activations(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.activations.len() {
            return Err(GraphError::LengthMismatch {
                expected: self.activations.len(),
                actual: values.len(),
            });
        }
        self.activations = Array1::from_vec(values.to_vec());
        Ok(())
    }

    pub fn inputs(&self) -> &Array1<f64> {
        &self.inputs
    }

    /// Add a contribution vector to the input buffer. Length-checked.
    pub fn add_inputs(&mut self, values: &Array1<f64>) -> Result<()> {
        if values.len() != self.inputs.len() {
            return Err(GraphError::LengthMismatch {
                expected: self.inputs.len(),
                actual: values.len(),
            });
        }
        self.inputs += values;
        Ok(())
    }

    pub fn clear_inputs(&mut self) {
        self.inputs.fill(0.0);
    }

    pub fn clear(&mut self) {
        self.activations.fill(0.0);
        self.inputs.fill(0.0);
    }

    /// Apply the array's rule element-wise to the accumulated inputs and
    /// clear the input buffer.
    pub fn apply_rule(&mut self, time: f64, dt: f64, rng: &mut StdRng) {
        for i in 0..self.activations.len() {
            let mut state = self.update_rule.default_state();
            let outcome = self.update_rule.apply(
                RuleContext {
                    input: self.inputs[i],
                    activation: self.activations[i],
                    time,
                    dt,
                    rng,
                },
                &mut state,
            );
            self.activations[i] = outcome.activation;
        }
        self.inputs.fill(0.0);
    }

    pub fn randomize(&mut self, rng: &mut StdRng) {
        for value in self.activations.iter_mut() {
            *value = rng.gen_range(-1.0..=1.0);
        }
    }
}

/// A dense weight block connecting a source array to a target array, with
/// shape (target_len, source_len).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightMatrix {
    id: MatrixId,
    pub label: String,
    source: ArrayId,
    target: ArrayId,
    weights: Array2<f64>,
}

impl WeightMatrix {
    /// Construct with identity-like diagonal weights, the conventional
    /// starting point for a new connector.
    pub fn new(id: MatrixId, source: ArrayId, target: ArrayId, rows: usize, cols: usize) -> Self {
        let mut weights = Array2::zeros((rows, cols));
        for i in 0..rows.min(cols) {
            weights[(i, i)] = 1.0;
        }
        Self {
            id,
            label: String::new(),
            source,
            target,
            weights,
        }
    }

    pub fn id(&self) -> MatrixId {
        self.id
    }

    pub fn source(&self) -> ArrayId {
        self.source
    }

    pub fn target(&self) -> ArrayId {
        self.target
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn rows(&self) -> usize {
        self.weights.nrows()
    }

    pub fn cols(&self) -> usize {
        self.weights.ncols()
    }

    /// Replace the weight block. The shape must match exactly.
    pub fn set_weights(&mut self, weights: Array2<f64>) -> Result<()> {
        if weights.dim() != self.weights.dim() {
            return Err(GraphError::ShapeMismatch {
                expected_rows: self.weights.nrows(),
                expected_cols: self.weights.ncols(),
                actual_rows: weights.nrows(),
                actual_cols: weights.ncols(),
            });
        }
        self.weights = weights;
        Ok(())
    }

    pub fn weight(&self, row: usize, col: usize) -> Option<f64> {
        self.weights.get((row, col)).copied()
    }

    pub fn set_weight(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        match self.weights.get_mut((row, col)) {
            Some(w) => {
                *w = value;
                Ok(())
            }
            None => Err(GraphError::ShapeMismatch {
                expected_rows: self.weights.nrows(),
                expected_cols: self.weights.ncols(),
                actual_rows: row + 1,
                actual_cols: col + 1,
            }),
        }
    }

    pub fn randomize(&mut self, rng: &mut StdRng) {
        for w in self.weights.iter_mut() {
            *w = rng.gen_range(-1.0..=1.0);
        }
    }

    /// Zero the block and set the main diagonal to a constant.
    pub fn set_diagonal(&mut self, value: f64) {
        self.weights.fill(0.0);
        for i in 0..self.weights.nrows().min(self.weights.ncols()) {
            self.weights[(i, i)] = value;
        }
    }

    /// Forward contribution for the given source activations. Shape-checked:
    /// a source layer of the wrong size is a hard error.
    pub fn forward(&self, source_activations: &Array1<f64>) -> Result<Array1<f64>> {
        if source_activations.len() != self.weights.ncols() {
            return Err(GraphError::ShapeMismatch {
                expected_rows: self.weights.nrows(),
                expected_cols: self.weights.ncols(),
                actual_rows: 1,
                actual_cols: source_activations.len(),
            });
        }
        Ok(self.weights.dot(source_activations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_array_length_checked_writes() {
        let mut array = NeuronArray::new(ArrayId(0), 3);
        assert!(array.set_activations(&[1.0, 2.0, 3.0]).is_ok());
        assert!(matches!(
            array.set_activations(&[1.0, 2.0]),
            Err(GraphError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_matrix_forward_diagonal_passthrough() {
        let matrix = WeightMatrix::new(MatrixId(0), ArrayId(0), ArrayId(1), 3, 3);
        let out = matrix
            .forward(&Array1::from_vec(vec![1.0, 2.0, 3.0]))
            .unwrap();
        assert_eq!(out, Array1::from_vec(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_matrix_forward_shape_mismatch_is_hard_error() {
        let matrix = WeightMatrix::new(MatrixId(0), ArrayId(0), ArrayId(1), 2, 3);
        assert!(matrix.forward(&Array1::zeros(4)).is_err());
    }

    #[test]
    fn test_matrix_set_weights_rejects_reshape() {
        let mut matrix = WeightMatrix::new(MatrixId(0), ArrayId(0), ArrayId(1), 2, 3);
        assert!(matrix.set_weights(Array2::zeros((3, 2))).is_err());
        assert!(matrix.set_weights(Array2::zeros((2, 3))).is_ok());
    }

    #[test]
    fn test_array_rule_application_clears_inputs() {
        let mut array = NeuronArray::new(ArrayId(0), 2);
        let mut rng = StdRng::seed_from_u64(0);
        array
            .add_inputs(&Array1::from_vec(vec![0.5, -0.5]))
            .unwrap();
        array.apply_rule(0.0, 1.0, &mut rng);
        assert_eq!(array.activations(), &Array1::from_vec(vec![0.5, -0.5]));
        assert_eq!(array.inputs(), &Array1::zeros(2));
    }
}
