// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Coupling Boundary
//!
//! A coupling is a one-directional, once-per-step value transfer between a
//! named producer attribute and a named consumer attribute. Values cross
//! the boundary by copy ([`AttributeValue`] owns its data); no shared
//! mutable references leak in or out of the engine.
//!
//! Capability is declared explicitly per attribute with the [`Producible`]
//! and [`Consumable`] traits, so the set of couplable attributes is known
//! at compile time rather than discovered by scanning.

use tracing::trace;

use neuromesh_graph::{ArrayId, GraphError, GroupId, NetworkGraph, NeuronId, SynapseId};

use crate::error::Result;

/// The value carried across the coupling boundary. Copy-by-value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl AttributeValue {
    /// The scalar view of this value; a vector collapses to its sum, the
    /// same way several scalar inputs into one accumulator would.
    pub fn as_scalar(&self) -> f64 {
        match self {
            AttributeValue::Scalar(v) => *v,
            AttributeValue::Vector(v) => v.iter().sum(),
        }
    }

    pub fn as_vector(&self) -> Vec<f64> {
        match self {
            AttributeValue::Scalar(v) => vec![*v],
            AttributeValue::Vector(v) => v.clone(),
        }
    }
}

/// A readable attribute on some graph element.
pub trait Producible: Send {
    fn description(&self) -> String;
    fn produce(&self, graph: &NetworkGraph) -> std::result::Result<AttributeValue, GraphError>;
}

/// A writable attribute on some graph element.
pub trait Consumable: Send {
    fn description(&self) -> String;
    fn consume(
        &self,
        graph: &mut NetworkGraph,
        value: AttributeValue,
    ) -> std::result::Result<(), GraphError>;
}

// ---------------------------------------------------------------------
// Built-in producers
// ---------------------------------------------------------------------

/// Reads a neuron's activation.
pub struct ActivationProducer(pub NeuronId);

impl Producible for ActivationProducer {
    fn description(&self) -> String {
        format!("{}:activation", self.0)
    }

    fn produce(&self, graph: &NetworkGraph) -> std::result::Result<AttributeValue, GraphError> {
        Ok(AttributeValue::Scalar(graph.neuron(self.0)?.activation()))
    }
}

/// Reads a group's activations as a vector, in member order.
pub struct GroupActivationsProducer(pub GroupId);

impl Producible for GroupActivationsProducer {
    fn description(&self) -> String {
        format!("{}:activations", self.0)
    }

    fn produce(&self, graph: &NetworkGraph) -> std::result::Result<AttributeValue, GraphError> {
        let members = graph.group(self.0)?.neurons().to_vec();
        let mut values = Vec::with_capacity(members.len());
        for member in members {
            values.push(graph.neuron(member)?.activation());
        }
        Ok(AttributeValue::Vector(values))
    }
}

/// Reads a neuron array's activations.
pub struct ArrayActivationsProducer(pub ArrayId);

impl Producible for ArrayActivationsProducer {
    fn description(&self) -> String {
        format!("{}:activations", self.0)
    }

    fn produce(&self, graph: &NetworkGraph) -> std::result::Result<AttributeValue, GraphError> {
        Ok(AttributeValue::Vector(
            graph.array(self.0)?.activations().to_vec(),
        ))
    }
}

/// Reads a synapse's strength.
pub struct StrengthProducer(pub SynapseId);

impl Producible for StrengthProducer {
    fn description(&self) -> String {
        format!("{}:strength", self.0)
    }

    fn produce(&self, graph: &NetworkGraph) -> std::result::Result<AttributeValue, GraphError> {
        Ok(AttributeValue::Scalar(graph.synapse(self.0)?.strength()))
    }
}

// ---------------------------------------------------------------------
// Built-in consumers
// ---------------------------------------------------------------------

/// Adds to a neuron's input accumulator (the usual write for unclamped
/// neurons: contributions from several couplings sum).
pub struct InputConsumer(pub NeuronId);

impl Consumable for InputConsumer {
    fn description(&self) -> String {
        format!("{}:add-input", self.0)
    }

    fn consume(
        &self,
        graph: &mut NetworkGraph,
        value: AttributeValue,
    ) -> std::result::Result<(), GraphError> {
        graph.neuron_mut(self.0)?.add_input_value(value.as_scalar());
        Ok(())
    }
}

/// Force-sets a neuron's activation (the write for clamped neurons).
pub struct ActivationConsumer(pub NeuronId);

impl Consumable for ActivationConsumer {
    fn description(&self) -> String {
        format!("{}:set-activation", self.0)
    }

    fn consume(
        &self,
        graph: &mut NetworkGraph,
        value: AttributeValue,
    ) -> std::result::Result<(), GraphError> {
        graph.neuron_mut(self.0)?.set_activation(value.as_scalar());
        Ok(())
    }
}

/// Adds a vector to a neuron array's input buffer. Length-checked.
pub struct ArrayInputConsumer(pub ArrayId);

impl Consumable for ArrayInputConsumer {
    fn description(&self) -> String {
        format!("{}:add-inputs", self.0)
    }

    fn consume(
        &self,
        graph: &mut NetworkGraph,
        value: AttributeValue,
    ) -> std::result::Result<(), GraphError> {
        let values = ndarray::Array1::from_vec(value.as_vector());
        graph.array_mut(self.0)?.add_inputs(&values)
    }
}

/// Force-sets a synapse's strength.
pub struct StrengthConsumer(pub SynapseId);

impl Consumable for StrengthConsumer {
    fn description(&self) -> String {
        format!("{}:set-strength", self.0)
    }

    fn consume(
        &self,
        graph: &mut NetworkGraph,
        value: AttributeValue,
    ) -> std::result::Result<(), GraphError> {
        graph
            .synapse_mut(self.0)?
            .force_set_strength(value.as_scalar());
        Ok(())
    }
}

// ---------------------------------------------------------------------
// Couplings
// ---------------------------------------------------------------------

/// One producer-to-consumer transfer.
pub struct Coupling {
    producer: Box<dyn Producible>,
    consumer: Box<dyn Consumable>,
}

impl Coupling {
    pub fn new(
        producer: impl Producible + 'static,
        consumer: impl Consumable + 'static,
    ) -> Self {
        Self {
            producer: Box::new(producer),
            consumer: Box::new(consumer),
        }
    }

    pub fn description(&self) -> String {
        format!(
            "{} -> {}",
            self.producer.description(),
            self.consumer.description()
        )
    }

    pub fn apply(&self, graph: &mut NetworkGraph) -> std::result::Result<(), GraphError> {
        let value = self.producer.produce(graph)?;
        trace!(coupling = %self.description(), ?value, "coupling transfer");
        self.consumer.consume(graph, value)
    }
}

/// The registered couplings, applied in registration order at most once per
/// simulation step (via the `ApplyCouplings` update action).
#[derive(Default)]
pub struct CouplingSet {
    couplings: Vec<Coupling>,
}

impl CouplingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, coupling: Coupling) {
        self.couplings.push(coupling);
    }

    pub fn couple(
        &mut self,
        producer: impl Producible + 'static,
        consumer: impl Consumable + 'static,
    ) {
        self.add(Coupling::new(producer, consumer));
    }

    pub fn len(&self) -> usize {
        self.couplings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couplings.is_empty()
    }

    pub fn apply_all(&self, graph: &mut NetworkGraph) -> Result<()> {
        for coupling in &self.couplings {
            coupling.apply(graph)?;
        }
        Ok(())
    }
}
