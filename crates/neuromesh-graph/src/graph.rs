// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The arena holding every graph element.
//!
//! All tables are keyed by stable integer ids; insertion order is kept in
//! side lists because iteration order is significant under immediate-mode
//! update. Ids are never reused within one graph's lifetime.

use ahash::AHashMap;
use tracing::debug;

use neuromesh_neural::rules::UpdateRule;
use neuromesh_neural::types::{ArrayId, GroupId, MatrixId, NeuronId, SynapseId};

use crate::error::{GraphError, Result};
use crate::group::{Layout, NeuronCollection, NeuronGroup, SynapseGroup};
use crate::matrix::{NeuronArray, WeightMatrix};
use crate::neuron::Neuron;
use crate::synapse::Synapse;

/// The mutable graph of neurons and synapses plus their aggregations and
/// matrix duals. Exclusively owned and mutated by the network that drives
/// it; external components read attributes between steps.
#[derive(Debug, Default)]
pub struct NetworkGraph {
    neurons: AHashMap<NeuronId, Neuron>,
    synapses: AHashMap<SynapseId, Synapse>,
    groups: AHashMap<GroupId, NeuronGroup>,
    collections: AHashMap<GroupId, NeuronCollection>,
    synapse_groups: AHashMap<GroupId, SynapseGroup>,
    arrays: AHashMap<ArrayId, NeuronArray>,
    matrices: AHashMap<MatrixId, WeightMatrix>,

    neuron_order: Vec<NeuronId>,
    synapse_order: Vec<SynapseId>,
    array_order: Vec<ArrayId>,
    matrix_order: Vec<MatrixId>,

    next_neuron: u32,
    next_synapse: u32,
    next_group: u32,
    next_array: u32,
    next_matrix: u32,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Neurons
    // ------------------------------------------------------------------

    pub fn add_neuron(&mut self, rule: UpdateRule) -> NeuronId {
        let id = NeuronId(self.next_neuron);
        self.next_neuron += 1;
        self.neurons.insert(id, Neuron::new(id, rule));
        self.neuron_order.push(id);
        id
    }

    pub fn add_neuron_at(&mut self, rule: UpdateRule, x: f64, y: f64) -> NeuronId {
        let id = self.add_neuron(rule);
        let neuron = self.neurons.get_mut(&id).unwrap_or_else(|| unreachable!());
        neuron.set_position(x, y);
        id
    }

    pub fn neuron(&self, id: NeuronId) -> Result<&Neuron> {
        self.neurons.get(&id).ok_or(GraphError::NeuronNotFound(id))
    }

    pub fn neuron_mut(&mut self, id: NeuronId) -> Result<&mut Neuron> {
        self.neurons
            .get_mut(&id)
            .ok_or(GraphError::NeuronNotFound(id))
    }

    pub fn has_neuron(&self, id: NeuronId) -> bool {
        self.neurons.contains_key(&id)
    }

    /// Neuron ids in insertion order. This is the iteration order of
    /// immediate-mode update, so it is part of the engine's contract.
    pub fn neuron_ids(&self) -> &[NeuronId] {
        &self.neuron_order
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neuron_order.iter().filter_map(|id| self.neurons.get(id))
    }

    pub fn neuron_by_label(&self, label: &str) -> Option<&Neuron> {
        self.neurons().find(|n| n.label.eq_ignore_ascii_case(label))
    }

    /// Delete a neuron. Cascades: every incident synapse goes in the same
    /// logical operation, membership indices are purged, and aggregations
    /// emptied by the removal are deleted too.
    pub fn delete_neuron(&mut self, id: NeuronId) -> Result<()> {
        let neuron = self.neurons.get(&id).ok_or(GraphError::NeuronNotFound(id))?;
        let mut incident: Vec<SynapseId> = neuron.fan_in().to_vec();
        incident.extend(neuron.fan_out().values().copied());
        incident.sort_unstable();
        incident.dedup();
        for synapse in incident {
            // Self-connections appear in both lists; the second delete is a
            // no-op.
            let _ = self.delete_synapse(synapse);
        }

        self.neurons.remove(&id);
        self.neuron_order.retain(|&n| n != id);

        let mut emptied_groups = Vec::new();
        for group in self.groups.values_mut() {
            group.neurons.retain(|&n| n != id);
            if group.is_empty() {
                emptied_groups.push(group.id());
            }
        }
        for group in emptied_groups {
            self.remove_group_record(group);
        }

        let mut emptied_collections = Vec::new();
        for collection in self.collections.values_mut() {
            collection.neurons.retain(|&n| n != id);
            if collection.is_empty() {
                emptied_collections.push(collection.id());
            }
        }
        for collection in emptied_collections {
            self.collections.remove(&collection);
        }

        debug!(neuron = %id, "deleted neuron and incident synapses");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Synapses
    // ------------------------------------------------------------------

    /// Insert a synapse from `source` to `target`. At most one synapse may
    /// exist per ordered pair: a duplicate insertion is a silent no-op that
    /// returns the existing id and leaves fan-in/fan-out untouched.
    pub fn add_synapse(&mut self, source: NeuronId, target: NeuronId) -> Result<SynapseId> {
        if !self.neurons.contains_key(&target) {
            return Err(GraphError::NeuronNotFound(target));
        }
        let source_neuron = self
            .neurons
            .get(&source)
            .ok_or(GraphError::NeuronNotFound(source))?;
        if let Some(existing) = source_neuron.fan_out_to(target) {
            return Ok(existing);
        }

        let id = SynapseId(self.next_synapse);
        self.next_synapse += 1;
        self.synapses.insert(id, Synapse::new(id, source, target));
        self.synapse_order.push(id);

        let source_neuron = self.neurons.get_mut(&source).unwrap_or_else(|| unreachable!());
        source_neuron.add_to_fan_out(target, id);
        let target_neuron = self.neurons.get_mut(&target).unwrap_or_else(|| unreachable!());
        target_neuron.add_to_fan_in(id);
        Ok(id)
    }

    /// The synapse connecting two neurons, if any.
    pub fn synapse_between(&self, source: NeuronId, target: NeuronId) -> Option<SynapseId> {
        self.neurons.get(&source)?.fan_out_to(target)
    }

    pub fn synapse(&self, id: SynapseId) -> Result<&Synapse> {
        self.synapses
            .get(&id)
            .ok_or(GraphError::SynapseNotFound(id))
    }

    pub fn synapse_mut(&mut self, id: SynapseId) -> Result<&mut Synapse> {
        self.synapses
            .get_mut(&id)
            .ok_or(GraphError::SynapseNotFound(id))
    }

    pub fn synapse_ids(&self) -> &[SynapseId] {
        &self.synapse_order
    }

    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    pub fn synapses(&self) -> impl Iterator<Item = &Synapse> {
        self.synapse_order
            .iter()
            .filter_map(|id| self.synapses.get(id))
    }

    pub fn delete_synapse(&mut self, id: SynapseId) -> Result<()> {
        let synapse = self
            .synapses
            .remove(&id)
            .ok_or(GraphError::SynapseNotFound(id))?;
        self.synapse_order.retain(|&s| s != id);

        if let Some(source) = self.neurons.get_mut(&synapse.source()) {
            source.remove_from_fan_out(synapse.target());
        }
        if let Some(target) = self.neurons.get_mut(&synapse.target()) {
            target.remove_from_fan_in(id);
        }
        for group in self.synapse_groups.values_mut() {
            group.synapses.retain(|&s| s != id);
        }
        Ok(())
    }

    /// Derive a synapse's delay from the Euclidean distance between its
    /// endpoints and a maximum propagation speed (distance units per step).
    pub fn set_delay_from_distance(
        &mut self,
        id: SynapseId,
        propagation_speed: f64,
    ) -> Result<()> {
        let (source, target) = {
            let synapse = self.synapse(id)?;
            (synapse.source(), synapse.target())
        };
        let distance = self.neuron(source)?.distance_to(self.neuron(target)?);
        self.synapse_mut(id)?
            .delay_from_distance(distance, propagation_speed);
        Ok(())
    }

    /// Sum of post-synaptic responses over a neuron's fan-in: its weighted
    /// input for the current step.
    pub fn weighted_input(&self, id: NeuronId) -> Result<f64> {
        let neuron = self.neuron(id)?;
        let mut sum = 0.0;
        for synapse_id in neuron.fan_in() {
            if let Some(synapse) = self.synapses.get(synapse_id) {
                sum += synapse.psr();
            }
        }
        Ok(sum)
    }

    // ------------------------------------------------------------------
    // Groups, collections, synapse groups
    // ------------------------------------------------------------------

    fn next_group_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        id
    }

    /// Group existing neurons. All members must exist.
    pub fn add_group(&mut self, members: Vec<NeuronId>) -> Result<GroupId> {
        for &member in &members {
            if !self.neurons.contains_key(&member) {
                return Err(GraphError::NeuronNotFound(member));
            }
        }
        let id = self.next_group_id();
        self.groups.insert(id, NeuronGroup::new(id, members));
        Ok(id)
    }

    /// Create `count` neurons sharing a rule and gather them into a group
    /// with the given layout.
    pub fn create_group(&mut self, count: usize, rule: UpdateRule, layout: Layout) -> GroupId {
        let members: Vec<NeuronId> = (0..count).map(|_| self.add_neuron(rule)).collect();
        let id = self.next_group_id();
        let mut group = NeuronGroup::new(id, members);
        group.layout = layout;
        self.groups.insert(id, group);
        self.apply_group_layout(id, 0.0, 0.0)
            .unwrap_or_else(|_| unreachable!());
        id
    }

    pub fn group(&self, id: GroupId) -> Result<&NeuronGroup> {
        self.groups.get(&id).ok_or(GraphError::GroupNotFound(id))
    }

    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut NeuronGroup> {
        self.groups
            .get_mut(&id)
            .ok_or(GraphError::GroupNotFound(id))
    }

    pub fn groups(&self) -> impl Iterator<Item = &NeuronGroup> {
        self.groups.values()
    }

    pub fn has_group(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Delete a group and, because groups own their members for deletion
    /// purposes, every member neuron (and therefore every incident synapse).
    pub fn delete_group(&mut self, id: GroupId) -> Result<()> {
        let members = self.group(id)?.neurons().to_vec();
        for member in members {
            // Deleting the last member removes the group record itself.
            let _ = self.delete_neuron(member);
        }
        self.remove_group_record(id);
        Ok(())
    }

    /// Drop a group record and any synapse group attached to it. Does not
    /// touch member neurons; cascade entry points handle those.
    fn remove_group_record(&mut self, id: GroupId) {
        self.groups.remove(&id);
        let attached: Vec<GroupId> = self
            .synapse_groups
            .values()
            .filter(|sg| sg.source_group == id || sg.target_group == id)
            .map(|sg| sg.id())
            .collect();
        for synapse_group in attached {
            let _ = self.delete_synapse_group(synapse_group);
        }
    }

    /// Position a group's members per its layout, relative to an origin.
    pub fn apply_group_layout(&mut self, id: GroupId, origin_x: f64, origin_y: f64) -> Result<()> {
        let group = self.group(id)?;
        let layout = group.layout;
        let members = group.neurons().to_vec();
        for (index, member) in members.into_iter().enumerate() {
            let (dx, dy) = layout.position(index);
            if let Ok(neuron) = self.neuron_mut(member) {
                neuron.set_position(origin_x + dx, origin_y + dy);
            }
        }
        Ok(())
    }

    pub fn add_collection(&mut self, members: Vec<NeuronId>) -> Result<GroupId> {
        for &member in &members {
            if !self.neurons.contains_key(&member) {
                return Err(GraphError::NeuronNotFound(member));
            }
        }
        let id = self.next_group_id();
        self.collections.insert(id, NeuronCollection::new(id, members));
        Ok(id)
    }

    pub fn collection(&self, id: GroupId) -> Result<&NeuronCollection> {
        self.collections
            .get(&id)
            .ok_or(GraphError::GroupNotFound(id))
    }

    pub fn collections(&self) -> impl Iterator<Item = &NeuronCollection> {
        self.collections.values()
    }

    /// Delete a collection. Members are left alone: collections do not own
    /// their neurons.
    pub fn delete_collection(&mut self, id: GroupId) -> Result<()> {
        self.collections
            .remove(&id)
            .map(|_| ())
            .ok_or(GraphError::GroupNotFound(id))
    }

    pub fn add_synapse_group(
        &mut self,
        source_group: GroupId,
        target_group: GroupId,
        synapses: Vec<SynapseId>,
        strategy_name: impl Into<String>,
    ) -> Result<GroupId> {
        if !self.groups.contains_key(&source_group) {
            return Err(GraphError::GroupNotFound(source_group));
        }
        if !self.groups.contains_key(&target_group) {
            return Err(GraphError::GroupNotFound(target_group));
        }
        let id = self.next_group_id();
        self.synapse_groups.insert(
            id,
            SynapseGroup::new(id, source_group, target_group, synapses, strategy_name),
        );
        Ok(id)
    }

    pub fn synapse_group(&self, id: GroupId) -> Result<&SynapseGroup> {
        self.synapse_groups
            .get(&id)
            .ok_or(GraphError::GroupNotFound(id))
    }

    pub fn synapse_groups(&self) -> impl Iterator<Item = &SynapseGroup> {
        self.synapse_groups.values()
    }

    /// Delete a synapse group along with its member synapses.
    pub fn delete_synapse_group(&mut self, id: GroupId) -> Result<()> {
        let group = self
            .synapse_groups
            .remove(&id)
            .ok_or(GraphError::GroupNotFound(id))?;
        for synapse in group.synapses() {
            let _ = self.delete_synapse(*synapse);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Matrix representation
    // ------------------------------------------------------------------

    pub fn add_array(&mut self, size: usize) -> ArrayId {
        let id = ArrayId(self.next_array);
        self.next_array += 1;
        self.arrays.insert(id, NeuronArray::new(id, size));
        self.array_order.push(id);
        id
    }

    pub fn array(&self, id: ArrayId) -> Result<&NeuronArray> {
        self.arrays.get(&id).ok_or(GraphError::ArrayNotFound(id))
    }

    pub fn array_mut(&mut self, id: ArrayId) -> Result<&mut NeuronArray> {
        self.arrays
            .get_mut(&id)
            .ok_or(GraphError::ArrayNotFound(id))
    }

    pub fn array_ids(&self) -> &[ArrayId] {
        &self.array_order
    }

    pub fn arrays(&self) -> impl Iterator<Item = &NeuronArray> {
        self.array_order.iter().filter_map(|id| self.arrays.get(id))
    }

    /// Delete an array. Matrices connected to it go with it.
    pub fn delete_array(&mut self, id: ArrayId) -> Result<()> {
        self.arrays.remove(&id).ok_or(GraphError::ArrayNotFound(id))?;
        self.array_order.retain(|&a| a != id);
        let attached: Vec<MatrixId> = self
            .matrices
            .values()
            .filter(|m| m.source() == id || m.target() == id)
            .map(|m| m.id())
            .collect();
        for matrix in attached {
            self.matrices.remove(&matrix);
            self.matrix_order.retain(|&m| m != matrix);
        }
        Ok(())
    }

    /// Connect two arrays with a weight matrix shaped (|target|, |source|).
    pub fn add_matrix(&mut self, source: ArrayId, target: ArrayId) -> Result<MatrixId> {
        let cols = self.array(source)?.len();
        let rows = self.array(target)?.len();
        let id = MatrixId(self.next_matrix);
        self.next_matrix += 1;
        self.matrices
            .insert(id, WeightMatrix::new(id, source, target, rows, cols));
        self.matrix_order.push(id);
        Ok(id)
    }

    pub fn matrix(&self, id: MatrixId) -> Result<&WeightMatrix> {
        self.matrices.get(&id).ok_or(GraphError::MatrixNotFound(id))
    }

    pub fn matrix_mut(&mut self, id: MatrixId) -> Result<&mut WeightMatrix> {
        self.matrices
            .get_mut(&id)
            .ok_or(GraphError::MatrixNotFound(id))
    }

    pub fn matrix_ids(&self) -> &[MatrixId] {
        &self.matrix_order
    }

    pub fn matrices(&self) -> impl Iterator<Item = &WeightMatrix> {
        self.matrix_order
            .iter()
            .filter_map(|id| self.matrices.get(id))
    }

    /// Forward-propagate one matrix: the target array's input buffer gains
    /// `W · source activations`. Shape disagreement with either endpoint is
    /// a hard error.
    pub fn propagate_matrix(&mut self, id: MatrixId) -> Result<()> {
        let matrix = self.matrix(id)?;
        let source = matrix.source();
        let target = matrix.target();
        let contribution = matrix.forward(self.array(source)?.activations())?;
        self.array_mut(target)?.add_inputs(&contribution)
    }

    pub fn propagate_all_matrices(&mut self) -> Result<()> {
        for id in self.matrix_order.clone() {
            self.propagate_matrix(id)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Whole-graph operations
    // ------------------------------------------------------------------

    /// Translate all neurons (the only elements with position information).
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for neuron in self.neurons.values_mut() {
            neuron.offset(dx, dy);
        }
    }

    /// Zero all neuron activations and pending inputs.
    pub fn clear_activations(&mut self) {
        for neuron in self.neurons.values_mut() {
            neuron.set_activation(0.0);
            neuron.clear_input();
        }
        for array in self.arrays.values_mut() {
            array.clear();
        }
    }

    /// Rebuild the fan-in/fan-out indices from the synapse table. Called
    /// after deserialization, where the indices are not persisted.
    pub fn rebuild_indices(&mut self) {
        for neuron in self.neurons.values_mut() {
            neuron.clear_indices();
        }
        let edges: Vec<(SynapseId, NeuronId, NeuronId)> = self
            .synapse_order
            .iter()
            .filter_map(|id| self.synapses.get(id))
            .map(|s| (s.id(), s.source(), s.target()))
            .collect();
        for (id, source, target) in edges {
            if let Some(neuron) = self.neurons.get_mut(&source) {
                neuron.add_to_fan_out(target, id);
            }
            if let Some(neuron) = self.neurons.get_mut(&target) {
                neuron.add_to_fan_in(id);
            }
        }
    }

    /// Reassemble a graph from persisted tables. Element order in the input
    /// vectors is the insertion (and therefore update) order. Indices and id
    /// counters are derived; transient synapse state is reset.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        neurons: Vec<Neuron>,
        synapses: Vec<Synapse>,
        groups: Vec<NeuronGroup>,
        collections: Vec<NeuronCollection>,
        synapse_groups: Vec<SynapseGroup>,
        arrays: Vec<NeuronArray>,
        matrices: Vec<WeightMatrix>,
    ) -> Result<Self> {
        let mut graph = Self::default();
        for neuron in neurons {
            graph.next_neuron = graph.next_neuron.max(neuron.id().0 + 1);
            graph.neuron_order.push(neuron.id());
            graph.neurons.insert(neuron.id(), neuron);
        }
        for mut synapse in synapses {
            if !graph.neurons.contains_key(&synapse.source()) {
                return Err(GraphError::NeuronNotFound(synapse.source()));
            }
            if !graph.neurons.contains_key(&synapse.target()) {
                return Err(GraphError::NeuronNotFound(synapse.target()));
            }
            synapse.reset_transient();
            graph.next_synapse = graph.next_synapse.max(synapse.id().0 + 1);
            graph.synapse_order.push(synapse.id());
            graph.synapses.insert(synapse.id(), synapse);
        }
        for group in groups {
            graph.next_group = graph.next_group.max(group.id().0 + 1);
            graph.groups.insert(group.id(), group);
        }
        for collection in collections {
            graph.next_group = graph.next_group.max(collection.id().0 + 1);
            graph.collections.insert(collection.id(), collection);
        }
        for synapse_group in synapse_groups {
            graph.next_group = graph.next_group.max(synapse_group.id().0 + 1);
            graph.synapse_groups.insert(synapse_group.id(), synapse_group);
        }
        for array in arrays {
            graph.next_array = graph.next_array.max(array.id().0 + 1);
            graph.array_order.push(array.id());
            graph.arrays.insert(array.id(), array);
        }
        for matrix in matrices {
            graph.next_matrix = graph.next_matrix.max(matrix.id().0 + 1);
            graph.matrix_order.push(matrix.id());
            graph.matrices.insert(matrix.id(), matrix);
        }
        graph.rebuild_indices();
        Ok(graph)
    }
}
