// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The network aggregate root.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, trace};

use neuromesh_graph::{GroupId, NetworkGraph, NeuronId, SynapseId};
use neuromesh_neural::rules::{RuleContext, TimeType};

use crate::coupling::CouplingSet;
use crate::error::{NetworkError, Result};
use crate::update::{UpdateAction, UpdateDiscipline, UpdateManager};

const DEFAULT_TIME_STEP: f64 = 1.0;

/// A deletion requested while a step is in progress; applied when the step
/// completes.
#[derive(Debug, Clone, Copy)]
enum DeferredDeletion {
    Neuron(NeuronId),
    Synapse(SynapseId),
    Group(GroupId),
}

/// The simulation's aggregate root: the graph, the clock, the ordered
/// update actions, couplings, and the simulation-owned generator.
///
/// The graph is exclusively owned and mutated here. External components
/// (couplings, trainers, UIs) read attributes between steps; deletions
/// requested mid-step are deferred until the step completes.
pub struct Network {
    pub graph: NetworkGraph,
    pub update_manager: UpdateManager,
    pub couplings: CouplingSet,

    time: f64,
    time_step: f64,
    iterations: u64,

    rng: StdRng,
    rng_seed: u64,

    in_step: bool,
    deferred: Vec<DeferredDeletion>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// A network with the default (buffered) whole-graph update action and a
    /// fixed seed: two fresh networks evolve identically.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut update_manager = UpdateManager::new();
        update_manager.add_action(UpdateAction::Buffered);
        Self {
            graph: NetworkGraph::new(),
            update_manager,
            couplings: CouplingSet::new(),
            time: 0.0,
            time_step: DEFAULT_TIME_STEP,
            iterations: 0,
            rng: StdRng::seed_from_u64(seed),
            rng_seed: seed,
            in_step: false,
            deferred: Vec::new(),
        }
    }

    /// Reassemble a network from persisted parts. The generator is reseeded
    /// from the stored seed.
    pub fn from_parts(
        graph: NetworkGraph,
        time: f64,
        time_step: f64,
        iterations: u64,
        rng_seed: u64,
        actions: Vec<UpdateAction>,
    ) -> Self {
        let mut update_manager = UpdateManager::new();
        for action in actions {
            update_manager.add_action(action);
        }
        Self {
            graph,
            update_manager,
            couplings: CouplingSet::new(),
            time,
            time_step,
            iterations,
            rng: StdRng::seed_from_u64(rng_seed),
            rng_seed,
            in_step: false,
            deferred: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn set_time_step(&mut self, time_step: f64) {
        self.time_step = time_step;
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Discrete unless some neuron runs a continuous-time rule.
    pub fn time_type(&self) -> TimeType {
        if self
            .graph
            .neurons()
            .any(|n| n.time_type() == TimeType::Continuous)
        {
            TimeType::Continuous
        } else {
            TimeType::Discrete
        }
    }

    /// Time with units, for display.
    pub fn time_label(&self) -> String {
        match self.time_type() {
            TimeType::Discrete => format!("{} iterations", self.iterations),
            TimeType::Continuous => format!("{} msec", self.time),
        }
    }

    /// Move the clock. Setting it backwards (a reset) rewinds each spiking
    /// holder's last-spike time so intervals stay consistent; during a step
    /// time only ever advances.
    pub fn set_time(&mut self, new_time: f64) {
        if new_time < self.time {
            let old_time = self.time;
            for id in self.graph.neuron_ids().to_vec() {
                if let Ok(neuron) = self.graph.neuron_mut(id) {
                    if let Some(data) = neuron.rule_state_mut().spiking_data_mut() {
                        data.rewind(old_time, new_time);
                    }
                }
            }
        }
        self.time = new_time;
    }

    pub fn reset_time(&mut self) {
        self.set_time(0.0);
        self.iterations = 0;
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// Advance the simulation by one step: run every registered update
    /// action in order, then advance time.
    ///
    /// The first failing action aborts the remaining actions for this step
    /// and is surfaced (never swallowed); whatever earlier actions already
    /// committed stays committed. Time advances exactly once either way.
    pub fn step(&mut self) -> Result<()> {
        self.in_step = true;
        let mut actions = std::mem::take(&mut self.update_manager.actions);
        let mut failure = None;
        for action in actions.iter_mut() {
            trace!(action = %action.description(), time = self.time, "running update action");
            if let Err(source) = self.run_action(action) {
                error!(action = %action.description(), %source, "update action failed; aborting step");
                failure = Some(NetworkError::ActionFailed {
                    description: action.description(),
                    source: Box::new(source),
                });
                break;
            }
        }
        self.update_manager.actions = actions;
        self.in_step = false;

        self.time += self.time_step;
        self.iterations += 1;
        self.flush_deferred();

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn run_action(&mut self, action: &mut UpdateAction) -> Result<()> {
        match action {
            UpdateAction::Buffered => {
                let ids = self.graph.neuron_ids().to_vec();
                self.buffered_update(&ids)
            }
            UpdateAction::Immediate => {
                let ids = self.graph.neuron_ids().to_vec();
                self.immediate_update(&ids)
            }
            UpdateAction::Priority => {
                let mut ids = self.graph.neuron_ids().to_vec();
                // Stable: ties keep insertion order.
                ids.sort_by_key(|&id| {
                    self.graph
                        .neuron(id)
                        .map(|n| n.update_priority)
                        .unwrap_or_default()
                });
                self.immediate_update(&ids)
            }
            UpdateAction::ConcurrentBuffered => {
                let ids = self.graph.neuron_ids().to_vec();
                self.concurrent_buffered_update(&ids)
            }
            UpdateAction::Group { group, discipline } => {
                let ids = self.graph.group(*group)?.neurons().to_vec();
                match discipline {
                    UpdateDiscipline::Buffered => self.buffered_update(&ids),
                    UpdateDiscipline::Immediate => self.immediate_update(&ids),
                }
            }
            UpdateAction::PropagateMatrices => self.propagate_matrices(),
            UpdateAction::UpdateSynapses => self.update_synapses(),
            UpdateAction::ApplyCouplings => {
                self.couplings.apply_all(&mut self.graph)?;
                Ok(())
            }
            UpdateAction::Custom(custom) => (custom.run)(self),
        }
    }

    /// Snapshot-then-commit update of the given neurons. Phase 1 computes
    /// every afferent synapse's response and every neuron's input from the
    /// pre-pass activations; phase 2 commits all activations together.
    fn buffered_update(&mut self, ids: &[NeuronId]) -> Result<()> {
        for &id in ids {
            let fan_in = self.graph.neuron(id)?.fan_in().to_vec();
            for synapse in fan_in {
                self.update_synapse_psr(synapse)?;
            }
        }
        for &id in ids {
            let input = self.graph.weighted_input(id)?;
            self.graph.neuron_mut(id)?.add_input_value(input);
        }
        for &id in ids {
            self.apply_rule(id)?;
        }
        Ok(())
    }

    /// Sequential update: each neuron's inputs are recomputed immediately
    /// before its rule applies, so later neurons see earlier neurons'
    /// freshly committed values.
    fn immediate_update(&mut self, ids: &[NeuronId]) -> Result<()> {
        for &id in ids {
            let fan_in = self.graph.neuron(id)?.fan_in().to_vec();
            for synapse in fan_in {
                self.update_synapse_psr(synapse)?;
            }
            let input = self.graph.weighted_input(id)?;
            self.graph.neuron_mut(id)?.add_input_value(input);
            self.apply_rule(id)?;
        }
        Ok(())
    }

    /// Buffered update with the snapshot phase partitioned across workers.
    /// Each task reads one target neuron and its afferent synapses, so no
    /// synapse is touched by two tasks; the commit runs sequentially and the
    /// results are identical to [`Self::buffered_update`].
    #[cfg(feature = "parallel")]
    fn concurrent_buffered_update(&mut self, ids: &[NeuronId]) -> Result<()> {
        use neuromesh_graph::{GraphError, SynapsePhase};
        use rayon::prelude::*;

        let dt = self.time_step;
        let graph = &self.graph;
        type NeuronPhase = (NeuronId, f64, Vec<(SynapseId, SynapsePhase)>);
        let phases: Vec<NeuronPhase> = ids
            .par_iter()
            .map(|&id| -> std::result::Result<NeuronPhase, GraphError> {
                let neuron = graph.neuron(id)?;
                let mut synapse_phases = Vec::with_capacity(neuron.fan_in().len());
                let mut input = 0.0;
                for &synapse_id in neuron.fan_in() {
                    let synapse = graph.synapse(synapse_id)?;
                    let source = graph.neuron(synapse.source())?;
                    let phase = synapse.phase(source.activation(), source.spiked(), dt);
                    input += phase.psr;
                    synapse_phases.push((synapse_id, phase));
                }
                Ok((id, input, synapse_phases))
            })
            .collect::<std::result::Result<Vec<_>, GraphError>>()?;

        for (id, input, synapse_phases) in phases {
            for (synapse_id, phase) in synapse_phases {
                self.graph.synapse_mut(synapse_id)?.commit_phase(phase);
            }
            self.graph.neuron_mut(id)?.add_input_value(input);
        }
        for &id in ids {
            self.apply_rule(id)?;
        }
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn concurrent_buffered_update(&mut self, ids: &[NeuronId]) -> Result<()> {
        self.buffered_update(ids)
    }

    fn update_synapse_psr(&mut self, id: SynapseId) -> Result<()> {
        let (source_activation, source_spiked) = {
            let synapse = self.graph.synapse(id)?;
            let source = self.graph.neuron(synapse.source())?;
            (source.activation(), source.spiked())
        };
        let dt = self.time_step;
        self.graph
            .synapse_mut(id)?
            .update_psr(source_activation, source_spiked, dt);
        Ok(())
    }

    /// Apply a neuron's rule to its accumulated input and commit. Clamped
    /// neurons keep their externally set value; their pending input is
    /// discarded the same way a rule application would consume it.
    fn apply_rule(&mut self, id: NeuronId) -> Result<()> {
        let time = self.time;
        let dt = self.time_step;
        let Network { graph, rng, .. } = self;
        let neuron = graph.neuron_mut(id)?;
        neuron.clear_spike();
        if neuron.clamped {
            neuron.clear_input();
            return Ok(());
        }
        let rule = *neuron.update_rule();
        let ctx = RuleContext {
            input: neuron.input(),
            activation: neuron.activation(),
            time,
            dt,
            rng,
        };
        let outcome = rule.apply(ctx, neuron.rule_state_mut());
        neuron.commit(outcome);
        Ok(())
    }

    fn propagate_matrices(&mut self) -> Result<()> {
        self.graph.propagate_all_matrices()?;
        let time = self.time;
        let dt = self.time_step;
        let Network { graph, rng, .. } = self;
        for id in graph.array_ids().to_vec() {
            graph.array_mut(id)?.apply_rule(time, dt, rng);
        }
        Ok(())
    }

    /// One learning pass over all synapses, fed with the activations
    /// committed at the end of the previous phase.
    fn update_synapses(&mut self) -> Result<()> {
        let dt = self.time_step;
        for id in self.graph.synapse_ids().to_vec() {
            let (source, target) = {
                let synapse = self.graph.synapse(id)?;
                (synapse.source(), synapse.target())
            };
            let source_activation = self.graph.neuron(source)?.activation();
            let target_activation = self.graph.neuron(target)?.activation();
            self.graph
                .synapse_mut(id)?
                .apply_learning(source_activation, target_activation, dt);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Deferred deletion
    // ------------------------------------------------------------------

    /// Delete a neuron, or defer to step end if a step is in progress.
    pub fn delete_neuron(&mut self, id: NeuronId) -> Result<()> {
        if self.in_step {
            self.deferred.push(DeferredDeletion::Neuron(id));
            return Ok(());
        }
        self.graph.delete_neuron(id).map_err(Into::into)
    }

    pub fn delete_synapse(&mut self, id: SynapseId) -> Result<()> {
        if self.in_step {
            self.deferred.push(DeferredDeletion::Synapse(id));
            return Ok(());
        }
        self.graph.delete_synapse(id).map_err(Into::into)
    }

    pub fn delete_group(&mut self, id: GroupId) -> Result<()> {
        if self.in_step {
            self.deferred.push(DeferredDeletion::Group(id));
            return Ok(());
        }
        self.graph.delete_group(id).map_err(Into::into)
    }

    fn flush_deferred(&mut self) {
        if self.deferred.is_empty() {
            return;
        }
        let deferred = std::mem::take(&mut self.deferred);
        debug!(count = deferred.len(), "applying deferred deletions");
        for deletion in deferred {
            // Cascades may have removed the element already.
            let _ = match deletion {
                DeferredDeletion::Neuron(id) => self.graph.delete_neuron(id),
                DeferredDeletion::Synapse(id) => self.graph.delete_synapse(id),
                DeferredDeletion::Group(id) => self.graph.delete_group(id),
            };
        }
    }

    // ------------------------------------------------------------------
    // Convenience
    // ------------------------------------------------------------------

    /// Set every neuron activation (and array) to zero.
    pub fn clear_activations(&mut self) {
        self.graph.clear_activations();
    }

    /// Activations of the given neurons, in order.
    pub fn read_activations(&self, neurons: &[NeuronId]) -> Result<Vec<f64>> {
        neurons
            .iter()
            .map(|&id| Ok(self.graph.neuron(id)?.activation()))
            .collect()
    }

    /// Force-set activations on the given neurons, in order. Works on
    /// clamped neurons; this is the trainer/coupling write path.
    pub fn write_activations(&mut self, neurons: &[NeuronId], values: &[f64]) -> Result<()> {
        if neurons.len() != values.len() {
            return Err(NetworkError::RowLengthMismatch {
                expected: neurons.len(),
                actual: values.len(),
            });
        }
        for (&id, &value) in neurons.iter().zip(values) {
            self.graph.neuron_mut(id)?.set_activation(value);
        }
        Ok(())
    }
}
