// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Cooperative run loop.
//!
//! A single logical thread drives the simulation. Any running loop exposes
//! a stop flag checked once per iteration; stopping never rolls back
//! partially applied state. When the loop runs in a dedicated thread the
//! network lock is released between steps, which is the window where
//! couplings' consumers and UI readers are allowed to touch the graph.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::Result;
use crate::network::Network;

/// Shared stop flag for a run or training loop. Clone it and hand the clone
/// to whoever needs to stop the loop.
#[derive(Debug, Clone)]
pub struct RunHandle {
    running: Arc<AtomicBool>,
}

impl RunHandle {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Request a stop. The loop finishes its current iteration and exits;
    /// nothing is rolled back.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Re-arm a stopped handle for another run.
    pub fn restart(&self) {
        self.running.store(true, Ordering::Release);
    }
}

impl Default for RunHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Step repeatedly until the handle is stopped or `max_iterations` is
    /// reached. Returns the number of completed steps.
    pub fn run(&mut self, max_iterations: Option<u64>, handle: &RunHandle) -> Result<u64> {
        let mut completed = 0;
        while handle.is_running() {
            if let Some(max) = max_iterations {
                if completed >= max {
                    break;
                }
            }
            self.step()?;
            completed += 1;
        }
        debug!(completed, "run loop finished");
        Ok(completed)
    }
}

/// Drive a shared network from a dedicated thread. The lock is taken per
/// step and released between steps, so external components get a consistent
/// read/write window each iteration.
pub fn spawn_run(
    network: Arc<Mutex<Network>>,
    handle: RunHandle,
    max_iterations: Option<u64>,
) -> thread::JoinHandle<Result<u64>> {
    thread::spawn(move || {
        info!("simulation thread started");
        let mut completed = 0;
        while handle.is_running() {
            if let Some(max) = max_iterations {
                if completed >= max {
                    break;
                }
            }
            {
                let mut network = network.lock();
                network.step()?;
            }
            completed += 1;
        }
        info!(completed, "simulation thread stopped");
        Ok(completed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_bounded_by_iterations() {
        let mut network = Network::new();
        let handle = RunHandle::new();
        let completed = network.run(Some(5), &handle).unwrap();
        assert_eq!(completed, 5);
        assert_eq!(network.iterations(), 5);
        // The handle was never stopped; a second run continues.
        let completed = network.run(Some(2), &handle).unwrap();
        assert_eq!(completed, 2);
    }

    #[test]
    fn test_stopped_handle_runs_nothing() {
        let mut network = Network::new();
        let handle = RunHandle::new();
        handle.stop();
        let completed = network.run(Some(100), &handle).unwrap();
        assert_eq!(completed, 0);
        handle.restart();
        assert_eq!(network.run(Some(1), &handle).unwrap(), 1);
    }

    #[test]
    fn test_threaded_run_can_be_stopped_externally() {
        let network = Arc::new(Mutex::new(Network::new()));
        let handle = RunHandle::new();
        let join = spawn_run(network.clone(), handle.clone(), None);

        // Reader thread sees the network between steps.
        while network.lock().iterations() < 10 {
            thread::yield_now();
        }
        handle.stop();
        let completed = join.join().expect("thread panicked").unwrap();
        assert!(completed >= 10);
    }
}
