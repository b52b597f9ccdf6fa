//! Common test utilities for integration tests
//!
//! This module provides:
//! - Scripted memory collaborators (fixed, failing, malformed, counting)
//! - A tracking scenario generator with a persistent disturbance
//! - The test harness and tolerance assertions

#![allow(dead_code)]

pub mod harness;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use cerebellum_core::{Context, EpisodicMemory, MemoryError, MemoryHandle, MemoryRecord};

use harness::TestRng;

/// Memory that always returns the same record
pub fn fixed_memory(bias: Vec<f64>, confidence: Option<f64>) -> MemoryHandle {
    Arc::new(move |_: &[f64], _: &Context| {
        Ok::<_, MemoryError>(vec![MemoryRecord {
            bias: bias.clone(),
            confidence,
        }])
    })
}

/// Memory that always fails
pub fn failing_memory(error: MemoryError) -> MemoryHandle {
    Arc::new(move |_: &[f64], _: &Context| Err::<Vec<MemoryRecord>, _>(error))
}

/// Memory that never remembers anything
pub fn empty_memory() -> MemoryHandle {
    Arc::new(|_: &[f64], _: &Context| Ok::<_, MemoryError>(Vec::new()))
}

/// Memory that records every query it receives
#[derive(Default)]
pub struct CountingMemory {
    calls: AtomicUsize,
    last_state: Mutex<Option<Vec<f64>>>,
    last_context: Mutex<Option<Context>>,
    reply: Mutex<Vec<MemoryRecord>>,
}

impl CountingMemory {
    pub fn replying(records: Vec<MemoryRecord>) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(records),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_state(&self) -> Option<Vec<f64>> {
        self.last_state.lock().unwrap().clone()
    }

    pub fn last_context(&self) -> Option<Context> {
        self.last_context.lock().unwrap().clone()
    }
}

impl EpisodicMemory for CountingMemory {
    fn retrieve(&self, state: &[f64], context: &Context) -> Result<Vec<MemoryRecord>, MemoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_state.lock().unwrap() = Some(state.to_vec());
        *self.last_context.lock().unwrap() = Some(context.clone());
        Ok(self.reply.lock().unwrap().clone())
    }
}

/// Plant that drifts by a constant disturbance each step
///
/// `state += command + disturbance + noise`, tracking a fixed target.
pub struct DisturbedPlant {
    pub state: Vec<f64>,
    pub target: Vec<f64>,
    pub disturbance: Vec<f64>,
    noise: f64,
    rng: TestRng,
}

impl DisturbedPlant {
    pub fn new(target: Vec<f64>, disturbance: Vec<f64>, noise: f64, seed: u32) -> Self {
        Self {
            state: target.clone(),
            target,
            disturbance,
            noise,
            rng: TestRng::new(seed),
        }
    }

    /// Apply a command and return the new state
    pub fn step(&mut self, command: &[f64]) -> &[f64] {
        for i in 0..self.state.len() {
            let noise = self.rng.gen_range(-self.noise, self.noise);
            // The correction opposes the error, so it is applied against it
            self.state[i] -= command[i];
            self.state[i] += self.disturbance[i] + noise;
        }
        &self.state
    }

    pub fn error_norm(&self) -> f64 {
        self.state
            .iter()
            .zip(&self.target)
            .map(|(s, t)| (t - s) * (t - s))
            .sum::<f64>()
            .sqrt()
    }
}
