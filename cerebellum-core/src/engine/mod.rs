//! Correction Engine
//!
//! ## Overview
//!
//! [`CerebellumEngine`] is a stateful step function: one call per control
//! timestep, returning a corrective vector to add to the primary
//! controller's output. Every call runs the same fixed pipeline:
//!
//! ```text
//!  current, target ──→ e = target − current
//!          │
//!          ├─→ history push (error, state)
//!          ├─→ derivative estimation (if v/a not supplied)
//!          ├─→ memory recall ──→ bias b, confidence c
//!          │
//!          ├─→ feedforward   −k_ff·(e + v·h + ½a·h²)
//!          ├─→ trial         −k_tr·(e − b)
//!          ├─→ variance      −k_var·(e − mean(history))
//!          ├─→ memory        −b·k_mem·g(c)·w(ctx)
//!          │
//!          └─→ Σ · w_total ──→ saturate(‖·‖ ≤ max) ──→ correction
//! ```
//!
//! ## State
//!
//! The engine owns bounded rolling state: the last `variance_window` errors
//! and states, and the previous call's state and velocity for differencing.
//! `reset()` clears it; configuration and memory binding survive.
//!
//! ## Concurrency
//!
//! `compute_correction` takes `&mut self`. Each call depends on the rolling
//! state left by the previous one, so one engine serves exactly one state
//! stream. Run one engine per independently controlled stream.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cerebellum_core::{
//!     CerebellumConfig, CerebellumEngine, CorrectionRequest, NearestBiasMemory,
//!     context::context_from,
//! };
//!
//! let memory = Arc::new(NearestBiasMemory::new());
//! memory.store(&[1.0, 0.5, 0.3, 10.0, 5.0], &[0.001, 0.002, 0.0, 0.0, 0.0], 0.9);
//!
//! let mut engine = CerebellumEngine::with_memory(5, CerebellumConfig::default(), memory.clone())?;
//!
//! let current = [1.0005, 0.501, 0.3, 10.0, 5.0];
//! let target = [1.0, 0.5, 0.3, 10.0, 5.0];
//! let ctx = context_from([("tool", "A".into()), ("temperature", 25.0.into())]);
//!
//! let step = engine.compute_correction_detailed(
//!     CorrectionRequest::new(&current, &target).context(&ctx).dt(0.001),
//! )?;
//! assert!(step.recall.is_hit());
//! assert!(!step.saturated);
//! # Ok::<(), cerebellum_core::CerebellumError>(())
//! ```

pub mod derivative;
pub mod terms;

use alloc::vec::Vec;
use core::fmt;

use crate::{
    config::CerebellumConfig,
    constants::{DEFAULT_DT_S, MAX_HISTORY_VALUES},
    context::{self, Context},
    errors::{CerebellumError, CerebellumResult},
    history::HistoryBuffer,
    memory::{self, MemoryHandle, MemoryRecall, RecallSource},
    vector,
};

use derivative::DerivativeEstimator;

/// Inputs for one timestep
///
/// Built from the two mandatory vectors; everything else is optional:
///
/// ```rust
/// use cerebellum_core::CorrectionRequest;
///
/// let current = [0.0; 3];
/// let target = [1.0, 0.0, 0.0];
/// let velocity = [0.1, 0.0, 0.0];
///
/// let request = CorrectionRequest::new(&current, &target)
///     .velocity(&velocity)
///     .dt(0.002);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CorrectionRequest<'a> {
    current_state: &'a [f64],
    target_state: &'a [f64],
    velocity: Option<&'a [f64]>,
    acceleration: Option<&'a [f64]>,
    context: Option<&'a Context>,
    dt: f64,
}

impl<'a> CorrectionRequest<'a> {
    /// Request with no derivatives, no context and a 1 ms timestep
    pub fn new(current_state: &'a [f64], target_state: &'a [f64]) -> Self {
        Self {
            current_state,
            target_state,
            velocity: None,
            acceleration: None,
            context: None,
            dt: DEFAULT_DT_S,
        }
    }

    /// Supply measured velocity instead of differencing states
    pub fn velocity(mut self, velocity: &'a [f64]) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Supply measured acceleration instead of differencing velocities
    pub fn acceleration(mut self, acceleration: &'a [f64]) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Situational context for memory lookup and weighting
    pub fn context(mut self, context: &'a Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Seconds since the previous call
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Check every vector against the engine dimension, before any state changes
    fn validate(&self, dim: usize) -> CerebellumResult<()> {
        let vectors = [
            ("current_state", Some(self.current_state)),
            ("target_state", Some(self.target_state)),
            ("velocity", self.velocity),
            ("acceleration", self.acceleration),
        ];

        for (name, v) in vectors {
            let Some(v) = v else { continue };
            if v.len() != dim {
                return Err(CerebellumError::DimensionMismatch {
                    vector: name,
                    expected: dim,
                    actual: v.len(),
                });
            }
            if !vector::is_finite(v) {
                return Err(CerebellumError::NonFiniteInput { vector: name });
            }
        }

        Ok(())
    }
}

/// Every intermediate of one timestep
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionBreakdown {
    /// Predictive feedforward term
    pub feedforward: Vec<f64>,
    /// Trial-to-trial term
    pub trial: Vec<f64>,
    /// Variance-reduction term
    pub variance: Vec<f64>,
    /// Memory-adaptive term
    pub memory: Vec<f64>,
    /// Weighted sum before saturation
    pub unsaturated: Vec<f64>,
    /// Final output, `‖correction‖ ≤ max_correction_norm`
    pub correction: Vec<f64>,
    /// Whether the saturation limiter rescaled the sum
    pub saturated: bool,
    /// Memory lookup outcome
    pub recall: MemoryRecall,
    /// Confidence-derived gain applied to the memory term
    pub adaptive_gain: f64,
    /// Context weight applied to the memory term
    pub context_weight: f64,
    /// Velocity used (supplied or estimated)
    pub velocity: Vec<f64>,
    /// Acceleration used (supplied or estimated)
    pub acceleration: Vec<f64>,
}

/// Lifetime counters, untouched by `reset()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Successful `compute_correction` calls
    pub steps: u64,
    /// Steps where the output was rescaled
    pub saturated_steps: u64,
    /// Steps where memory contributed a bias
    pub memory_hits: u64,
    /// Steps where memory returned nothing
    pub memory_misses: u64,
    /// Steps where memory failed or replied with garbage
    pub memory_faults: u64,
    /// Steps with no memory bound
    pub memory_unbound: u64,
}

impl EngineStats {
    fn record(&mut self, saturated: bool, source: RecallSource) {
        self.steps += 1;
        if saturated {
            self.saturated_steps += 1;
        }
        match source {
            RecallSource::Hit => self.memory_hits += 1,
            RecallSource::Miss => self.memory_misses += 1,
            RecallSource::Fault | RecallSource::Malformed => self.memory_faults += 1,
            RecallSource::Unbound => self.memory_unbound += 1,
        }
    }

    /// Fraction of steps that hit saturation
    pub fn saturation_rate(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.saturated_steps as f64 / self.steps as f64
        }
    }
}

/// Per-timestep correction engine
pub struct CerebellumEngine {
    /// State dimension D
    memory_dim: usize,
    /// Gains and limits
    config: CerebellumConfig,
    /// Episodic memory collaborator
    memory: Option<MemoryHandle>,
    /// Last `variance_window` tracking errors
    error_history: HistoryBuffer,
    /// Last `variance_window` states (diagnostics only)
    state_history: HistoryBuffer,
    /// Previous state/velocity for differencing
    derivatives: DerivativeEstimator,
    /// Most recent moving-average error
    filtered_error: Option<Vec<f64>>,
    /// Lifetime counters
    stats: EngineStats,
}

impl CerebellumEngine {
    /// Engine with no memory bound
    ///
    /// Fails on a zero dimension, an invalid configuration, or a history
    /// (`variance_window * memory_dim` values) above `MAX_HISTORY_VALUES`.
    pub fn new(memory_dim: usize, config: CerebellumConfig) -> CerebellumResult<Self> {
        if memory_dim == 0 {
            return Err(CerebellumError::InvalidDimension { dimension: memory_dim });
        }
        config.validate()?;

        let history_values = config.variance_window.checked_mul(memory_dim);
        if !history_values.is_some_and(|n| n <= MAX_HISTORY_VALUES) {
            if memory_dim > MAX_HISTORY_VALUES {
                return Err(CerebellumError::InvalidDimension { dimension: memory_dim });
            }
            return Err(CerebellumError::InvalidConfig {
                field: "variance_window",
                reason: "history too large for state dimension",
            });
        }

        log_debug!(
            "Correction engine: dim={}, window={}, max_norm={}",
            memory_dim,
            config.variance_window,
            config.max_correction_norm
        );

        Ok(Self {
            memory_dim,
            error_history: HistoryBuffer::new(config.variance_window, memory_dim),
            state_history: HistoryBuffer::new(config.variance_window, memory_dim),
            derivatives: DerivativeEstimator::new(),
            filtered_error: None,
            memory: None,
            stats: EngineStats::default(),
            config,
        })
    }

    /// Engine reading from `memory`
    pub fn with_memory(
        memory_dim: usize,
        config: CerebellumConfig,
        memory: MemoryHandle,
    ) -> CerebellumResult<Self> {
        let mut engine = Self::new(memory_dim, config)?;
        engine.memory = Some(memory);
        Ok(engine)
    }

    /// Bind or rebind the memory collaborator
    pub fn set_memory(&mut self, memory: MemoryHandle) {
        log_debug!("Correction engine: memory {}", if self.memory.is_some() { "rebound" } else { "bound" });
        self.memory = Some(memory);
    }

    /// Unbind the memory collaborator, returning it
    pub fn detach_memory(&mut self) -> Option<MemoryHandle> {
        self.memory.take()
    }

    /// True when a memory collaborator is bound
    pub fn has_memory(&self) -> bool {
        self.memory.is_some()
    }

    /// Correction for one timestep
    pub fn compute_correction(&mut self, request: CorrectionRequest<'_>) -> CerebellumResult<Vec<f64>> {
        self.compute_correction_detailed(request).map(|step| step.correction)
    }

    /// Correction for one timestep, with every intermediate term
    ///
    /// A rejected request leaves the engine untouched.
    pub fn compute_correction_detailed(
        &mut self,
        request: CorrectionRequest<'_>,
    ) -> CerebellumResult<CorrectionBreakdown> {
        request.validate(self.memory_dim)?;

        let current = request.current_state;
        let error = vector::sub(request.target_state, current);

        self.error_history.push(&error);
        self.state_history.push(current);

        let velocity = match request.velocity {
            Some(v) => v.to_vec(),
            None => self.derivatives.velocity(current, request.dt),
        };
        let acceleration = match request.acceleration {
            Some(a) => a.to_vec(),
            None => self.derivatives.acceleration(&velocity, request.dt),
        };

        let empty = Context::new();
        let recall = memory::recall(
            self.memory.as_ref(),
            current,
            request.context.unwrap_or(&empty),
            self.config.min_confidence,
        );

        let adaptive_gain = terms::adaptive_gain(recall.confidence, self.config.min_confidence);
        let context_weight = context::context_weight(self.config.context_weight_enabled, request.context);

        let predicted = terms::predict_error(&error, &velocity, &acceleration, self.config.prediction_horizon);
        let feedforward = terms::feedforward(&predicted, self.config.feedforward_gain);

        let trial = terms::trial(&error, &recall.bias, self.config.trial_gain);

        let filtered = self.filter_error(&error);
        let variance = terms::variance(&error, &filtered, self.config.variance_gain);
        self.filtered_error = Some(filtered);

        let memory = terms::memory(&recall.bias, self.config.memory_gain, adaptive_gain, context_weight);

        let mut unsaturated = feedforward.clone();
        vector::add_assign(&mut unsaturated, &trial);
        vector::add_assign(&mut unsaturated, &variance);
        vector::add_assign(&mut unsaturated, &memory);
        vector::scale_assign(&mut unsaturated, self.config.correction_weight);

        let mut correction = unsaturated.clone();
        let saturated = terms::saturate(&mut correction, self.config.max_correction_norm);
        if saturated {
            log_trace!(
                "Correction saturated: |u|={} > {}",
                vector::norm(&unsaturated),
                self.config.max_correction_norm
            );
        }

        self.derivatives.commit(current, &velocity);
        self.stats.record(saturated, recall.source);

        Ok(CorrectionBreakdown {
            feedforward,
            trial,
            variance,
            memory,
            unsaturated,
            correction,
            saturated,
            recall,
            adaptive_gain,
            context_weight,
            velocity,
            acceleration,
        })
    }

    /// Moving average over a full window, the raw error until then
    fn filter_error(&self, error: &[f64]) -> Vec<f64> {
        if self.error_history.is_full() {
            self.error_history.mean().unwrap_or_else(|| error.to_vec())
        } else {
            error.to_vec()
        }
    }

    /// Clear rolling history and derivative state
    ///
    /// Configuration, memory binding and statistics survive.
    pub fn reset(&mut self) {
        self.error_history.clear();
        self.state_history.clear();
        self.derivatives.clear();
        self.filtered_error = None;
        log_debug!("Correction engine reset");
    }

    /// State dimension D
    pub fn memory_dim(&self) -> usize {
        self.memory_dim
    }

    /// Engine configuration
    pub fn config(&self) -> &CerebellumConfig {
        &self.config
    }

    /// Most recent moving-average error, `None` before the first call
    pub fn filtered_error(&self) -> Option<&[f64]> {
        self.filtered_error.as_deref()
    }

    /// Recent tracking errors, oldest first
    pub fn error_history(&self) -> &HistoryBuffer {
        &self.error_history
    }

    /// Recent states, oldest first
    pub fn state_history(&self) -> &HistoryBuffer {
        &self.state_history
    }

    /// State from the previous call
    pub fn prev_state(&self) -> Option<&[f64]> {
        self.derivatives.prev_state()
    }

    /// Velocity from the previous call
    pub fn prev_velocity(&self) -> Option<&[f64]> {
        self.derivatives.prev_velocity()
    }

    /// Lifetime counters
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Zero the lifetime counters
    pub fn reset_stats(&mut self) {
        self.stats = EngineStats::default();
    }
}

impl fmt::Debug for CerebellumEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CerebellumEngine")
            .field("memory_dim", &self.memory_dim)
            .field("config", &self.config)
            .field("has_memory", &self.memory.is_some())
            .field("history_len", &self.error_history.len())
            .field("stats", &self.stats)
            .finish()
    }
}
