//! Engine Constants
//!
//! Default gains and numeric constants used by the correction engine. All
//! defaults are the values the engine was tuned with on 5-axis motion
//! benches; presets in [`crate::config`] deviate from them only where a
//! scenario demands it.

// ===== PREDICTIVE FEEDFORWARD =====

/// Default gain applied to the extrapolated error.
///
/// Half of the predicted error is cancelled ahead of time; the primary
/// controller handles the rest.
pub const DEFAULT_FEEDFORWARD_GAIN: f64 = 0.5;

/// Default look-ahead horizon in seconds.
///
/// 10 ms covers typical servo-loop latency without extrapolating noise.
pub const DEFAULT_PREDICTION_HORIZON_S: f64 = 0.01;

// ===== TRIAL-TO-TRIAL CORRECTION =====

/// Default gain applied to the bias-compensated error.
pub const DEFAULT_TRIAL_GAIN: f64 = 0.3;

// ===== VARIANCE REDUCTION =====

/// Default gain applied to the high-frequency residual.
pub const DEFAULT_VARIANCE_GAIN: f64 = 0.2;

/// Nominal low-pass cutoff in Hz.
///
/// Informational only: the filter is a plain moving average over
/// `variance_window` samples and does not consult this value.
pub const DEFAULT_LOW_PASS_CUTOFF_HZ: f64 = 10.0;

/// Default moving-average window length in samples.
pub const DEFAULT_VARIANCE_WINDOW: usize = 5;

/// Longest accepted moving-average window in samples.
pub const MAX_VARIANCE_WINDOW: usize = 4096;

/// Upper bound on values held by one history buffer (`window * dimension`).
pub const MAX_HISTORY_VALUES: usize = 1 << 22;

// ===== MEMORY ADAPTATION =====

/// Default gain applied to the remembered bias.
pub const DEFAULT_MEMORY_GAIN: f64 = 0.4;

/// Default floor for confidence-derived gains.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.1;

/// Confidence assumed when a memory record does not report one.
pub const DEFAULT_RECORD_CONFIDENCE: f64 = 0.5;

// ===== CONTEXT WEIGHTING =====

/// Context weight when weighting is enabled but no context was supplied.
pub const CONTEXT_WEIGHT_BASE: f64 = 0.5;

/// Context weight added per context entry.
pub const CONTEXT_WEIGHT_PER_ENTRY: f64 = 0.1;

/// Context weight when weighting is disabled.
pub const CONTEXT_WEIGHT_NEUTRAL: f64 = 1.0;

// ===== FUSION & SATURATION =====

/// Default global scale applied to the summed correction.
pub const DEFAULT_CORRECTION_WEIGHT: f64 = 1.0;

/// Default ceiling on the Euclidean norm of the output.
pub const DEFAULT_MAX_CORRECTION_NORM: f64 = 10.0;

/// Added to the norm before rescaling so the division is always defined.
pub const SATURATION_EPSILON: f64 = 1e-8;

// ===== CALL DEFAULTS =====

/// Timestep assumed when the caller does not supply one (1 ms, 1 kHz loop).
pub const DEFAULT_DT_S: f64 = 0.001;

// ===== REFERENCE MEMORY =====

/// Default recall radius of [`crate::memory::nearest::NearestBiasMemory`].
///
/// Episodes further than this (Euclidean, in state units) are not returned.
pub const DEFAULT_RECALL_RADIUS: f64 = 0.1;
