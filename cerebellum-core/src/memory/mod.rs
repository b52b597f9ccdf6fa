//! Episodic Memory Boundary
//!
//! ## Overview
//!
//! The engine consults an external episodic memory (a "hippocampus") for a
//! bias previously observed at or near the current state. The memory is a
//! collaborator with a narrow, read-only contract:
//!
//! ```text
//! retrieve(state, context) → [record, record, ...]   (any number, maybe zero)
//!                              │
//!                              └── only the first is used
//! ```
//!
//! Ranking and tie-breaking belong to the memory. The engine takes the first
//! record exactly as returned.
//!
//! ## Degraded Memory
//!
//! A cold, absent or broken memory must never stall the control loop. Every
//! outcome other than a well-formed hit collapses to a zero bias with zero
//! confidence, in one place: [`recall`]. The result still records *why* the
//! memory contributed nothing:
//!
//! | Outcome | [`RecallSource`] |
//! |---|---|
//! | No memory bound | `Unbound` |
//! | Empty reply | `Miss` |
//! | `Err(MemoryError)` | `Fault` |
//! | Wrong bias dimension, NaN bias or confidence | `Malformed` |
//! | First record usable | `Hit` |
//!
//! ## Implementing a Memory
//!
//! Any `Fn(&[f64], &Context) -> Result<Vec<MemoryRecord>, MemoryError>`
//! closure is a memory, which keeps test doubles short:
//!
//! ```rust
//! use std::sync::Arc;
//! use cerebellum_core::{Context, MemoryHandle, MemoryRecord, MemoryError};
//!
//! let memory: MemoryHandle = Arc::new(|_state: &[f64], _ctx: &Context| {
//!     Ok::<_, MemoryError>(vec![MemoryRecord::with_confidence(vec![0.001, 0.002], 0.9)])
//! });
//! ```

#[cfg(feature = "std")]
pub mod nearest;

use alloc::sync::Arc;
use alloc::vec::Vec;

use thiserror_no_std::Error;

use crate::{
    constants::DEFAULT_RECORD_CONFIDENCE,
    context::Context,
    vector,
};

/// Failure reported by a memory collaborator
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MemoryError {
    /// Store offline or not yet initialised
    #[error("Memory unavailable")]
    Unavailable,

    /// Lookup exceeded the collaborator's own deadline
    #[error("Memory lookup timed out")]
    Timeout,

    /// Backend-specific failure
    #[error("Memory backend failure: {reason}")]
    Backend {
        /// Short description from the backend
        reason: &'static str,
    },
}

/// One remembered episode as returned by a memory
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecord {
    /// Bias observed at the remembered state, same dimension as the engine
    pub bias: Vec<f64>,

    /// Trust in this record, in [0, 1]. Absent means 0.5.
    pub confidence: Option<f64>,
}

impl MemoryRecord {
    /// Record without a confidence score
    pub fn new(bias: Vec<f64>) -> Self {
        Self { bias, confidence: None }
    }

    /// Record with a confidence score
    pub fn with_confidence(bias: Vec<f64>, confidence: f64) -> Self {
        Self {
            bias,
            confidence: Some(confidence),
        }
    }
}

/// Read-only episodic memory contract
pub trait EpisodicMemory {
    /// Records relevant to `state` under `context`, most relevant first
    fn retrieve(&self, state: &[f64], context: &Context) -> Result<Vec<MemoryRecord>, MemoryError>;
}

impl<F> EpisodicMemory for F
where
    F: Fn(&[f64], &Context) -> Result<Vec<MemoryRecord>, MemoryError>,
{
    fn retrieve(&self, state: &[f64], context: &Context) -> Result<Vec<MemoryRecord>, MemoryError> {
        self(state, context)
    }
}

/// Shared handle to a memory collaborator
///
/// Shared so the caller can keep writing episodes into the same store the
/// engine reads from.
pub type MemoryHandle = Arc<dyn EpisodicMemory + Send + Sync>;

/// Why a recall produced what it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallSource {
    /// No memory bound to the engine
    Unbound,
    /// Memory returned no records
    Miss,
    /// Memory returned an error
    Fault,
    /// First record was unusable
    Malformed,
    /// First record used
    Hit,
}

/// Bias and confidence the engine will act on this step
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecall {
    /// Remembered bias, zero unless `source == Hit`
    pub bias: Vec<f64>,

    /// Confidence clamped to `[min_confidence, 1]` on a hit, 0.0 otherwise
    pub confidence: f64,

    /// Outcome of the lookup
    pub source: RecallSource,
}

impl MemoryRecall {
    /// Zero bias, zero confidence
    pub fn degraded(dim: usize, source: RecallSource) -> Self {
        Self {
            bias: vector::zeros(dim),
            confidence: 0.0,
            source,
        }
    }

    /// True when the memory contributed a bias
    pub fn is_hit(&self) -> bool {
        self.source == RecallSource::Hit
    }
}

/// Query the memory, degrading every failure to a zero bias
///
/// This is the only place memory failures are handled. Nothing here returns
/// an error to the caller. `min_confidence` is forced into `[0, 1]`, with
/// NaN read as 0.
pub fn recall(
    memory: Option<&MemoryHandle>,
    state: &[f64],
    context: &Context,
    min_confidence: f64,
) -> MemoryRecall {
    let dim = state.len();

    let memory = match memory {
        Some(memory) => memory,
        None => return MemoryRecall::degraded(dim, RecallSource::Unbound),
    };

    let records = match memory.retrieve(state, context) {
        Ok(records) => records,
        Err(_e) => {
            log_warn!("Memory lookup failed, continuing without bias: {}", _e);
            return MemoryRecall::degraded(dim, RecallSource::Fault);
        }
    };

    let first = match records.into_iter().next() {
        Some(record) => record,
        None => return MemoryRecall::degraded(dim, RecallSource::Miss),
    };

    if first.bias.len() != dim {
        log_warn!(
            "Memory returned bias of dimension {} for a {}-dimensional state, ignoring",
            first.bias.len(),
            dim
        );
        return MemoryRecall::degraded(dim, RecallSource::Malformed);
    }

    let confidence = first.confidence.unwrap_or(DEFAULT_RECORD_CONFIDENCE);
    if !confidence.is_finite() || !vector::is_finite(&first.bias) {
        log_warn!("Memory returned non-finite bias or confidence, ignoring");
        return MemoryRecall::degraded(dim, RecallSource::Malformed);
    }

    // Callers outside the engine may pass an unvalidated floor
    let floor = if min_confidence.is_nan() {
        0.0
    } else {
        min_confidence.clamp(0.0, 1.0)
    };

    MemoryRecall {
        bias: first.bias,
        confidence: confidence.clamp(floor, 1.0),
        source: RecallSource::Hit,
    }
}
