//! Motion correction engine for closed-loop control
//!
//! Sits downstream of a primary controller (PID or similar) and upstream of
//! the actuator command pipeline. Each call takes the current and target
//! kinematic state and returns a bounded corrective signal that blends:
//! - Predictive feedforward (second-order error extrapolation)
//! - Trial-to-trial correction against a remembered bias
//! - Variance reduction (moving-average noise cancellation)
//! - Memory-adaptive correction scaled by confidence and context
//!
//! Key constraints:
//! - One call = one timestep, bounded work over a fixed-size window
//! - Memory lookups never stall or fail the control loop
//! - Output norm never exceeds the configured ceiling
//!
//! ```no_run
//! use cerebellum_core::{CerebellumEngine, CerebellumConfig, CorrectionRequest};
//!
//! let mut engine = CerebellumEngine::new(5, CerebellumConfig::default()).unwrap();
//!
//! let current = [0.0, 0.0, 0.0, 0.0, 0.0];
//! let target = [1.0, 1.0, 0.0, 0.0, 0.0];
//!
//! match engine.compute_correction(CorrectionRequest::new(&current, &target).dt(0.001)) {
//!     Ok(correction) => {}, // Add to the primary controller output
//!     Err(e) => {},         // Malformed request (wrong dimension, NaN, ...)
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod logging;

pub mod config;
pub mod constants;
pub mod context;
pub mod engine;
pub mod errors;
pub mod history;
pub mod memory;
pub mod vector;

// Public API
pub use config::CerebellumConfig;
pub use context::{Context, ContextValue};
pub use engine::{CerebellumEngine, CorrectionBreakdown, CorrectionRequest, EngineStats};
pub use errors::{CerebellumError, CerebellumResult};
pub use memory::{EpisodicMemory, MemoryError, MemoryHandle, MemoryRecall, MemoryRecord, RecallSource};

#[cfg(feature = "std")]
pub use memory::nearest::NearestBiasMemory;

/// Crate version, exposed for diagnostics banners
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
