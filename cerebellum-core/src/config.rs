//! Engine configuration
//!
//! A single flat struct of gains and limits. Configuration is immutable once
//! handed to an engine; build a new engine to change it.
//!
//! ## Presets
//!
//! | Preset | Differs from default |
//! |---|---|
//! | [`CerebellumConfig::robot_arm`] | `max_correction_norm = 5.0` |
//! | [`CerebellumConfig::precision_machining`] | `max_correction_norm = 1.0` |
//! | [`CerebellumConfig::hovering`] | `max_correction_norm = 1.0` |
//! | [`CerebellumConfig::aircraft_attitude`] | faster feedforward, 50 ms horizon, `max_correction_norm = 2.0` |
//!
//! ## Loading
//!
//! With the `std` feature a configuration can be read from JSON. Missing
//! fields take their default value:
//!
//! ```rust
//! use cerebellum_core::CerebellumConfig;
//!
//! let config = CerebellumConfig::from_json_str(r#"{ "max_correction_norm": 2.0 }"#).unwrap();
//! assert_eq!(config.max_correction_norm, 2.0);
//! assert_eq!(config.variance_window, 5);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::*,
    errors::{CerebellumError, CerebellumResult},
};

/// Gains and limits for one correction engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CerebellumConfig {
    /// Scales cancellation of the predicted error
    pub feedforward_gain: f64,

    /// Look-ahead time in seconds for error extrapolation.
    /// Independent of the per-call `dt`.
    pub prediction_horizon: f64,

    /// Scales cancellation of the bias-compensated error
    pub trial_gain: f64,

    /// Scales cancellation of high-frequency noise
    pub variance_gain: f64,

    /// Nominal filter cutoff in Hz. Not used by the moving-average filter.
    pub low_pass_cutoff: f64,

    /// Number of past error samples in the moving average
    pub variance_window: usize,

    /// Scales the memory-derived correction
    pub memory_gain: f64,

    /// Global scale applied after summing all terms
    pub correction_weight: f64,

    /// Ceiling on the Euclidean norm of the output
    pub max_correction_norm: f64,

    /// Floor applied when turning memory confidence into a gain
    pub min_confidence: f64,

    /// Whether context modulates the memory term
    pub context_weight_enabled: bool,
}

impl Default for CerebellumConfig {
    fn default() -> Self {
        Self {
            feedforward_gain: DEFAULT_FEEDFORWARD_GAIN,
            prediction_horizon: DEFAULT_PREDICTION_HORIZON_S,
            trial_gain: DEFAULT_TRIAL_GAIN,
            variance_gain: DEFAULT_VARIANCE_GAIN,
            low_pass_cutoff: DEFAULT_LOW_PASS_CUTOFF_HZ,
            variance_window: DEFAULT_VARIANCE_WINDOW,
            memory_gain: DEFAULT_MEMORY_GAIN,
            correction_weight: DEFAULT_CORRECTION_WEIGHT,
            max_correction_norm: DEFAULT_MAX_CORRECTION_NORM,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            context_weight_enabled: true,
        }
    }
}

impl CerebellumConfig {
    /// Six-axis industrial arm: tighter output ceiling
    pub fn robot_arm() -> Self {
        Self {
            max_correction_norm: 5.0,
            ..Self::default()
        }
    }

    /// Five-axis CNC: corrections stay within a unit ball
    pub fn precision_machining() -> Self {
        Self {
            max_correction_norm: 1.0,
            ..Self::default()
        }
    }

    /// Hover take-off: small corrections on top of the thrust loop
    pub fn hovering() -> Self {
        Self {
            max_correction_norm: 1.0,
            ..Self::default()
        }
    }

    /// Autopilot attitude hold.
    ///
    /// Aerodynamic lag dominates, so prediction carries more weight and looks
    /// further ahead (50 ms).
    pub fn aircraft_attitude() -> Self {
        Self {
            feedforward_gain: 0.6,
            prediction_horizon: 0.05,
            max_correction_norm: 2.0,
            ..Self::default()
        }
    }

    /// Set feedforward gain
    pub fn with_feedforward_gain(mut self, gain: f64) -> Self {
        self.feedforward_gain = gain;
        self
    }

    /// Set prediction horizon in seconds
    pub fn with_prediction_horizon(mut self, horizon: f64) -> Self {
        self.prediction_horizon = horizon;
        self
    }

    /// Set trial-to-trial gain
    pub fn with_trial_gain(mut self, gain: f64) -> Self {
        self.trial_gain = gain;
        self
    }

    /// Set variance-reduction gain
    pub fn with_variance_gain(mut self, gain: f64) -> Self {
        self.variance_gain = gain;
        self
    }

    /// Set nominal low-pass cutoff in Hz
    pub fn with_low_pass_cutoff(mut self, cutoff_hz: f64) -> Self {
        self.low_pass_cutoff = cutoff_hz;
        self
    }

    /// Set moving-average window length
    pub fn with_variance_window(mut self, window: usize) -> Self {
        self.variance_window = window;
        self
    }

    /// Set memory gain
    pub fn with_memory_gain(mut self, gain: f64) -> Self {
        self.memory_gain = gain;
        self
    }

    /// Set global correction weight
    pub fn with_correction_weight(mut self, weight: f64) -> Self {
        self.correction_weight = weight;
        self
    }

    /// Set output norm ceiling
    pub fn with_max_correction_norm(mut self, max_norm: f64) -> Self {
        self.max_correction_norm = max_norm;
        self
    }

    /// Set confidence floor
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Enable or disable context weighting
    pub fn with_context_weighting(mut self, enabled: bool) -> Self {
        self.context_weight_enabled = enabled;
        self
    }

    /// Check every field against its valid domain
    ///
    /// Gains may be negative (inverting a term is a legitimate tuning
    /// choice) but must be finite.
    pub fn validate(&self) -> CerebellumResult<()> {
        let finite = [
            ("feedforward_gain", self.feedforward_gain),
            ("trial_gain", self.trial_gain),
            ("variance_gain", self.variance_gain),
            ("memory_gain", self.memory_gain),
            ("correction_weight", self.correction_weight),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        if !(self.prediction_horizon.is_finite() && self.prediction_horizon >= 0.0) {
            return Err(invalid("prediction_horizon", "must be finite and non-negative"));
        }

        if !(self.low_pass_cutoff.is_finite() && self.low_pass_cutoff > 0.0) {
            return Err(invalid("low_pass_cutoff", "must be finite and positive"));
        }

        if self.variance_window == 0 {
            return Err(invalid("variance_window", "must hold at least one sample"));
        }

        if self.variance_window > MAX_VARIANCE_WINDOW {
            return Err(invalid("variance_window", "exceeds the maximum window"));
        }

        if !(self.max_correction_norm.is_finite() && self.max_correction_norm > 0.0) {
            return Err(invalid("max_correction_norm", "must be finite and positive"));
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(invalid("min_confidence", "must lie in [0, 1]"));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration
    #[cfg(feature = "std")]
    pub fn from_json_str(json: &str) -> CerebellumResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|_e| {
            log_warn!("Configuration JSON rejected: {}", _e);
            CerebellumError::ConfigLoad { reason: "malformed JSON" }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    #[cfg(feature = "std")]
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> CerebellumResult<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|_e| {
            log_warn!("Configuration file {:?} unreadable: {}", path.as_ref(), _e);
            CerebellumError::ConfigLoad { reason: "file unreadable" }
        })?;
        Self::from_json_str(&json)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> CerebellumError {
    CerebellumError::InvalidConfig { field, reason }
}
