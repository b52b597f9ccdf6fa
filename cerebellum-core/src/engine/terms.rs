//! Correction Terms
//!
//! Pure functions for each correction strategy. None of them touches engine
//! state, so each can be tested against its formula in isolation.
//!
//! ```text
//! e   = target − current                    (tracking error)
//! h   = prediction_horizon
//!
//! feedforward = −k_ff  · (e + v·h + ½·a·h²)
//! trial       = −k_tr  · (e − b)
//! variance    = −k_var · (e − ē)             ē = moving-average error
//! memory      = −b · k_mem · g(c) · w(ctx)   g = adaptive gain, w = context weight
//!
//! total = (feedforward + trial + variance + memory) · w_total
//! ```
//!
//! followed by radial saturation of `total`.

use alloc::vec::Vec;

use crate::{constants::SATURATION_EPSILON, vector};

/// Second-order extrapolation of the error `horizon` seconds ahead
///
/// `e + v·h + ½·a·h²`
pub fn predict_error(error: &[f64], velocity: &[f64], acceleration: &[f64], horizon: f64) -> Vec<f64> {
    let half_h2 = 0.5 * horizon * horizon;
    error
        .iter()
        .zip(velocity)
        .zip(acceleration)
        .map(|((e, v), a)| e + v * horizon + a * half_h2)
        .collect()
}

/// Cancels the error the system is about to have
pub fn feedforward(predicted_error: &[f64], gain: f64) -> Vec<f64> {
    vector::scale(predicted_error, -gain)
}

/// Cancels the part of the error not already explained by the remembered bias
pub fn trial(error: &[f64], memory_bias: &[f64], gain: f64) -> Vec<f64> {
    error
        .iter()
        .zip(memory_bias)
        .map(|(e, b)| -(e - b) * gain)
        .collect()
}

/// Cancels the high-frequency residual left after low-pass filtering
pub fn variance(error: &[f64], filtered_error: &[f64], gain: f64) -> Vec<f64> {
    error
        .iter()
        .zip(filtered_error)
        .map(|(e, f)| -(e - f) * gain)
        .collect()
}

/// Converts the remembered bias directly into a correction
pub fn memory(memory_bias: &[f64], gain: f64, adaptive_gain: f64, context_weight: f64) -> Vec<f64> {
    vector::scale(memory_bias, -gain * adaptive_gain * context_weight)
}

/// Confidence normalised into a gain in `[min_confidence, 1]`
///
/// Monotonic: higher confidence never yields a weaker gain.
pub fn adaptive_gain(confidence: f64, min_confidence: f64) -> f64 {
    confidence.max(min_confidence).min(1.0)
}

/// Radial clip to `max_norm`, preserving direction
///
/// Returns `true` when the vector was rescaled or repaired. The epsilon
/// keeps the division defined when the norm sits exactly on the boundary.
///
/// The output is always finite. A sum whose terms overflowed keeps the
/// direction of its infinite components; NaN components carry no direction
/// and become zero.
pub fn saturate(correction: &mut [f64], max_norm: f64) -> bool {
    let repaired = !vector::is_finite(correction);
    if repaired {
        let overflowed = correction.iter().any(|x| x.is_infinite());
        for x in correction.iter_mut() {
            if x.is_infinite() {
                *x = x.signum();
            } else if x.is_nan() || overflowed {
                *x = 0.0;
            }
        }
        if overflowed {
            let norm = vector::norm(correction);
            vector::scale_assign(correction, max_norm / (norm + SATURATION_EPSILON));
            return true;
        }
    }

    let norm = vector::norm(correction);
    if !norm.is_finite() {
        // Finite components whose norm still overflows
        let peak = vector::max_abs(correction);
        for x in correction.iter_mut() {
            *x /= peak;
        }
        let norm = vector::norm(correction);
        vector::scale_assign(correction, max_norm / (norm + SATURATION_EPSILON));
        return true;
    }

    if norm > max_norm {
        vector::scale_assign(correction, max_norm / (norm + SATURATION_EPSILON));
        true
    } else {
        repaired
    }
}
