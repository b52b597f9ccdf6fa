//! Finite-difference derivative estimation
//!
//! When the caller does not supply velocity or acceleration the engine
//! differences consecutive calls:
//!
//! ```text
//! v = (x − x_prev) / dt
//! a = (v − v_prev) / dt
//! ```
//!
//! Both fall back to zero on the first call (nothing to difference against),
//! whenever `dt` is not strictly positive (which includes NaN), and when the
//! quotient overflows, as it does for a subnormal `dt`.

use alloc::vec::Vec;

use crate::vector;

/// Previous-call state used for differencing
#[derive(Debug, Clone, Default)]
pub struct DerivativeEstimator {
    prev_state: Option<Vec<f64>>,
    prev_velocity: Option<Vec<f64>>,
}

impl DerivativeEstimator {
    /// Estimator with no previous call
    pub fn new() -> Self {
        Self::default()
    }

    /// First difference of the state
    pub fn velocity(&self, state: &[f64], dt: f64) -> Vec<f64> {
        Self::difference(state, self.prev_state.as_deref(), dt)
    }

    /// First difference of the velocity
    pub fn acceleration(&self, velocity: &[f64], dt: f64) -> Vec<f64> {
        Self::difference(velocity, self.prev_velocity.as_deref(), dt)
    }

    /// Remember this call's state and velocity for the next one
    ///
    /// Acceleration is never carried across calls.
    pub fn commit(&mut self, state: &[f64], velocity: &[f64]) {
        Self::overwrite(&mut self.prev_state, state);
        Self::overwrite(&mut self.prev_velocity, velocity);
    }

    /// Forget the previous call
    pub fn clear(&mut self) {
        self.prev_state = None;
        self.prev_velocity = None;
    }

    /// State from the previous call
    pub fn prev_state(&self) -> Option<&[f64]> {
        self.prev_state.as_deref()
    }

    /// Velocity from the previous call
    pub fn prev_velocity(&self) -> Option<&[f64]> {
        self.prev_velocity.as_deref()
    }

    // Zero when there is nothing to difference or the quotient overflows
    fn difference(current: &[f64], previous: Option<&[f64]>, dt: f64) -> Vec<f64> {
        let rate: Vec<f64> = match previous {
            Some(previous) if dt > 0.0 => current
                .iter()
                .zip(previous)
                .map(|(c, p)| (c - p) / dt)
                .collect(),
            _ => return vector::zeros(current.len()),
        };

        if vector::is_finite(&rate) {
            rate
        } else {
            log_trace!("Derivative estimate overflowed at dt={}, using zero", dt);
            vector::zeros(current.len())
        }
    }

    // Reuse the slot's allocation once it exists
    fn overwrite(slot: &mut Option<Vec<f64>>, value: &[f64]) {
        match slot {
            Some(existing) => {
                existing.clear();
                existing.extend_from_slice(value);
            }
            None => *slot = Some(value.to_vec()),
        }
    }
}
