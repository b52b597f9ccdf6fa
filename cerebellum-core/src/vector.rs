//! Vector operations on kinematic state
//!
//! State dimension is chosen at engine construction, so vectors are plain
//! `&[f64]` slices in and `Vec<f64>` out. All binary operations assume equal
//! lengths; the engine checks dimensions once at the call boundary and the
//! helpers below only debug-assert it.
//!
//! Square roots go through `libm` so the module works without `std`.

use alloc::vec;
use alloc::vec::Vec;

/// Zero vector of the given dimension
pub fn zeros(dim: usize) -> Vec<f64> {
    vec![0.0; dim]
}

/// Componentwise `a - b`
pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// `v * factor`
pub fn scale(v: &[f64], factor: f64) -> Vec<f64> {
    v.iter().map(|x| x * factor).collect()
}

/// In-place `acc += v`
pub fn add_assign(acc: &mut [f64], v: &[f64]) {
    debug_assert_eq!(acc.len(), v.len());
    for (a, x) in acc.iter_mut().zip(v) {
        *a += x;
    }
}

/// In-place `v *= factor`
pub fn scale_assign(v: &mut [f64], factor: f64) {
    for x in v.iter_mut() {
        *x *= factor;
    }
}

/// Euclidean (L2) norm
///
/// Finite for any finite input: when the sum of squares overflows or
/// underflows, components are rescaled by the largest magnitude first.
pub fn norm(v: &[f64]) -> f64 {
    let sum: f64 = v.iter().map(|x| x * x).sum();
    if sum.is_nan() {
        return f64::NAN;
    }
    if sum.is_finite() && sum >= f64::MIN_POSITIVE {
        return libm::sqrt(sum);
    }

    let peak = max_abs(v);
    if peak == 0.0 || peak.is_infinite() {
        return peak;
    }
    let scaled: f64 = v
        .iter()
        .map(|x| {
            let s = x / peak;
            s * s
        })
        .sum();
    peak * libm::sqrt(scaled)
}

/// Largest component magnitude, ignoring NaN
pub fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}

/// Componentwise arithmetic mean of a set of equal-length vectors.
///
/// Returns `None` when `samples` is empty.
pub fn mean<'a, I>(dim: usize, samples: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut sum = zeros(dim);
    let mut count = 0usize;
    for sample in samples {
        add_assign(&mut sum, sample);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    scale_assign(&mut sum, 1.0 / count as f64);
    Some(sum)
}

/// True when every component is finite
pub fn is_finite(v: &[f64]) -> bool {
    v.iter().all(|x| x.is_finite())
}
