//! Property tests for the correction engine
//!
//! - Output norm never exceeds the configured ceiling, even for extreme
//!   finite inputs
//! - Memory gain never weakens as confidence grows
//! - Constant error over a full window cancels the variance term

#![cfg(test)]

use std::sync::Arc;

use cerebellum_core::{
    engine::terms, vector, CerebellumConfig, CerebellumEngine, Context, CorrectionRequest, MemoryError,
    MemoryHandle, MemoryRecord,
};
use proptest::prelude::*;

fn state(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e3..1.0e3f64, dim)
}

fn bias_memory(bias: Vec<f64>, confidence: f64) -> MemoryHandle {
    Arc::new(move |_: &[f64], _: &Context| {
        Ok::<_, MemoryError>(vec![MemoryRecord::with_confidence(bias.clone(), confidence)])
    })
}

proptest! {
    #[test]
    fn correction_norm_never_exceeds_ceiling(
        max_norm in 0.01..50.0f64,
        steps in prop::collection::vec((state(4), state(4), 1.0e-4..0.1f64), 1..20),
        bias in state(4),
        confidence in 0.0..1.0f64,
    ) {
        let config = CerebellumConfig::default().with_max_correction_norm(max_norm);
        let mut engine = CerebellumEngine::with_memory(4, config, bias_memory(bias, confidence)).unwrap();

        for (current, target, dt) in &steps {
            let correction = engine
                .compute_correction(CorrectionRequest::new(current, target).dt(*dt))
                .unwrap();
            prop_assert!(vector::norm(&correction) <= max_norm + 1e-9);
        }
    }

    #[test]
    fn extreme_finite_inputs_stay_bounded(
        max_norm in 0.01..50.0f64,
        steps in prop::collection::vec(
            (
                prop::collection::vec(prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO, 3),
                prop::collection::vec(prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO, 3),
                prop::num::f64::POSITIVE | prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL,
            ),
            1..10,
        ),
    ) {
        let config = CerebellumConfig::default().with_max_correction_norm(max_norm);
        let mut engine = CerebellumEngine::new(3, config).unwrap();

        for (current, target, dt) in &steps {
            let correction = engine
                .compute_correction(CorrectionRequest::new(current, target).dt(*dt))
                .unwrap();
            prop_assert!(vector::is_finite(&correction));
            prop_assert!(vector::norm(&correction) <= max_norm + 1e-9);
        }
    }

    #[test]
    fn memory_term_monotonic_in_confidence(
        bias in state(3),
        c1 in 0.0..1.5f64,
        c2 in 0.0..1.5f64,
        min_confidence in 0.0..1.0f64,
    ) {
        let (low, high) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        let config = CerebellumConfig::default().with_min_confidence(min_confidence);
        let zero = [0.0; 3];

        let mut weak = CerebellumEngine::with_memory(3, config.clone(), bias_memory(bias.clone(), low)).unwrap();
        let mut strong = CerebellumEngine::with_memory(3, config, bias_memory(bias, high)).unwrap();

        let a = weak.compute_correction_detailed(CorrectionRequest::new(&zero, &zero)).unwrap();
        let b = strong.compute_correction_detailed(CorrectionRequest::new(&zero, &zero)).unwrap();

        prop_assert!(a.adaptive_gain <= b.adaptive_gain);
        prop_assert!(vector::norm(&a.memory) <= vector::norm(&b.memory) + 1e-12);
        prop_assert!(terms::adaptive_gain(low, min_confidence) >= min_confidence.min(1.0));
    }

    #[test]
    fn constant_error_cancels_variance_term(
        error in state(3),
        window in 1usize..12,
        extra in 0usize..5,
    ) {
        let config = CerebellumConfig::default().with_variance_window(window);
        let mut engine = CerebellumEngine::new(3, config).unwrap();
        let current = [0.0; 3];
        let zero = [0.0; 3];

        for _ in 0..window + extra {
            let step = engine
                .compute_correction_detailed(
                    CorrectionRequest::new(&current, &error).velocity(&zero).acceleration(&zero),
                )
                .unwrap();
            for v in &step.variance {
                prop_assert!(v.abs() < 1e-9);
            }
        }

        let filtered = engine.filtered_error().unwrap();
        for (f, e) in filtered.iter().zip(&error) {
            prop_assert!((f - e).abs() < 1e-9);
        }
    }
}
