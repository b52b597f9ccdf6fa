//! Hovering Learning Example
//!
//! A hovering platform `[x, y, z, roll, pitch]` holds position against a
//! steady downdraft. Each trial starts from rest; stable states are stored
//! into memory so later trials recall the disturbance.
//!
//! ## What You'll Learn
//!
//! - Running repeated trials with `reset()` between them
//! - Accumulating episodes across trials
//! - Comparing early and late trials
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 04_hovering_learning
//! ```

use std::sync::Arc;

use cerebellum_core::{
    context::context_from, vector, CerebellumConfig, CerebellumEngine, CerebellumError, CorrectionRequest,
    NearestBiasMemory,
};

const DIM: usize = 5;
const DT: f64 = 0.001;
const TRIALS: usize = 20;
const STEPS: usize = 500;

/// Trial statistics
struct TrialResult {
    rms_error: f64,
    rms_correction: f64,
    hits: u64,
}

fn run_trial(
    engine: &mut CerebellumEngine,
    memory: &NearestBiasMemory,
    trial: usize,
) -> Result<TrialResult, CerebellumError> {
    let target = [0.0, 0.0, 0.1, 0.0, 0.0];
    let downdraft = [0.0, 0.0, -0.02, 0.0, 0.0];
    let context = context_from([("mode", "hovering".into()), ("trial", (trial as f64).into())]);

    engine.reset();
    let hits_before = engine.stats().memory_hits;

    let mut state = vec![0.0; DIM];
    let mut error_sq = 0.0;
    let mut correction_sq = 0.0;

    for _ in 0..STEPS {
        let error = vector::sub(&target, &state);
        let correction = engine.compute_correction(
            CorrectionRequest::new(&state, &target).context(&context).dt(DT),
        )?;

        // Proportional thrust, engine correction against the error, downdraft
        for i in 0..DIM {
            state[i] += (2.0 * error[i] - correction[i] + downdraft[i]) * DT * 10.0;
        }

        let error_norm = vector::norm(&error);
        if error_norm < 0.05 {
            memory.store(&state, &error, (0.9 - error_norm * 10.0).max(0.0));
        }

        error_sq += error_norm * error_norm;
        correction_sq += vector::norm(&correction).powi(2);
    }

    Ok(TrialResult {
        rms_error: (error_sq / STEPS as f64).sqrt(),
        rms_correction: (correction_sq / STEPS as f64).sqrt(),
        hits: engine.stats().memory_hits - hits_before,
    })
}

fn main() -> Result<(), CerebellumError> {
    println!("Cerebellum Hovering Learning Example");
    println!("====================================\n");

    let memory = Arc::new(NearestBiasMemory::new());
    let mut engine = CerebellumEngine::with_memory(DIM, CerebellumConfig::hovering(), memory.clone())?;

    println!("{:>6} | {:>12} | {:>15} | {:>6}", "Trial", "RMS Error", "Correction RMS", "Hits");
    println!("{}", "-".repeat(48));

    let mut results = Vec::with_capacity(TRIALS);
    for trial in 0..TRIALS {
        let result = run_trial(&mut engine, &memory, trial)?;
        if trial < 3 || (trial + 1) % 5 == 0 {
            println!(
                "{:>6} | {:>12.6} | {:>15.6} | {:>6}",
                trial + 1,
                result.rms_error,
                result.rms_correction,
                result.hits
            );
        }
        results.push(result);
    }

    let mean = |slice: &[TrialResult]| slice.iter().map(|r| r.rms_error).sum::<f64>() / slice.len() as f64;
    let before = mean(&results[..5]);
    let after = mean(&results[TRIALS - 5..]);

    println!("\nRMS error, first 5 trials: {:.6}", before);
    println!("RMS error, last 5 trials:  {:.6}", after);
    println!("Episodes stored:           {}", memory.len());
    println!("Total steps:               {}", engine.stats().steps);
    Ok(())
}
