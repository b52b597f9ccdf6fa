//! Basic Correction Example
//!
//! The simplest use of the engine: one corrective step for a 5-dimensional
//! state, with every intermediate term printed.
//!
//! ## What You'll Learn
//!
//! - Creating an engine from the default configuration
//! - Building a correction request with measured derivatives
//! - Reading the per-term breakdown
//! - Handling malformed requests
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_basic_correction
//! ```

use cerebellum_core::{CerebellumConfig, CerebellumEngine, CerebellumError, CorrectionRequest};

fn print_vec(label: &str, v: &[f64]) {
    let parts: Vec<String> = v.iter().map(|x| format!("{:+.6}", x)).collect();
    println!("  {:<12} [{}]", label, parts.join(", "));
}

fn main() -> Result<(), CerebellumError> {
    println!("Cerebellum Basic Correction Example");
    println!("===================================\n");

    let config = CerebellumConfig::default();
    println!("Configuration:");
    println!("  Feedforward gain:   {}", config.feedforward_gain);
    println!("  Prediction horizon: {} s", config.prediction_horizon);
    println!("  Trial gain:         {}", config.trial_gain);
    println!("  Variance gain:      {}", config.variance_gain);
    println!("  Memory gain:        {}", config.memory_gain);
    println!("  Max correction:     {}", config.max_correction_norm);
    println!();

    let mut engine = CerebellumEngine::new(5, config)?;

    let current = [0.0; 5];
    let target = [1.0, 1.0, 0.0, 0.0, 0.0];
    let velocity = [0.1, 0.1, 0.0, 0.0, 0.0];
    let acceleration = [0.01, 0.01, 0.0, 0.0, 0.0];

    let step = engine.compute_correction_detailed(
        CorrectionRequest::new(&current, &target)
            .velocity(&velocity)
            .acceleration(&acceleration)
            .dt(0.001),
    )?;

    println!("First step:");
    print_vec("feedforward", &step.feedforward);
    print_vec("trial", &step.trial);
    print_vec("variance", &step.variance);
    print_vec("memory", &step.memory);
    print_vec("correction", &step.correction);
    println!("  saturated    {}", step.saturated);
    println!("  memory       {:?}", step.recall.source);
    println!();

    // Malformed requests are rejected without touching engine state
    println!("Malformed requests:");
    let short = [0.0; 3];
    match engine.compute_correction(CorrectionRequest::new(&short, &target)) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {}", e),
    }
    let nan = [f64::NAN, 0.0, 0.0, 0.0, 0.0];
    match engine.compute_correction(CorrectionRequest::new(&nan, &target)) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {}", e),
    }

    println!("\nSteps completed: {}", engine.stats().steps);
    Ok(())
}
