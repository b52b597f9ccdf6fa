//! Aircraft Attitude Example
//!
//! An autopilot holds `[roll, pitch, yaw]` through a climb, level-off and
//! descent using the engine alone, with no primary controller. The
//! `aircraft_attitude()` preset looks 50 ms ahead to cover aerodynamic lag.
//!
//! ## What You'll Learn
//!
//! - Using the engine as the only controller
//! - Supplying measured rates instead of letting the engine difference
//! - Flight-condition context (altitude, airspeed)
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 05_aircraft_attitude
//! ```

use std::sync::Arc;

use cerebellum_core::{
    context::context_from, vector, CerebellumConfig, CerebellumEngine, CerebellumError, CorrectionRequest,
    NearestBiasMemory,
};

const DT: f64 = 0.01;
const STEPS_PER_PHASE: usize = 100;

/// Attitude with first-order lag between command and response
struct Airframe {
    attitude: Vec<f64>,
    rate: Vec<f64>,
    prev_rate: Vec<f64>,
    lag: f64,
}

impl Airframe {
    fn new() -> Self {
        Self {
            attitude: vec![0.0; 3],
            rate: vec![0.0; 3],
            prev_rate: vec![0.0; 3],
            lag: 0.2,
        }
    }

    fn apply(&mut self, command: &[f64]) {
        self.prev_rate.clone_from(&self.rate);
        for i in 0..3 {
            // The correction opposes the attitude error
            let commanded_rate = -command[i];
            self.rate[i] += (commanded_rate - self.rate[i]) * DT / self.lag;
            self.attitude[i] += self.rate[i] * DT;
        }
    }

    fn angular_acceleration(&self) -> Vec<f64> {
        self.rate
            .iter()
            .zip(&self.prev_rate)
            .map(|(r, p)| (r - p) / DT)
            .collect()
    }
}

fn main() -> Result<(), CerebellumError> {
    println!("Cerebellum Aircraft Attitude Example");
    println!("====================================\n");

    let config = CerebellumConfig::aircraft_attitude();
    println!("Feedforward gain:   {}", config.feedforward_gain);
    println!("Prediction horizon: {} s", config.prediction_horizon);
    println!("Max correction:     {}\n", config.max_correction_norm);

    let memory = Arc::new(NearestBiasMemory::new());
    let mut engine = CerebellumEngine::with_memory(3, config, memory.clone())?;
    let mut airframe = Airframe::new();

    let context = context_from([
        ("altitude", 10_000.0.into()),
        ("airspeed", 250.0.into()),
        ("mode", "autopilot".into()),
    ]);

    let phases = [
        ("level", [0.0, 0.0, 0.0]),
        ("climb", [0.0, 0.1, 0.0]),
        ("hold", [0.0, 0.1, 0.0]),
        ("level", [0.0, 0.0, 0.0]),
        ("descend", [0.0, -0.1, 0.0]),
        ("level", [0.0, 0.0, 0.0]),
    ];

    println!(
        "{:>6} | {:>8} | {:>12} | {:>13} | {:>10} | {:>10}",
        "Step", "Phase", "Target Pitch", "Current Pitch", "Error", "Correction"
    );
    println!("{}", "-".repeat(74));

    let mut step = 0;
    let mut error_sum = 0.0;
    for (phase, target) in &phases {
        for _ in 0..STEPS_PER_PHASE {
            let acceleration = airframe.angular_acceleration();
            let correction = engine.compute_correction(
                CorrectionRequest::new(&airframe.attitude, target)
                    .velocity(&airframe.rate)
                    .acceleration(&acceleration)
                    .context(&context)
                    .dt(DT),
            )?;
            airframe.apply(&correction);

            let error = vector::sub(target, &airframe.attitude);
            let error_norm = vector::norm(&error);
            if error_norm < 0.01 {
                memory.store(&airframe.attitude, &error, (0.9 - error_norm * 10.0).max(0.0));
            }
            error_sum += error_norm;

            step += 1;
            if step % 50 == 0 {
                println!(
                    "{:>6} | {:>8} | {:>12.4} | {:>13.6} | {:>10.6} | {:>10.6}",
                    step,
                    phase,
                    target[1],
                    airframe.attitude[1],
                    error_norm,
                    vector::norm(&correction)
                );
            }
        }
    }

    let stats = engine.stats();
    println!("\nMean attitude error: {:.6} rad", error_sum / step as f64);
    println!("Saturation rate:     {:.1}%", stats.saturation_rate() * 100.0);
    println!("Memory hits:         {}", stats.memory_hits);
    println!("Episodes stored:     {}", memory.len());
    Ok(())
}
