//! Robot Arm Trajectory Example
//!
//! A 6-axis arm tracks a circular trajectory under a PID controller, with
//! the correction engine added on top. Stable points are written into a
//! nearest-episode memory the engine reads from on later passes.
//!
//! ## What You'll Learn
//!
//! - Combining the engine with a primary controller
//! - Sharing a memory between the caller (writer) and engine (reader)
//! - Passing context with each step
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_robot_arm
//! ```

use std::f64::consts::PI;
use std::sync::Arc;

use cerebellum_core::{
    context::context_from, vector, CerebellumConfig, CerebellumEngine, CerebellumError, CorrectionRequest,
    NearestBiasMemory,
};

const AXES: usize = 6;
const DT: f64 = 0.001;

/// Per-axis PID controller
struct Pid {
    kp: f64,
    ki: f64,
    kd: f64,
    integral: Vec<f64>,
    prev_error: Option<Vec<f64>>,
}

impl Pid {
    fn new(kp: f64, ki: f64, kd: f64, dim: usize) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral: vec![0.0; dim],
            prev_error: None,
        }
    }

    fn compute(&mut self, error: &[f64], dt: f64) -> Vec<f64> {
        let prev = self.prev_error.take().unwrap_or_else(|| error.to_vec());
        let output = error
            .iter()
            .zip(&prev)
            .zip(self.integral.iter_mut())
            .map(|((e, p), i)| {
                *i += e * dt;
                self.kp * e + self.ki * *i + self.kd * (e - p) / dt
            })
            .collect();
        self.prev_error = Some(error.to_vec());
        output
    }
}

fn circle(points: usize) -> Vec<Vec<f64>> {
    let center = [0.5, 0.5, 0.3, 0.0, 0.0, 0.0];
    let radius = 0.1;
    (0..points)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / points as f64;
            let mut p = center.to_vec();
            p[0] += radius * angle.cos();
            p[1] += radius * angle.sin();
            p
        })
        .collect()
}

fn main() -> Result<(), CerebellumError> {
    println!("Cerebellum Robot Arm Example");
    println!("============================\n");

    let memory = Arc::new(NearestBiasMemory::new());
    let mut engine = CerebellumEngine::with_memory(AXES, CerebellumConfig::robot_arm(), memory.clone())?;
    let mut pid = Pid::new(1.0, 0.1, 0.05, AXES);

    let context = context_from([("payload", 1.0.into()), ("mode", "robot_arm".into())]);
    let trajectory = circle(50);
    let mut joints = vec![0.0; AXES];

    println!("{:>6} | {:>12} | {:>15} | {:>8}", "Pass", "Mean Error", "Mean Correction", "Hits");
    println!("{}", "-".repeat(50));

    for pass in 1..=3 {
        let hits_before = engine.stats().memory_hits;
        let mut error_sum = 0.0;
        let mut correction_sum = 0.0;

        for target in &trajectory {
            let error = vector::sub(target, &joints);
            let pid_output = pid.compute(&error, DT);

            let correction = engine.compute_correction(
                CorrectionRequest::new(&joints, target).context(&context).dt(DT),
            )?;

            // The correction opposes the tracking error, so it is subtracted
            for i in 0..AXES {
                joints[i] += (pid_output[i] - correction[i]) * DT;
            }

            let error_norm = vector::norm(&error);
            if error_norm < 0.01 {
                memory.store(&joints, &error, (0.9 - error_norm * 10.0).max(0.0));
            }

            error_sum += error_norm;
            correction_sum += vector::norm(&correction);
        }

        let n = trajectory.len() as f64;
        println!(
            "{:>6} | {:>12.6} | {:>15.6} | {:>8}",
            pass,
            error_sum / n,
            correction_sum / n,
            engine.stats().memory_hits - hits_before
        );
    }

    let stats = engine.stats();
    println!("\nEpisodes stored:  {}", memory.len());
    println!("Steps:            {}", stats.steps);
    println!("Saturation rate:  {:.1}%", stats.saturation_rate() * 100.0);
    Ok(())
}
