//! Precision Machining Example
//!
//! A 5-axis CNC spindle position `[x, y, z, rpm/1000, feed]` carries a small
//! systematic bias that depends on which tool is loaded. The memory holds
//! the bias for each tool; the engine recalls it near the stored position.
//!
//! ## What You'll Learn
//!
//! - Seeding a memory with known biases
//! - How context size changes the memory contribution
//! - The tight `precision_machining()` ceiling
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_precision_machining
//! ```

use std::sync::Arc;

use cerebellum_core::{
    context::context_from, vector, CerebellumConfig, CerebellumEngine, CerebellumError, Context,
    CorrectionRequest, NearestBiasMemory,
};

fn main() -> Result<(), CerebellumError> {
    println!("Cerebellum Precision Machining Example");
    println!("======================================\n");

    let home = [1.0, 0.5, 0.3, 10.0, 5.0];
    let tool_bias = [0.001, 0.002, 0.0, 0.0, 0.0];

    let memory = Arc::new(NearestBiasMemory::new());
    memory.store(&home, &tool_bias, 0.9);

    let config = CerebellumConfig::precision_machining();
    println!("Max correction norm: {}\n", config.max_correction_norm);

    let measured = [1.0005, 0.501, 0.3, 10.0, 5.0];

    let contexts = [
        ("no context", Context::new()),
        ("tool only", context_from([("tool", "A".into())])),
        (
            "tool + temperature",
            context_from([("tool", "A".into()), ("temperature", 25.0.into())]),
        ),
        (
            "tool + temperature + coolant",
            context_from([
                ("tool", "A".into()),
                ("temperature", 25.0.into()),
                ("coolant", true.into()),
            ]),
        ),
    ];

    println!("{:<30} | {:>8} | {:>12} | {:>12}", "Context", "Weight", "|memory|", "|correction|");
    println!("{}", "-".repeat(72));

    for (label, context) in &contexts {
        // Fresh engine per context so history does not leak between rows
        let mut engine = CerebellumEngine::with_memory(5, config.clone(), memory.clone())?;
        let step = engine.compute_correction_detailed(
            CorrectionRequest::new(&measured, &home).context(context),
        )?;

        println!(
            "{:<30} | {:>8.2} | {:>12.3e} | {:>12.3e}",
            label,
            step.context_weight,
            vector::norm(&step.memory),
            vector::norm(&step.correction)
        );
    }

    println!("\nFar from any stored position:");
    let mut engine = CerebellumEngine::with_memory(5, config, memory)?;
    let far = [2.0, 2.0, 0.3, 10.0, 5.0];
    let step = engine.compute_correction_detailed(CorrectionRequest::new(&far, &home))?;
    println!("  memory outcome: {:?}", step.recall.source);
    println!("  saturated:      {}", step.saturated);
    println!("  |correction|:   {:.6}", vector::norm(&step.correction));

    Ok(())
}
