//! Test harness for integration testing
//!
//! Provides:
//! - Named test runner with pass/fail and timing records
//! - Deterministic random numbers
//! - Tolerance assertions for scalars and vectors

use std::time::Instant;

/// Test result tracking
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: &'static str,
    pub passed: bool,
    pub duration_us: u64,
    pub error_message: Option<String>,
}

/// Test harness for running integration tests
#[derive(Default)]
pub struct TestHarness {
    results: Vec<TestResult>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a single test case
    pub fn run_test<F>(&mut self, name: &'static str, test_fn: F)
    where
        F: FnOnce() -> Result<(), String>,
    {
        let start = Instant::now();
        let result = test_fn();

        self.results.push(TestResult {
            name,
            passed: result.is_ok(),
            duration_us: start.elapsed().as_micros() as u64,
            error_message: result.err(),
        });
    }

    /// Print test results summary
    pub fn print_summary(&self) {
        let passed = self.results.iter().filter(|r| r.passed).count();
        println!("{}/{} passed", passed, self.results.len());

        for result in self.results.iter().filter(|r| !r.passed) {
            println!(
                "  FAILED {} ({} us): {}",
                result.name,
                result.duration_us,
                result.error_message.as_deref().unwrap_or("")
            );
        }
    }

    pub fn all_passed(&self) -> bool {
        self.print_summary();
        self.results.iter().all(|r| r.passed)
    }
}

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

#[macro_export]
macro_rules! assert_vec_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let actual: &[f64] = &$actual;
        let expected: &[f64] = &$expected;
        assert_eq!(actual.len(), expected.len(), "Vector lengths differ");
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            if (a - e).abs() > $tolerance {
                panic!(
                    "Component {} value {} not within tolerance {} of expected {}",
                    i, a, $tolerance, e
                );
            }
        }
    };
}

/// Deterministic random number generator for tests
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        // Xorshift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / 16777216.0
    }

    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    pub fn gen_vec(&mut self, dim: usize, min: f64, max: f64) -> Vec<f64> {
        (0..dim).map(|_| self.gen_range(min, max)).collect()
    }
}
