//! Situational context
//!
//! Context is free-form metadata about the current operating situation: the
//! tool in the spindle, the payload on the gripper, altitude and airspeed.
//! It is forwarded to the memory collaborator as part of the query and
//! modulates how strongly a remembered bias is applied.
//!
//! ## Context Weight
//!
//! ```text
//! weighting disabled          → 1.0
//! enabled, no/empty context   → 0.5
//! enabled, n entries          → min(1.0, 0.5 + 0.1·n)
//! ```
//!
//! The weight counts entries; it does not measure how well the stored
//! episode's context matches the current one.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::constants::{CONTEXT_WEIGHT_BASE, CONTEXT_WEIGHT_NEUTRAL, CONTEXT_WEIGHT_PER_ENTRY};

/// Single context value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ContextValue {
    /// Numeric quantity (payload kg, altitude ft, temperature °C)
    Number(f64),
    /// On/off condition
    Flag(bool),
    /// Label (tool id, operating mode)
    Text(String),
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Context mapping, ordered by key so memory backends see a stable layout
pub type Context = BTreeMap<String, ContextValue>;

/// Build a context from key/value pairs
///
/// ```rust
/// use cerebellum_core::context::context_from;
///
/// let ctx = context_from([("tool", "A".into()), ("temperature", 25.0.into())]);
/// assert_eq!(ctx.len(), 2);
/// ```
pub fn context_from<I, K>(entries: I) -> Context
where
    I: IntoIterator<Item = (K, ContextValue)>,
    K: Into<String>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Weight applied to the memory term for the given context
pub fn context_weight(enabled: bool, context: Option<&Context>) -> f64 {
    if !enabled {
        return CONTEXT_WEIGHT_NEUTRAL;
    }

    match context {
        Some(ctx) if !ctx.is_empty() => {
            (CONTEXT_WEIGHT_BASE + CONTEXT_WEIGHT_PER_ENTRY * ctx.len() as f64).min(1.0)
        }
        _ => CONTEXT_WEIGHT_BASE,
    }
}
