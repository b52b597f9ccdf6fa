//! Nearest-episode reference memory
//!
//! An in-process [`EpisodicMemory`] for simulation, benches and tests. It
//! stands in for a real hippocampal store with the simplest retrieval that
//! honours the contract:
//!
//! 1. Every stored episode within `radius` (Euclidean) of the query is a
//!    candidate.
//! 2. Candidates are returned nearest first.
//! 3. Each candidate's confidence is attenuated by distance:
//!    `confidence / (1 + distance)`.
//!
//! Context is accepted but not used for matching.
//!
//! The store is behind a `RwLock` so a controller can keep writing episodes
//! while an engine holding the same [`MemoryHandle`](super::MemoryHandle)
//! reads from it. Every write leaves the episode list valid, so a lock
//! poisoned by a panicking writer is recovered everywhere rather than
//! reported.
//!
//! ```rust
//! use std::sync::Arc;
//! use cerebellum_core::{NearestBiasMemory, EpisodicMemory, Context};
//!
//! let memory = Arc::new(NearestBiasMemory::new());
//! memory.store(&[1.0, 0.5, 0.3, 10.0, 5.0], &[0.001, 0.002, 0.0, 0.0, 0.0], 0.9);
//!
//! let records = memory.retrieve(&[1.0005, 0.501, 0.3, 10.0, 5.0], &Context::new()).unwrap();
//! assert_eq!(records.len(), 1);
//! assert!(records[0].confidence.unwrap() < 0.9);
//! ```

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{EpisodicMemory, MemoryError, MemoryRecord};
use crate::{constants::DEFAULT_RECALL_RADIUS, context::Context, vector};

/// One stored episode
#[derive(Debug, Clone)]
struct Episode {
    key: Vec<f64>,
    bias: Vec<f64>,
    confidence: f64,
}

/// Radius-limited nearest-neighbour episodic memory
#[derive(Debug)]
pub struct NearestBiasMemory {
    episodes: RwLock<Vec<Episode>>,
    radius: f64,
}

impl Default for NearestBiasMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl NearestBiasMemory {
    /// Empty memory with the default recall radius (0.1)
    pub fn new() -> Self {
        Self::with_radius(DEFAULT_RECALL_RADIUS)
    }

    /// Empty memory with a custom recall radius
    pub fn with_radius(radius: f64) -> Self {
        Self {
            episodes: RwLock::new(Vec::new()),
            radius: radius.abs(),
        }
    }

    /// Record the bias observed at `key`
    ///
    /// Storing at a key that is already present replaces that episode.
    /// Confidence is clamped into [0, 1].
    pub fn store(&self, key: &[f64], bias: &[f64], confidence: f64) {
        let episode = Episode {
            key: key.to_vec(),
            bias: bias.to_vec(),
            confidence: confidence.clamp(0.0, 1.0),
        };

        let mut episodes = self.write();
        match episodes.iter_mut().find(|e| e.key.as_slice() == key) {
            Some(existing) => *existing = episode,
            None => episodes.push(episode),
        }
    }

    /// Number of stored episodes
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every episode
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Recall radius in state units
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Episode>> {
        self.episodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Episode>> {
        self.episodes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EpisodicMemory for NearestBiasMemory {
    fn retrieve(&self, state: &[f64], _context: &Context) -> Result<Vec<MemoryRecord>, MemoryError> {
        let episodes = self.read();

        let mut candidates: Vec<(f64, &Episode)> = episodes
            .iter()
            .filter(|e| e.key.len() == state.len())
            .map(|e| (vector::norm(&vector::sub(state, &e.key)), e))
            .filter(|(distance, _)| *distance < self.radius)
            .collect();

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(candidates
            .into_iter()
            .map(|(distance, e)| {
                MemoryRecord::with_confidence(e.bias.clone(), e.confidence / (1.0 + distance))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_memory_returns_nothing() {
        let memory = NearestBiasMemory::new();
        assert!(memory.is_empty());
        assert!(memory.retrieve(&[0.0, 0.0], &Context::new()).unwrap().is_empty());
    }

    #[test]
    fn exact_key_keeps_full_confidence() {
        let memory = NearestBiasMemory::new();
        memory.store(&[1.0, 2.0], &[0.1, 0.2], 0.9);

        let records = memory.retrieve(&[1.0, 2.0], &Context::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bias, vec![0.1, 0.2]);
        assert_eq!(records[0].confidence, Some(0.9));
    }

    #[test]
    fn outside_radius_is_not_recalled() {
        let memory = NearestBiasMemory::with_radius(0.1);
        memory.store(&[0.0, 0.0], &[1.0, 1.0], 0.9);
        assert!(memory.retrieve(&[0.2, 0.0], &Context::new()).unwrap().is_empty());
    }

    #[test]
    fn nearest_episode_first() {
        let memory = NearestBiasMemory::with_radius(1.0);
        memory.store(&[0.5, 0.0], &[5.0, 5.0], 0.9);
        memory.store(&[0.1, 0.0], &[1.0, 1.0], 0.9);
        memory.store(&[0.3, 0.0], &[3.0, 3.0], 0.9);

        let records = memory.retrieve(&[0.0, 0.0], &Context::new()).unwrap();
        let firsts: Vec<f64> = records.iter().map(|r| r.bias[0]).collect();
        assert_eq!(firsts, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn confidence_decays_with_distance() {
        let memory = NearestBiasMemory::with_radius(1.0);
        memory.store(&[0.0], &[1.0], 0.8);

        let near = memory.retrieve(&[0.1], &Context::new()).unwrap()[0].confidence.unwrap();
        let far = memory.retrieve(&[0.5], &Context::new()).unwrap()[0].confidence.unwrap();
        assert!((near - 0.8 / 1.1).abs() < 1e-12);
        assert!(far < near);
    }

    #[test]
    fn storing_same_key_replaces_episode() {
        let memory = NearestBiasMemory::new();
        memory.store(&[1.0], &[0.1], 0.5);
        memory.store(&[1.0], &[0.2], 0.7);
        assert_eq!(memory.len(), 1);

        let records = memory.retrieve(&[1.0], &Context::new()).unwrap();
        assert_eq!(records[0].bias, vec![0.2]);
    }

    #[test]
    fn poisoned_store_keeps_working() {
        use std::sync::Arc;

        let memory = Arc::new(NearestBiasMemory::new());
        memory.store(&[0.0], &[0.1], 0.9);

        let writer = Arc::clone(&memory);
        let result = std::thread::spawn(move || {
            let _guard = writer.episodes.write().unwrap();
            panic!("writer failed mid-update");
        })
        .join();
        assert!(result.is_err());
        assert!(memory.episodes.is_poisoned());

        assert_eq!(memory.len(), 1);
        assert_eq!(memory.retrieve(&[0.0], &Context::new()).unwrap().len(), 1);

        memory.store(&[1.0], &[0.2], 0.9);
        assert_eq!(memory.len(), 2);

        memory.clear();
        assert!(memory.is_empty());
    }

    #[test]
    fn mismatched_keys_are_skipped() {
        let memory = NearestBiasMemory::new();
        memory.store(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0], 0.9);
        assert!(memory.retrieve(&[0.0, 0.0], &Context::new()).unwrap().is_empty());
    }
}
