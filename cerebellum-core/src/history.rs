//! Bounded FIFO History for Rolling Engine State
//!
//! ## Overview
//!
//! The engine keeps the last `variance_window` error and state vectors. This
//! module provides the ring buffer that holds them. Capacity and vector
//! dimension are fixed when the buffer is created; all slot storage is
//! allocated up front so pushing in the control loop never allocates.
//!
//! ## Layout
//!
//! One contiguous `Vec<f64>` of `capacity * dim` values, addressed in slots:
//!
//! ```text
//! HistoryBuffer (capacity = 4, dim = 2):
//! ┌───────┬───────┬───────┬───────┐
//! │ s0 s0 │ s1 s1 │ s2 s2 │ s3 s3 │  ← slots
//! └───────┴───────┴───────┴───────┘
//!            ↑
//!            └── write_pos: next slot to overwrite
//! ```
//!
//! When full, a push overwrites the oldest slot (strict FIFO eviction).
//! Iteration always runs oldest to newest.
//!
//! ```rust
//! use cerebellum_core::history::HistoryBuffer;
//!
//! let mut history = HistoryBuffer::new(3, 2);
//! for i in 0..5 {
//!     history.push(&[i as f64, 0.0]);
//! }
//! let firsts: Vec<f64> = history.iter().map(|v| v[0]).collect();
//! assert_eq!(firsts, vec![2.0, 3.0, 4.0]);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::vector;

/// Fixed-capacity ring of equal-length vectors
///
/// ## Internal Invariants
///
/// - `write_pos < capacity`
/// - `len <= capacity`
/// - `data.len() == capacity * dim`
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    /// Slot storage, `capacity * dim` values
    data: Vec<f64>,

    /// Length of each stored vector
    dim: usize,

    /// Maximum number of vectors retained
    capacity: usize,

    /// Slot where the next write will occur
    write_pos: usize,

    /// Current number of valid slots
    len: usize,
}

impl HistoryBuffer {
    /// Creates an empty buffer of `capacity` vectors of length `dim`
    ///
    /// A zero capacity is raised to one; the engine rejects a zero window
    /// before ever reaching here.
    pub fn new(capacity: usize, dim: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![0.0; capacity * dim],
            dim,
            capacity,
            write_pos: 0,
            len: 0,
        }
    }

    /// Appends a vector, evicting the oldest when full
    ///
    /// `sample.len()` must equal the buffer dimension.
    pub fn push(&mut self, sample: &[f64]) {
        debug_assert_eq!(sample.len(), self.dim);
        let start = self.write_pos * self.dim;
        self.data[start..start + self.dim].copy_from_slice(sample);
        self.write_pos = (self.write_pos + 1) % self.capacity;

        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Maximum number of stored vectors
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed vector
    pub fn last(&self) -> Option<&[f64]> {
        if self.is_empty() {
            return None;
        }
        let idx = if self.write_pos == 0 { self.capacity - 1 } else { self.write_pos - 1 };
        Some(self.slot(idx))
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> HistoryIter<'_> {
        HistoryIter {
            buffer: self,
            index: 0,
        }
    }

    /// Componentwise mean of the stored vectors, `None` when empty
    pub fn mean(&self) -> Option<Vec<f64>> {
        vector::mean(self.dim, self.iter())
    }

    /// Drop all stored vectors
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Vector at logical index (0 = oldest, len-1 = newest)
    ///
    /// When full, the oldest vector sits at `write_pos`:
    ///
    /// ```text
    /// Physical slots: [D, E, A, B, C]  (write_pos = 2)
    /// Logical view:   [A, B, C, D, E]
    /// ```
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        if index >= self.len {
            return None;
        }

        let physical = if self.len < self.capacity {
            index
        } else {
            (self.write_pos + index) % self.capacity
        };

        Some(self.slot(physical))
    }

    fn slot(&self, physical: usize) -> &[f64] {
        let start = physical * self.dim;
        &self.data[start..start + self.dim]
    }
}

/// Iterator over history contents, oldest first
pub struct HistoryIter<'a> {
    buffer: &'a HistoryBuffer,
    index: usize,
}

impl<'a> Iterator for HistoryIter<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HistoryIter<'_> {}
