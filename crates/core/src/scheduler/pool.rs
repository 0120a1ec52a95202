//! Worker pool sizing.

use serde::{Deserialize, Serialize};

/// Pool width for a batch of `file_count` files.
///
/// | files  | width |
/// |--------|-------|
/// | 0-10   | 5     |
/// | 11-20  | 8     |
/// | 21-40  | 10    |
/// | 41-60  | 15    |
/// | 61+    | 20    |
pub fn pool_width_for(file_count: usize) -> usize {
    match file_count {
        0..=10 => 5,
        11..=20 => 8,
        21..=40 => 10,
        41..=60 => 15,
        _ => 20,
    }
}

/// Sizing of the pool that runs one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Maximum conversion tasks running at once.
    pub width: usize,
}

impl WorkerPoolConfig {
    /// Sizes the pool from the number of eligible files.
    pub fn for_batch(file_count: usize) -> Self {
        Self {
            width: pool_width_for(file_count),
        }
    }
}
