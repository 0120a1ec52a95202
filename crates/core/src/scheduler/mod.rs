//! Scheduler module: concurrent conversion of a whole directory.
//!
//! The batch flow is:
//! 1. List eligible files ([`scan_eligible_files`])
//! 2. Size the pool from the file count ([`pool_width_for`])
//! 3. Dispatch one [`crate::task::ConversionTask`] per file and wait for all
//!
//! Results come back in completion order. Nothing is cancelled and there is
//! no per-file timeout.

mod batch;
mod error;
mod pool;
mod scan;
mod types;

pub use batch::BatchScheduler;
pub use error::BatchError;
pub use pool::{pool_width_for, WorkerPoolConfig};
pub use scan::{is_eligible, scan_eligible_files};
pub use types::{BatchProgress, BatchReport};
