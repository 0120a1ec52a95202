//! Task module: converting one input file into its requested encodings.
//!
//! A [`ConversionTask`] decodes an input once and writes one output per
//! requested encoding next to it, naming each output with
//! [`crate::naming::resolve_output_path`]. Failures are captured in the
//! returned [`FileReport`] instead of being propagated.

mod conversion;
mod error;
mod types;

pub use conversion::ConversionTask;
pub use error::ConversionError;
pub use types::{ConversionOutcome, ConversionRequest, ConversionResult, FileReport};
