pub mod codec;
pub mod config;
pub mod estimate;
pub mod naming;
pub mod scheduler;
pub mod task;
pub mod testing;

pub use codec::{
    AudioBuffer, AudioCodec, CodecConfig, CodecError, Encoding, SourceFormat, StandardCodec,
    TargetFormat,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, OutputConfig,
    ReportFormat,
};
pub use estimate::{estimate_sizes, SizeEstimate};
pub use naming::resolve_output_path;
pub use scheduler::{
    pool_width_for, BatchError, BatchProgress, BatchReport, BatchScheduler, WorkerPoolConfig,
};
pub use task::{ConversionError, ConversionResult, ConversionTask, FileReport};
