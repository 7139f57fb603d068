pub mod config;
pub mod engine;
pub mod media;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LoggingConfig,
};
pub use engine::{
    CacheDirOutputProvider, EngineConfig, EngineError, ExecutionEngine, ExecutionResult, Executor,
    FfmpegEngine, FfprobeEngine, MediaCommand, MediaInformation, OutputLocationProvider,
    ProbeEngine, StreamInformation,
};
pub use media::{
    MediaDescriptor, MediaDetails, MediaEngines, MediaError, MediaType, Operation,
    OperationOptions, OperationOutput, ValidationResult,
};
