//! The media descriptor: identity, details cache and operations.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::command::{self, CutWindow};
use super::details::{self, SizeProbe};
use super::error::MediaError;
use super::options::{validate_extension, validate_options, OperationOptions};
use super::path::{self, ResolvedPath};
use super::strategy::TypeStrategy;
use super::tables::default_extension;
use super::types::{MediaDetails, MediaType, Operation, OperationOutput, ValidationResult};
use crate::engine::{
    CacheDirOutputProvider, EngineConfig, EngineError, Executor, FfmpegEngine, FfprobeEngine,
    MediaCommand, OutputLocationProvider, ProbeEngine,
};

/// The collaborators a descriptor talks to.
///
/// Clones share one probe lock: a narrow probe and the read of its output
/// happen under it, since the probe engine keeps a single last output.
#[derive(Clone)]
pub struct MediaEngines {
    pub executor: Executor,
    pub probe: Arc<dyn ProbeEngine>,
    pub output: Arc<dyn OutputLocationProvider>,
    probe_lock: Arc<Mutex<()>>,
}

impl MediaEngines {
    pub fn new(
        executor: Executor,
        probe: Arc<dyn ProbeEngine>,
        output: Arc<dyn OutputLocationProvider>,
    ) -> Self {
        Self {
            executor,
            probe,
            output,
            probe_lock: Arc::new(Mutex::new(())),
        }
    }

    /// ffmpeg, ffprobe and a cache-dir output provider built from config.
    pub fn from_config(config: &EngineConfig) -> Self {
        let executor = Executor::new(Arc::new(FfmpegEngine::new(config.clone())))
            .with_timeout(config.timeout_secs.map(Duration::from_secs));

        Self {
            executor,
            probe: Arc::new(FfprobeEngine::new(config.clone())),
            output: Arc::new(CacheDirOutputProvider::new(config.cache_dir.clone())),
            probe_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// A local or remote media file and the operations that can run on it.
///
/// Operations take `&mut self`: a descriptor runs one operation at a time.
pub struct MediaDescriptor {
    strategy: TypeStrategy,
    media_full_path: String,
    /// `None` when the path cannot be resolved to a file name.
    identity: Option<ResolvedPath>,
    media_details: Option<MediaDetails>,
    engines: MediaEngines,
}

impl std::fmt::Debug for MediaDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDescriptor")
            .field("media_type", &self.media_type())
            .field("media_full_path", &self.media_full_path)
            .field("identity", &self.identity)
            .field("has_details", &self.media_details.is_some())
            .finish()
    }
}

impl MediaDescriptor {
    /// Creates a descriptor. An unresolvable path is kept and reported by
    /// the first check instead of failing here.
    pub fn new(path: impl Into<String>, media_type: MediaType, engines: MediaEngines) -> Self {
        let mut descriptor = Self {
            strategy: TypeStrategy::for_type(media_type),
            media_full_path: String::new(),
            identity: None,
            media_details: None,
            engines,
        };
        descriptor.set_media_full_path(path);
        descriptor
    }

    pub fn media_type(&self) -> MediaType {
        self.strategy.media_type()
    }

    pub fn media_full_path(&self) -> &str {
        &self.media_full_path
    }

    /// File name without extension, `None` for an unresolvable path.
    pub fn filename(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.filename.as_str())
    }

    pub fn extension(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.extension.as_str())
            .unwrap_or_else(|| default_extension(self.media_type()))
    }

    pub fn is_remote_media(&self) -> Option<bool> {
        path::is_remote_media(&self.media_full_path)
    }

    /// Last successful details snapshot, without probing.
    pub fn cached_details(&self) -> Option<&MediaDetails> {
        self.media_details.as_ref()
    }

    pub fn engines(&self) -> &MediaEngines {
        &self.engines
    }

    /// Points the descriptor at another file.
    ///
    /// Identity is recomputed and cached details are dropped.
    pub fn set_media_full_path(&mut self, path: impl Into<String>) {
        self.media_full_path = path.into();
        self.media_details = None;
        self.identity = match path::resolve(&self.media_full_path, self.media_type()) {
            Ok(identity) => Some(identity),
            Err(e) => {
                debug!(path = %self.media_full_path, error = %e, "Unresolvable media path");
                None
            }
        };
    }

    /// Returns media details, probing unless a cached snapshot exists.
    ///
    /// `force` always probes. Any failure clears the cache.
    pub async fn get_details(&mut self, force: bool) -> Result<MediaDetails, MediaError> {
        if !force {
            if let Some(details) = &self.media_details {
                debug!(path = %self.media_full_path, "Details cache hit");
                return Ok(details.clone());
            }
        }

        match self.probe_details().await {
            Ok(details) => {
                self.media_details = Some(details.clone());
                Ok(details)
            }
            Err(e) => {
                warn!(path = %self.media_full_path, error = %e, "Failed to get media details");
                self.media_details = None;
                Err(e)
            }
        }
    }

    async fn probe_details(&self) -> Result<MediaDetails, MediaError> {
        let identity = self.identity.as_ref().ok_or(MediaError::IncorrectInputPath)?;
        let probe = &self.engines.probe;

        let narrow_output = {
            let _guard = self.engines.probe_lock.lock().await;
            let code = probe
                .execute(&command::size_probe(&self.media_full_path))
                .await
                .map_err(MediaError::Probe)?;
            if code != 0 {
                return Err(MediaError::Probe(EngineError::non_zero_exit(code, "")));
            }
            probe.last_command_output()
        };
        let narrow = SizeProbe::parse(&narrow_output).map_err(MediaError::Probe)?;

        let full = probe
            .get_media_information(&self.media_full_path)
            .await
            .map_err(MediaError::Probe)?;

        Ok(details::merge(identity, narrow, full))
    }

    async fn check_input(&mut self) -> Result<(), MediaError> {
        if self.identity.is_none() {
            return Err(MediaError::IncorrectInputPath);
        }
        self.get_details(false)
            .await
            .map(|_| ())
            .map_err(|_| MediaError::UnreadableInput)
    }

    /// Whether the path resolves and can be probed.
    pub async fn is_input_file_correct(&mut self) -> ValidationResult {
        let result = self.check_input().await.map(|_| None::<String>);
        ValidationResult::from(&result)
    }

    async fn validate(
        &mut self,
        options: &OperationOptions,
        operation: Operation,
    ) -> Result<(), MediaError> {
        self.strategy.ensure_supported(operation)?;
        self.check_input().await?;
        validate_options(options, operation, self.media_type())
    }

    /// Extension of the file an operation would write.
    pub fn output_extension(&self, options: &OperationOptions, operation: Operation) -> String {
        options.normalized_extension().unwrap_or_else(|| {
            self.strategy
                .default_output_extension(operation, self.extension())
        })
    }

    async fn resolve_output(
        &self,
        options: &OperationOptions,
        extension: &str,
    ) -> Result<String, MediaError> {
        if let Some(path) = options.output_file_path.as_deref() {
            if path.trim().is_empty() {
                return Err(MediaError::IncorrectOutputPath);
            }
            return Ok(path.to_string());
        }

        self.engines
            .output
            .generate_file(extension)
            .await
            .map_err(|e| MediaError::OutputGenerationFailed(e.to_string()))
    }

    /// Runs every pre-flight check for `operation`.
    ///
    /// With `needs_output_path` the output location is resolved too, using
    /// `extension_override` before the operation's default extension.
    pub async fn check_input_and_options(
        &mut self,
        options: &OperationOptions,
        operation: Operation,
        extension_override: Option<&str>,
        needs_output_path: bool,
    ) -> ValidationResult {
        let result = self
            .prepare(options, operation, extension_override, needs_output_path)
            .await;
        ValidationResult::from(&result)
    }

    async fn prepare(
        &mut self,
        options: &OperationOptions,
        operation: Operation,
        extension_override: Option<&str>,
        needs_output_path: bool,
    ) -> Result<Option<String>, MediaError> {
        self.validate(options, operation).await?;
        if !needs_output_path {
            return Ok(None);
        }
        let extension = match extension_override {
            Some(ext) => {
                validate_extension(ext, operation, self.media_type())?;
                ext.trim_start_matches('.').to_ascii_lowercase()
            }
            None => self.output_extension(options, operation),
        };
        self.resolve_output(options, &extension).await.map(Some)
    }

    async fn run(
        &self,
        operation: Operation,
        command: MediaCommand,
        output_file_path: String,
    ) -> Result<OperationOutput, MediaError> {
        info!(%operation, input = %self.media_full_path, output = %output_file_path, "Starting operation");

        let result = self
            .engines
            .executor
            .execute(&command)
            .await
            .map_err(MediaError::Execution)?;

        info!(%operation, return_code = result.return_code, elapsed_ms = result.elapsed_ms, "Operation finished");
        Ok(OperationOutput {
            output_file_path,
            return_code: result.return_code,
        })
    }

    async fn validate_and_resolve(
        &mut self,
        options: &OperationOptions,
        operation: Operation,
    ) -> Result<String, MediaError> {
        self.validate(options, operation).await?;
        let extension = self.output_extension(options, operation);
        self.resolve_output(options, &extension).await
    }

    /// Re-encodes at lower quality.
    pub async fn compress(
        &mut self,
        options: &OperationOptions,
    ) -> Result<OperationOutput, MediaError> {
        let output = self.validate_and_resolve(options, Operation::Compress).await?;
        let plan = self
            .strategy
            .compression_plan(options, self.media_details.as_ref())?;
        let command = command::compress(&self.media_full_path, &output, &plan);
        self.run(Operation::Compress, command, output).await
    }

    /// Remuxes or transcodes into another container.
    pub async fn convert_to(
        &mut self,
        options: &OperationOptions,
    ) -> Result<OperationOutput, MediaError> {
        let output = self.validate_and_resolve(options, Operation::ConvertTo).await?;
        let command = command::convert(&self.media_full_path, &output);
        self.run(Operation::ConvertTo, command, output).await
    }

    /// Copies the `from`..`to` range without re-encoding.
    pub async fn cut(&mut self, options: &OperationOptions) -> Result<OperationOutput, MediaError> {
        self.validate(options, Operation::Cut).await?;

        let duration_ms = self.media_details.as_ref().and_then(|d| d.duration_ms);
        let window = CutWindow::new(
            options.from.as_deref().unwrap_or_default(),
            options.to.as_deref().unwrap_or_default(),
            duration_ms,
        )?;

        let extension = self.output_extension(options, Operation::Cut);
        let output = self.resolve_output(options, &extension).await?;
        let command = command::cut(&self.media_full_path, &output, &window);
        self.run(Operation::Cut, command, output).await
    }

    /// Drops the video streams of a video file.
    pub async fn extract_audio(
        &mut self,
        options: &OperationOptions,
    ) -> Result<OperationOutput, MediaError> {
        let output = self
            .validate_and_resolve(options, Operation::ExtractAudio)
            .await?;
        let command = command::extract_audio(&self.media_full_path, &output);
        self.run(Operation::ExtractAudio, command, output).await
    }

    /// Scales the volume of an audio file by `rate`.
    pub async fn adjust_volume(
        &mut self,
        options: &OperationOptions,
    ) -> Result<OperationOutput, MediaError> {
        let output = self
            .validate_and_resolve(options, Operation::AdjustVolume)
            .await?;
        let rate = options.rate.ok_or_else(|| {
            MediaError::invalid_options("Incorrect option \"rate\". Please provide a non-negative number")
        })?;
        let command = command::adjust_volume(&self.media_full_path, &output, rate);
        self.run(Operation::AdjustVolume, command, output).await
    }
}

impl OperationOutput {
    /// Descriptor over the produced file, sharing the same collaborators.
    pub fn describe(&self, media_type: MediaType, engines: &MediaEngines) -> MediaDescriptor {
        MediaDescriptor::new(self.output_file_path.clone(), media_type, engines.clone())
    }
}
