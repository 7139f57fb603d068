mod args;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediatools_core::{
    load_config,
    media::{MediaDescriptor, MediaEngines, MediaType, OperationOutput, AUDIO_EXTENSIONS},
    validate_config, Config, ConfigError, Executor, LoggingConfig,
};

use args::{Cli, Commands, OutputArgs};

/// Config file looked up when neither `--config` nor `MEDIATOOLS_CONFIG` is set
const DEFAULT_CONFIG_PATH: &str = "mediatools.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = load(cli.config.clone())?;
    init_logging(&config.logging);

    let engines = MediaEngines::from_config(&config.engine);
    let executor = engines.executor.clone();
    let media_type = cli
        .media_type
        .unwrap_or_else(|| cli.command.input().map(infer_media_type).unwrap_or(MediaType::Video));

    let operation = execute(cli.command, media_type, engines);
    let value = until_interrupted(operation, signal::ctrl_c(), &executor).await?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Drives `operation` until it finishes or `interrupt` fires.
///
/// On interrupt the executor is cancelled and the operation dropped, which
/// kills a running child whatever phase the operation was in.
async fn until_interrupted<F, I>(operation: F, interrupt: I, executor: &Executor) -> Result<Value>
where
    F: Future<Output = Result<Value>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = operation => result,
        _ = interrupt => {
            warn!("Interrupted, cancelling running operation");
            executor.cancel();
            Err(anyhow!("Interrupted"))
        }
    }
}

/// Loads configuration. A missing default file means built-in defaults.
fn load(explicit: Option<PathBuf>) -> Result<Config> {
    let config = match explicit {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => match load_config(&PathBuf::from(DEFAULT_CONFIG_PATH)) {
            Ok(config) => config,
            Err(ConfigError::FileNotFound(_)) => Config::default(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))
            }
        },
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Audio when the extension is a known audio one, video otherwise.
fn infer_media_type(input: &str) -> MediaType {
    let extension = input
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => MediaType::Audio,
        _ => MediaType::Video,
    }
}

async fn execute(command: Commands, media_type: MediaType, engines: MediaEngines) -> Result<Value> {
    match command {
        Commands::Details(args) => {
            let mut descriptor = MediaDescriptor::new(args.input, media_type, engines);
            let details = descriptor.get_details(args.force).await?;
            Ok(serde_json::to_value(details)?)
        }
        Commands::Compress(args) => {
            let mut options = args.output.to_options()?;
            if args.quality.is_some() {
                options.quality = args.quality;
            }
            if args.speed.is_some() {
                options.speed = args.speed;
            }
            if args.bitrate.is_some() {
                options.bitrate = args.bitrate;
            }
            let mut descriptor = MediaDescriptor::new(args.input, media_type, engines);
            let output = descriptor.compress(&options).await?;
            report(&mut descriptor, output, media_type, &args.output).await
        }
        Commands::Convert(args) => {
            let options = args.output.to_options()?;
            let mut descriptor = MediaDescriptor::new(args.input, media_type, engines);
            let output = descriptor.convert_to(&options).await?;
            report(&mut descriptor, output, media_type, &args.output).await
        }
        Commands::Cut(args) => {
            let options = args.output.to_options()?.with_range(args.from, args.to);
            let mut descriptor = MediaDescriptor::new(args.input, media_type, engines);
            let output = descriptor.cut(&options).await?;
            report(&mut descriptor, output, media_type, &args.output).await
        }
        Commands::ExtractAudio(args) => {
            let options = args.output.to_options()?;
            let mut descriptor = MediaDescriptor::new(args.input, media_type, engines);
            let output = descriptor.extract_audio(&options).await?;
            report(&mut descriptor, output, MediaType::Audio, &args.output).await
        }
        Commands::AdjustVolume(args) => {
            let options = args.output.to_options()?.with_rate(args.rate);
            let mut descriptor = MediaDescriptor::new(args.input, media_type, engines);
            let output = descriptor.adjust_volume(&options).await?;
            report(&mut descriptor, output, media_type, &args.output).await
        }
        Commands::Exec(args) => {
            let result = engines.executor.execute_line(&args.line).await?;
            Ok(serde_json::to_value(result)?)
        }
    }
}

/// Operation output, with before/after details when `--compare` is set.
async fn report(
    input: &mut MediaDescriptor,
    output: OperationOutput,
    output_type: MediaType,
    args: &OutputArgs,
) -> Result<Value> {
    info!(output = %output.output_file_path, "Wrote output");

    if !args.compare {
        return Ok(serde_json::to_value(output)?);
    }

    let before = input.get_details(false).await?;
    let after = output
        .describe(output_type, input.engines())
        .get_details(true)
        .await?;

    Ok(json!({
        "output": output,
        "before": before,
        "after": after,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediatools_core::testing::MockExecutionEngine;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_parse_compress() {
        let cli = Cli::try_parse_from([
            "mediatools",
            "compress",
            "/movies/a.mkv",
            "--quality",
            "low",
            "--speed",
            "fast",
            "-o",
            "/out/a.mkv",
        ])
        .unwrap();

        match cli.command {
            Commands::Compress(args) => {
                assert_eq!(args.input, "/movies/a.mkv");
                assert_eq!(args.quality.as_deref(), Some("low"));
                assert_eq!(args.speed.as_deref(), Some("fast"));
                assert_eq!(args.output.output.as_deref(), Some("/out/a.mkv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_type_and_config() {
        let cli = Cli::try_parse_from([
            "mediatools",
            "details",
            "https://cdn.example.com/stream",
            "--type",
            "audio",
            "--config",
            "/etc/mediatools.toml",
        ])
        .unwrap();

        assert_eq!(cli.media_type, Some(MediaType::Audio));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/mediatools.toml")));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let result = Cli::try_parse_from(["mediatools", "details", "/a.mp4", "--type", "image"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cut_requires_bounds() {
        assert!(Cli::try_parse_from(["mediatools", "cut", "/a.mp4", "--from", "00:00:01"]).is_err());

        let cli = Cli::try_parse_from([
            "mediatools",
            "cut",
            "/a.mp4",
            "--from",
            "00:00:01",
            "--to",
            "00:00:09",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Cut(_)));
    }

    #[test]
    fn test_output_args_merge_json_and_flags() {
        let args = OutputArgs {
            extension: Some("webm".to_string()),
            options: Some(r#"{"extension": "mkv", "outputFilePath": "/x.mkv"}"#.to_string()),
            ..Default::default()
        };
        let options = args.to_options().unwrap();
        assert_eq!(options.extension.as_deref(), Some("webm"));
        assert_eq!(options.output_file_path.as_deref(), Some("/x.mkv"));

        let args = OutputArgs {
            options: Some("[1, 2]".to_string()),
            ..Default::default()
        };
        assert!(args.to_options().is_err());
    }

    #[test]
    fn test_infer_media_type() {
        assert_eq!(infer_media_type("/music/track.FLAC"), MediaType::Audio);
        assert_eq!(infer_media_type("/movies/a.mkv"), MediaType::Video);
        assert_eq!(infer_media_type("https://example.com/stream"), MediaType::Video);
        assert_eq!(infer_media_type("/weird.dir/file"), MediaType::Video);
    }

    #[tokio::test]
    async fn test_interrupt_before_execution_returns_immediately() {
        let engine = Arc::new(MockExecutionEngine::new());
        let executor = Executor::new(engine.clone());

        let result = until_interrupted(
            std::future::pending::<Result<Value>>(),
            async { Ok::<(), std::io::Error>(()) },
            &executor,
        )
        .await;

        assert_eq!(result.unwrap_err().to_string(), "Interrupted");
        assert_eq!(engine.cancel_count(), 2);
    }

    #[tokio::test]
    async fn test_interrupt_drops_running_operation() {
        let engine = Arc::new(MockExecutionEngine::new());
        engine.set_execution_duration(Duration::from_secs(30)).await;
        let executor = Executor::new(engine.clone());

        let operation = {
            let executor = executor.clone();
            async move {
                let result = executor.execute_line("-i \"/a.mkv\" \"/b.mp4\"").await?;
                Ok::<Value, anyhow::Error>(serde_json::to_value(result)?)
            }
        };
        let interrupt = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<(), std::io::Error>(())
        };

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            until_interrupted(operation, interrupt, &executor),
        )
        .await
        .expect("interrupt should end the operation");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_default_config_falls_back() {
        // no mediatools.toml in the crate directory
        let config = load(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        assert!(load(Some(PathBuf::from("/nonexistent/mediatools.toml"))).is_err());
    }
}
