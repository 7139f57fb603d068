//! Command-line argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use mediatools_core::media::{MediaType, OperationOptions};

/// Media operations driven by ffmpeg
///
/// Every command prints its result as JSON on stdout. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "mediatools")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(long, env = "MEDIATOOLS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Media type of the input, inferred from its extension when omitted
    #[arg(long = "type", global = true)]
    pub media_type: Option<MediaType>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print probe details of a media file
    Details(DetailsArgs),
    /// Re-encode at lower quality
    Compress(CompressArgs),
    /// Convert to another container
    Convert(ConvertArgs),
    /// Copy a time range without re-encoding
    Cut(CutArgs),
    /// Extract the audio track of a video
    ExtractAudio(ConvertArgs),
    /// Scale the volume of an audio file
    AdjustVolume(AdjustVolumeArgs),
    /// Run a raw ffmpeg command line
    Exec(ExecArgs),
}

#[derive(Args, Debug)]
pub struct DetailsArgs {
    /// Input file path or URL
    pub input: String,

    /// Probe again even if details are cached
    #[arg(long)]
    pub force: bool,
}

/// Options shared by every mutating command
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Output extension
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Output file path (default: generated in the cache directory)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Options as a JSON object; flags take precedence
    #[arg(long)]
    pub options: Option<String>,

    /// Also print details of the input and the produced file
    #[arg(long)]
    pub compare: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file path or URL
    pub input: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input file path or URL
    pub input: String,

    /// low, medium or high
    #[arg(short, long)]
    pub quality: Option<String>,

    /// x264 preset, video only
    #[arg(short, long)]
    pub speed: Option<String>,

    /// Target bitrate such as 128k or 1.5M
    #[arg(short, long)]
    pub bitrate: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct CutArgs {
    /// Input file path or URL
    pub input: String,

    /// Start time (hh:mm:ss)
    #[arg(long)]
    pub from: String,

    /// End time (hh:mm:ss)
    #[arg(long)]
    pub to: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct AdjustVolumeArgs {
    /// Input file path or URL
    pub input: String,

    /// Volume multiplier, 1.0 keeps the level
    #[arg(short, long)]
    pub rate: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Command line passed to ffmpeg, e.g. '-i "in.mkv" "out.mp4"'
    pub line: String,
}

impl OutputArgs {
    /// Builds options from `--options` JSON, then applies the flags.
    pub fn to_options(&self) -> anyhow::Result<OperationOptions> {
        let mut options = match self.options.as_deref() {
            Some(raw) => {
                let value: serde_json::Value = serde_json::from_str(raw)?;
                OperationOptions::from_json(&value)?
            }
            None => OperationOptions::default(),
        };

        if let Some(extension) = &self.extension {
            options.extension = Some(extension.clone());
        }
        if let Some(output) = &self.output {
            options.output_file_path = Some(output.clone());
        }
        Ok(options)
    }
}

impl Commands {
    /// Input path of the command, `None` for `exec`.
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Details(a) => Some(a.input.as_str()),
            Self::Compress(a) => Some(a.input.as_str()),
            Self::Convert(a) | Self::ExtractAudio(a) => Some(a.input.as_str()),
            Self::Cut(a) => Some(a.input.as_str()),
            Self::AdjustVolume(a) => Some(a.input.as_str()),
            Self::Exec(_) => None,
        }
    }
}
