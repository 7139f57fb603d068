//! Builds the engine command line for each operation.

use tracing::debug;

use super::error::MediaError;
use super::strategy::CompressionPlan;
use super::time::{millis_to_time, time_to_millis};
use crate::engine::MediaCommand;

/// Start and length of a cut, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutWindow {
    pub from_ms: u64,
    pub to_ms: u64,
}

impl CutWindow {
    /// Validates `from`/`to` against each other and the known duration.
    pub fn new(from: &str, to: &str, duration_ms: Option<u64>) -> Result<Self, MediaError> {
        let from_ms = time_to_millis(from).ok_or_else(|| {
            MediaError::invalid_cut_range(format!("Incorrect cut start \"{}\"", from))
        })?;
        let to_ms = time_to_millis(to).ok_or_else(|| {
            MediaError::invalid_cut_range(format!("Incorrect cut end \"{}\"", to))
        })?;

        if to_ms <= from_ms {
            return Err(MediaError::invalid_cut_range(format!(
                "Incorrect cut range. \"to\" ({}) must be later than \"from\" ({})",
                to, from
            )));
        }

        if let Some(duration) = duration_ms {
            if from_ms > duration || to_ms > duration {
                return Err(MediaError::invalid_cut_range(format!(
                    "Incorrect cut range. Media duration is {}",
                    millis_to_time(duration)
                )));
            }
        }

        Ok(Self { from_ms, to_ms })
    }

    pub fn duration_ms(&self) -> u64 {
        self.to_ms - self.from_ms
    }
}

/// `-ss <from> -i "<in>" -to <duration> -c copy "<out>"`
pub fn cut(input: &str, output: &str, window: &CutWindow) -> MediaCommand {
    MediaCommand::new()
        .arg("-ss")
        .arg(millis_to_time(window.from_ms))
        .arg("-i")
        .quoted(input)
        .arg("-to")
        .arg(millis_to_time(window.duration_ms()))
        .arg("-c")
        .arg("copy")
        .quoted(output)
}

/// `-i "<in>" "<out>"`
pub fn convert(input: &str, output: &str) -> MediaCommand {
    MediaCommand::new().arg("-i").quoted(input).quoted(output)
}

pub fn compress(input: &str, output: &str, plan: &CompressionPlan) -> MediaCommand {
    let command = MediaCommand::new().arg("-i").quoted(input);

    let command = match plan {
        CompressionPlan::Video {
            crf,
            preset,
            bitrate,
        } => {
            let command = command
                .arg("-c:v")
                .arg("libx264")
                .arg("-crf")
                .arg(crf.to_string())
                .arg("-preset")
                .arg(preset.as_str());
            match bitrate {
                Some(bitrate) => command.arg("-b:v").arg(bitrate),
                None => command,
            }
        }
        CompressionPlan::Audio { bitrate } => command.arg("-b:a").arg(bitrate),
    };

    debug!(?plan, "Compression plan");
    command.quoted(output)
}

/// `-i "<in>" -vn "<out>"`
pub fn extract_audio(input: &str, output: &str) -> MediaCommand {
    MediaCommand::new()
        .arg("-i")
        .quoted(input)
        .arg("-vn")
        .quoted(output)
}

/// `-i "<in>" -filter:a "volume=<rate>" "<out>"`
pub fn adjust_volume(input: &str, output: &str, rate: f64) -> MediaCommand {
    MediaCommand::new()
        .arg("-i")
        .quoted(input)
        .arg("-filter:a")
        .quoted(format!("volume={}", rate))
        .quoted(output)
}

/// Narrow probe for size and first video stream dimensions.
pub fn size_probe(input: &str) -> MediaCommand {
    MediaCommand::new()
        .arg("-i")
        .quoted(input)
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("format=size")
        .arg("-show_entries")
        .arg("stream=size,width,height")
        .arg("-of")
        .arg("json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::tables::Preset;

    #[test]
    fn test_cut_command() {
        let window = CutWindow::new("00:00:10", "00:01:30", Some(120_000)).unwrap();
        assert_eq!(window.duration_ms(), 80_000);
        assert_eq!(
            cut("/in.mp4", "/out.mp4", &window).to_string(),
            "-ss 00:00:10 -i \"/in.mp4\" -to 00:01:20 -c copy \"/out.mp4\""
        );
    }

    #[test]
    fn test_cut_rejects_reversed_or_empty_range() {
        let err = CutWindow::new("00:01:00", "00:00:30", None).unwrap_err();
        assert!(matches!(err, MediaError::InvalidCutRange(_)));

        let err = CutWindow::new("00:00:30", "00:00:30", None).unwrap_err();
        assert!(matches!(err, MediaError::InvalidCutRange(_)));
    }

    #[test]
    fn test_cut_rejects_bounds_beyond_duration() {
        let err = CutWindow::new("00:00:10", "00:02:00", Some(90_000)).unwrap_err();
        assert!(err.to_string().contains("00:01:30"));

        // exactly the duration is fine
        assert!(CutWindow::new("00:00:00", "00:01:30", Some(90_000)).is_ok());
        // unknown duration skips the bound check
        assert!(CutWindow::new("00:00:10", "10:00:00", None).is_ok());
    }

    #[test]
    fn test_convert_and_extract_commands() {
        assert_eq!(
            convert("/in.mkv", "/out.mp4").to_string(),
            "-i \"/in.mkv\" \"/out.mp4\""
        );
        assert_eq!(
            extract_audio("/in.mkv", "/out.mp3").to_string(),
            "-i \"/in.mkv\" -vn \"/out.mp3\""
        );
    }

    #[test]
    fn test_compress_commands() {
        let video = CompressionPlan::Video {
            crf: 28,
            preset: Preset::Fast,
            bitrate: Some("1M".to_string()),
        };
        assert_eq!(
            compress("/in.mp4", "/out.mp4", &video).to_string(),
            "-i \"/in.mp4\" -c:v libx264 -crf 28 -preset fast -b:v 1M \"/out.mp4\""
        );

        let audio = CompressionPlan::Audio {
            bitrate: "96k".to_string(),
        };
        assert_eq!(
            compress("/in.mp3", "/out.mp3", &audio).to_string(),
            "-i \"/in.mp3\" -b:a 96k \"/out.mp3\""
        );
    }

    #[test]
    fn test_adjust_volume_command() {
        assert_eq!(
            adjust_volume("/in.wav", "/out.wav", 1.5).to_string(),
            "-i \"/in.wav\" -filter:a \"volume=1.5\" \"/out.wav\""
        );
        assert_eq!(
            adjust_volume("/in.wav", "/out.wav", 2.0).args()[3],
            "volume=2"
        );
    }

    #[test]
    fn test_size_probe_command() {
        assert_eq!(
            size_probe("/in.mp4").to_string(),
            "-i \"/in.mp4\" -v error -select_streams v:0 -show_entries format=size -show_entries stream=size,width,height -of json"
        );
    }
}
