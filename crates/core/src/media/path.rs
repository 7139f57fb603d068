//! Derives file name, extension and locality from a path or URL.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use super::error::MediaError;
use super::tables::{default_extension, is_known_extension};
use super::types::MediaType;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\w+:)?//([^\s.]+\.\S{2}|localhost[:?\d]*)\S*$").expect("valid url regex")
});

/// Identity derived from a media path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// File name without its extension.
    pub filename: String,
    /// Lower-case registry extension, or the type default.
    pub extension: String,
    pub is_remote_media: Option<bool>,
}

/// Classifies a path as remote when its scheme contains `http`.
///
/// Returns `None` for an empty path.
pub fn is_remote_media(path: &str) -> Option<bool> {
    if path.trim().is_empty() {
        return None;
    }
    Some(
        path.split_once("://")
            .map(|(scheme, _)| scheme.contains("http"))
            .unwrap_or(false),
    )
}

pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Last path segment, extension included.
pub fn full_filename(path: &str) -> Result<&str, MediaError> {
    if is_remote_media(path) == Some(true) && !is_valid_url(path) {
        return Err(MediaError::IncorrectInputPath);
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    trimmed
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .ok_or(MediaError::IncorrectInputPath)
}

/// Splits `name.ext` on the last dot. No dot means no candidate extension.
fn split_extension(full_filename: &str) -> (&str, Option<&str>) {
    match full_filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (full_filename, None),
    }
}

/// Resolves a path for the given media type.
///
/// Unknown or missing extensions fall back to the type default instead of
/// failing.
pub fn resolve(path: &str, media_type: MediaType) -> Result<ResolvedPath, MediaError> {
    let full = full_filename(path)?;
    let (stem, candidate) = split_extension(full);

    let extension = match candidate {
        Some(ext) if is_known_extension(ext, media_type) => ext.to_ascii_lowercase(),
        other => {
            let fallback = default_extension(media_type);
            debug!(
                path,
                candidate = other.unwrap_or(""),
                fallback,
                "Unrecognized extension, using default"
            );
            fallback.to_string()
        }
    };

    Ok(ResolvedPath {
        filename: stem.to_string(),
        extension,
        is_remote_media: is_remote_media(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_with_known_extension() {
        let resolved = resolve("/storage/movies/holiday.mkv", MediaType::Video).unwrap();
        assert_eq!(resolved.filename, "holiday");
        assert_eq!(resolved.extension, "mkv");
        assert_eq!(resolved.is_remote_media, Some(false));
    }

    #[test]
    fn test_extension_is_lowercased() {
        let resolved = resolve("/music/Track.FLAC", MediaType::Audio).unwrap();
        assert_eq!(resolved.extension, "flac");
        assert_eq!(resolved.filename, "Track");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_default() {
        let video = resolve("/tmp/clip.xyz", MediaType::Video).unwrap();
        assert_eq!(video.extension, "mp4");
        assert_eq!(video.filename, "clip");

        // audio extension on a video descriptor is not in the video registry
        let mismatch = resolve("/tmp/song.mp3", MediaType::Video).unwrap();
        assert_eq!(mismatch.extension, "mp4");
    }

    #[test]
    fn test_missing_extension_falls_back_to_default() {
        let resolved = resolve("/tmp/recording", MediaType::Audio).unwrap();
        assert_eq!(resolved.extension, "mp3");
        assert_eq!(resolved.filename, "recording");
    }

    #[test]
    fn test_inner_dots_stay_in_filename() {
        let resolved = resolve("/tmp/my.summer.clip.mov", MediaType::Video).unwrap();
        assert_eq!(resolved.filename, "my.summer.clip");
        assert_eq!(resolved.extension, "mov");
    }

    #[test]
    fn test_trailing_slash_is_stripped_once() {
        let resolved = resolve("https://cdn.example.com/media/song.ogg/", MediaType::Audio).unwrap();
        assert_eq!(resolved.filename, "song");
        assert_eq!(resolved.extension, "ogg");
        assert_eq!(resolved.is_remote_media, Some(true));
    }

    #[test]
    fn test_bare_filename_resolves() {
        let resolved = resolve("clip.webm", MediaType::Video).unwrap();
        assert_eq!(resolved.filename, "clip");
        assert_eq!(resolved.extension, "webm");
    }

    #[test]
    fn test_empty_path_is_incorrect() {
        assert!(matches!(
            resolve("", MediaType::Video),
            Err(MediaError::IncorrectInputPath)
        ));
        assert!(matches!(
            resolve("/", MediaType::Video),
            Err(MediaError::IncorrectInputPath)
        ));
        assert_eq!(is_remote_media(""), None);
    }

    #[test]
    fn test_malformed_http_url_is_incorrect() {
        for url in ["http://", "https://nodot", "http://exa mple.com/a.mp4"] {
            assert!(
                matches!(resolve(url, MediaType::Video), Err(MediaError::IncorrectInputPath)),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_remote_classification_uses_scheme_only() {
        assert_eq!(is_remote_media("https://example.com/a.mp4"), Some(true));
        assert_eq!(is_remote_media("file:///sdcard/a.mp4"), Some(false));
        assert_eq!(is_remote_media("/sdcard/http/a.mp4"), Some(false));
        assert!(is_valid_url("http://localhost:8080/a.mp4"));
    }
}
