use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "webm"];

/// Uploads above this size are refused. Default: 100 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// An uploaded file as announced by the caller, checked before any
/// aggregation starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    pub filename: String,
    pub size_bytes: u64,
}

impl MediaSource {
    pub fn new(filename: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            filename: filename.into(),
            size_bytes,
        }
    }

    pub fn validate(&self, max_upload_bytes: u64) -> Result<MediaKind> {
        if self.size_bytes == 0 {
            return Err(Error::InvalidMedia {
                reason: format!("{} is empty", self.filename),
            });
        }
        if self.size_bytes > max_upload_bytes {
            return Err(Error::InvalidMedia {
                reason: format!(
                    "{} is {} bytes, limit is {max_upload_bytes}",
                    self.filename, self.size_bytes
                ),
            });
        }
        self.kind().ok_or_else(|| Error::InvalidMedia {
            reason: format!("{} is not a supported image or video", self.filename),
        })
    }

    pub fn kind(&self) -> Option<MediaKind> {
        // A bare ".mp4" is a stem without an extension.
        let extension = Path::new(&self.filename).extension()?.to_str()?;
        let extension = extension.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(MediaSource::new("gate.JPG", 10).kind(), Some(MediaKind::Image));
        assert_eq!(MediaSource::new("shift.mp4", 10).kind(), Some(MediaKind::Video));
        assert_eq!(MediaSource::new("README", 10).kind(), None);
    }

    #[test]
    fn test_bare_extension_is_rejected() {
        assert_eq!(MediaSource::new(".mp4", 10).kind(), None);
        assert!(matches!(
            MediaSource::new(".jpg", 10).validate(DEFAULT_MAX_UPLOAD_BYTES),
            Err(Error::InvalidMedia { .. })
        ));
        assert_eq!(MediaSource::new("a.mp4", 10).kind(), Some(MediaKind::Video));
    }

    #[test]
    fn test_executable_upload_is_rejected() {
        let result = MediaSource::new("abc.exe", 9).validate(DEFAULT_MAX_UPLOAD_BYTES);

        assert!(matches!(result, Err(Error::InvalidMedia { .. })));
    }

    #[test]
    fn test_large_upload_is_rejected() {
        let source = MediaSource::new("large.mp4", 105 * 1024 * 1024);

        assert!(source.validate(DEFAULT_MAX_UPLOAD_BYTES).is_err());
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        assert!(MediaSource::new("empty.png", 0).validate(DEFAULT_MAX_UPLOAD_BYTES).is_err());
    }
}
