//! Error types shared across slidershow crates.

use std::path::PathBuf;

/// Top-level error type for slidershow operations.
#[derive(Debug, thiserror::Error)]
pub enum SlidershowError {
    #[error("Sheet error: {message}")]
    Sheet { message: String },

    #[error("Timeline error in {filename}: {message}")]
    Timeline { filename: String, message: String },

    #[error("Transcode error: {message}")]
    Transcode { message: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SlidershowError.
pub type SlidershowResult<T> = Result<T, SlidershowError>;

impl SlidershowError {
    pub fn sheet(msg: impl Into<String>) -> Self {
        Self::Sheet {
            message: msg.into(),
        }
    }

    /// Attach the originating media filename to a compiler failure.
    pub fn timeline(filename: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Timeline {
            filename: filename.into(),
            message: err.to_string(),
        }
    }

    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode {
            message: msg.into(),
        }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_error_names_file() {
        let err = SlidershowError::timeline("clip.mp4", "Unknown command X");
        assert_eq!(
            err.to_string(),
            "Timeline error in clip.mp4: Unknown command X"
        );
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SlidershowError = io.into();
        assert_eq!(err.to_string(), "gone");
    }
}
