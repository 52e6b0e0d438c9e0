//! External transcoding tools.
//!
//! Conversions shell out to `ffmpeg`/`ffprobe` for video and
//! `heif-convert` (libheif) for HEIC photos.

use std::path::Path;
use std::process::{Command, Stdio};

use slidershow_common::error::{SlidershowError, SlidershowResult};

/// Probing and conversion backend used by the cache.
pub trait Transcoder: Send + Sync {
    /// Codec name of the first video stream (`"hevc"`, `"h264"`, ...).
    fn probe_video_codec(&self, path: &Path) -> Option<String>;

    /// Convert a photo to a browser-compatible JPEG at `target`.
    fn convert_image(&self, source: &Path, target: &Path) -> SlidershowResult<()>;

    /// Convert a video to an H.264/AAC MP4 at `target`.
    fn convert_video(&self, source: &Path, target: &Path) -> SlidershowResult<()>;
}

/// [`Transcoder`] backed by command-line tools on `PATH`.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub heif_convert: String,

    /// x264 constant rate factor.
    pub crf: u8,

    /// JPEG quality passed to `heif-convert`.
    pub jpeg_quality: u8,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            heif_convert: "heif-convert".to_string(),
            crf: 20,
            jpeg_quality: 92,
        }
    }
}

/// Availability of one external tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub fix_instructions: Option<String>,
}

impl FfmpegTranscoder {
    /// Report which of the external tools can be found.
    pub fn check_tools(&self) -> Vec<ToolStatus> {
        vec![
            tool_status(
                &self.ffmpeg,
                "Video conversion to H.264 MP4",
                "Install ffmpeg: sudo apt install ffmpeg",
            ),
            tool_status(
                &self.ffprobe,
                "Codec detection inside .mp4 files",
                "ffprobe ships with ffmpeg: sudo apt install ffmpeg",
            ),
            tool_status(
                &self.heif_convert,
                "HEIC photo conversion to JPEG",
                "Install libheif tools: sudo apt install libheif-examples",
            ),
        ]
    }

    fn video_args(&self, source: &Path, target: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            source.display().to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            "medium".to_string(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            "192k".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            target.display().to_string(),
        ]
    }
}

impl Transcoder for FfmpegTranscoder {
    fn probe_video_codec(&self, path: &Path) -> Option<String> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=codec_name",
                "-of",
                "csv=p=0",
            ])
            .arg(path)
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let raw = String::from_utf8(output.stdout).ok()?;
        let codec = raw.lines().next()?.trim();
        if codec.is_empty() {
            return None;
        }
        Some(codec.to_string())
    }

    fn convert_image(&self, source: &Path, target: &Path) -> SlidershowResult<()> {
        let quality = self.jpeg_quality.to_string();
        let mut cmd = Command::new(&self.heif_convert);
        cmd.args(["-q", quality.as_str()]).arg(source).arg(target);
        run_tool(&self.heif_convert, cmd)
    }

    fn convert_video(&self, source: &Path, target: &Path) -> SlidershowResult<()> {
        let args = self.video_args(source, target);
        tracing::debug!(args = ?args, "Running ffmpeg");
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(&args);
        run_tool(&self.ffmpeg, cmd)
    }
}

fn run_tool(name: &str, mut cmd: Command) -> SlidershowResult<()> {
    let start = std::time::Instant::now();
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| SlidershowError::transcode(format!("Failed to start {name}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SlidershowError::transcode(format!(
            "{name} failed (status {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    tracing::debug!(
        tool = name,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "External tool finished"
    );
    Ok(())
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn tool_status(binary: &str, description: &str, fix: &str) -> ToolStatus {
    let available = command_exists(binary);
    ToolStatus {
        name: binary.to_string(),
        description: description.to_string(),
        available,
        fix_instructions: if !available {
            Some(fix.to_string())
        } else {
            None
        },
    }
}
