//! Read-through, write-on-miss conversion cache.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use slidershow_common::config::ConvertConfig;
use slidershow_common::error::SlidershowResult;

use crate::format::{conversion_for, Conversion, ConversionKind};
use crate::identity::{file_meta_key, is_key};
use crate::locks::KeyedLocks;
use crate::transcode::{FfmpegTranscoder, Transcoder};

/// Outcome of resolving one media path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Conversion is disabled; the input is used as is.
    Disabled,
    /// The source does not exist; nothing to convert.
    Missing,
    /// The format is already browser-compatible.
    NotNeeded,
    /// A cached copy already existed.
    CacheHit(PathBuf),
    /// A cached copy was generated now.
    Generated(PathBuf),
    /// No cached copy and generation is off; the input is used as is.
    Advisory,
}

impl Resolution {
    /// The path to embed for a source at `original`.
    pub fn path<'a>(&'a self, original: &'a Path) -> &'a Path {
        match self {
            Self::CacheHit(path) | Self::Generated(path) => path,
            _ => original,
        }
    }
}

/// Conversion cache over a directory.
pub struct MediaCache {
    config: ConvertConfig,
    transcoder: Arc<dyn Transcoder>,
    locks: KeyedLocks,
}

impl std::fmt::Debug for MediaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MediaCache {
    /// Create a cache. When enabled, the cache directory is created if needed.
    pub fn new(config: ConvertConfig, transcoder: Arc<dyn Transcoder>) -> SlidershowResult<Self> {
        if config.enable && !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir)?;
        }
        Ok(Self {
            config,
            transcoder,
            locks: KeyedLocks::new(),
        })
    }

    /// Create a cache backed by [`FfmpegTranscoder`].
    pub fn with_ffmpeg(config: ConvertConfig) -> SlidershowResult<Self> {
        Self::new(config, Arc::new(FfmpegTranscoder::default()))
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Cache location for `source` converted to `suffix` (with dot).
    pub fn cached_path(&self, source: &Path, suffix: &str) -> SlidershowResult<PathBuf> {
        let key = file_meta_key(source)?;
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.config.cache_dir.join(format!("{name}.{key}{suffix}")))
    }

    /// Path to embed for `path`. Never fails: conversion errors are logged
    /// and the original path is kept.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match self.try_resolve(path) {
            Ok(resolution) => resolution.path(path).to_path_buf(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Conversion failed, keeping original"
                );
                path.to_path_buf()
            }
        }
    }

    /// Resolve `path`, reporting what happened.
    pub fn try_resolve(&self, path: &Path) -> SlidershowResult<Resolution> {
        if !self.config.enable {
            return Ok(Resolution::Disabled);
        }
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Filename does not exist");
            return Ok(Resolution::Missing);
        }

        let Some(conversion) = conversion_for(path, self.config.check_mp4_for_hevc, |p| {
            self.transcoder.probe_video_codec(p)
        }) else {
            return Ok(Resolution::NotNeeded);
        };

        let cached = self.cached_path(path, conversion.suffix)?;
        let slot = self.locks.slot(&cached);
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if cached.exists() {
            tracing::debug!(source = %path.display(), cached = %cached.display(), "Cache hit");
            return Ok(Resolution::CacheHit(cached));
        }
        if !self.config.autogenerate {
            tracing::debug!(source = %path.display(), "Cache miss, autogenerate off");
            return Ok(Resolution::Advisory);
        }

        self.generate(path, &cached, conversion)
    }

    fn generate(
        &self,
        source: &Path,
        cached: &Path,
        conversion: Conversion,
    ) -> SlidershowResult<Resolution> {
        let parent = cached.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        // Unique per writer: another process may be converting the same key.
        let partial = tempfile::Builder::new()
            .prefix(&partial_prefix(cached, conversion.suffix))
            .suffix(conversion.suffix)
            .tempfile_in(parent)?;

        tracing::info!(
            source = %source.display(),
            target = %cached.display(),
            kind = ?conversion.kind,
            "Converting media"
        );
        let start = Instant::now();

        match conversion.kind {
            ConversionKind::Image => self.transcoder.convert_image(source, partial.path())?,
            ConversionKind::Video => self.transcoder.convert_video(source, partial.path())?,
        }
        make_readable(partial.path())?;

        match partial.persist_noclobber(cached) {
            Ok(_) => {
                tracing::info!(
                    target = %cached.display(),
                    elapsed_secs = start.elapsed().as_secs_f64(),
                    "Conversion complete"
                );
                Ok(Resolution::Generated(cached.to_path_buf()))
            }
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists || cached.exists() => {
                tracing::debug!(
                    target = %cached.display(),
                    "Entry committed by another writer, discarding ours"
                );
                Ok(Resolution::CacheHit(cached.to_path_buf()))
            }
            Err(e) => Err(e.error.into()),
        }
    }
}

/// Name prefix of the temporary output; the random part and `.part`
/// marker keep it from ever parsing as an entry.
fn partial_prefix(cached: &Path, suffix: &str) -> String {
    let name = cached
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(suffix).unwrap_or(&name);
    format!("{stem}.part-")
}

/// Temporary files are created owner-only; entries are served to browsers.
#[cfg(unix)]
fn make_readable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn make_readable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// One converted file in the cache directory.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub path: PathBuf,
    /// Name of the source file the entry was converted from.
    pub original_name: String,
    pub key: String,
    pub suffix: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Enumerate cache entries in `cache_dir`, ignoring unrelated files.
pub fn list_entries(cache_dir: &Path) -> SlidershowResult<Vec<CacheEntry>> {
    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(cache_dir)? {
        let dir_entry = dir_entry?;
        let meta = dir_entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let file_name = dir_entry.file_name().to_string_lossy().into_owned();
        let Some((original_name, key, suffix)) = parse_entry_name(&file_name) else {
            continue;
        };
        entries.push(CacheEntry {
            path: dir_entry.path(),
            original_name,
            key,
            suffix,
            size_bytes: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn parse_entry_name(file_name: &str) -> Option<(String, String, String)> {
    let (rest, ext) = file_name.rsplit_once('.')?;
    if !matches!(ext, "jpg" | "mp4") {
        return None;
    }
    let (original, key) = rest.rsplit_once('.')?;
    if original.is_empty() || !is_key(key) {
        return None;
    }
    Some((original.to_string(), key.to_string(), format!(".{ext}")))
}
