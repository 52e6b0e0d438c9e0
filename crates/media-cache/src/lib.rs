//! Slidershow Media Cache
//!
//! Browsers play neither HEIC photos nor HEVC video reliably. Given a media
//! path, [`MediaCache::resolve`] returns a browser-compatible equivalent,
//! transcoding into a cache directory on first use.
//!
//! # Layout
//!
//! ```text
//! <cache_dir>/<original-name>.<identity-key><suffix>
//! e.g.  /tmp/IMG_0042.heic.3f9a0c1e5b7d2a44.jpg
//! ```
//!
//! The identity key is derived from file metadata, so a modified source
//! gets a fresh entry under the same name. Entries are never evicted.

pub mod cache;
pub mod format;
pub mod identity;
pub mod locks;
pub mod transcode;

pub use cache::{list_entries, CacheEntry, MediaCache, Resolution};
pub use format::{conversion_for, is_image, Conversion, ConversionKind, IMAGE_SUFFIXES};
pub use identity::file_meta_key;
pub use transcode::{FfmpegTranscoder, ToolStatus, Transcoder};
