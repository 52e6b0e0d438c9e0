//! Cache identity derived from file metadata.

use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};

/// Length of the hex key embedded in cache file names.
pub const KEY_LEN: usize = 16;

/// Identity key of a source file: name, size and modification time.
///
/// Editing a file in place changes its key, so a stale cached copy is
/// never served for it.
pub fn file_meta_key(path: &Path) -> io::Result<String> {
    let meta = std::fs::metadata(path)?;
    let modified = meta
        .modified()?
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    if let Some(name) = path.file_name() {
        hasher.update(name.to_string_lossy().as_bytes());
    }
    hasher.update(meta.len().to_le_bytes());
    hasher.update(modified.as_secs().to_le_bytes());
    hasher.update(modified.subsec_nanos().to_le_bytes());

    let digest = hasher.finalize();
    Ok(digest[..KEY_LEN / 2]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect())
}

pub fn is_key(text: &str) -> bool {
    text.len() == KEY_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_stable_and_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.hevc");
        std::fs::write(&path, b"frames").unwrap();

        let first = file_meta_key(&path).unwrap();
        let second = file_meta_key(&path).unwrap();
        assert_eq!(first, second);
        assert!(is_key(&first));
    }

    #[test]
    fn test_key_changes_with_content_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.hevc");
        std::fs::write(&path, b"frames").unwrap();
        let before = file_meta_key(&path).unwrap();

        std::fs::write(&path, b"more frames").unwrap();
        let after = file_meta_key(&path).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(file_meta_key(Path::new("/definitely/not/here.heic")).is_err());
    }
}
