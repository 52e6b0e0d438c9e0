//! Source format dispatch.

use std::path::Path;

/// Suffixes treated as still images rather than video.
pub const IMAGE_SUFFIXES: &[&str] = &[
    ".jpg", ".jpeg", ".jxl", ".png", ".gif", ".avif", ".webp", ".heic",
];

/// What kind of transcode a source needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Image,
    Video,
}

/// A needed conversion and the suffix of its output (with dot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub kind: ConversionKind,
    pub suffix: &'static str,
}

/// Lower-cased suffix with its dot, e.g. `".heic"`.
pub fn suffix_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

pub fn is_image(path: &Path) -> bool {
    suffix_of(path).is_some_and(|suffix| IMAGE_SUFFIXES.contains(&suffix.as_str()))
}

/// Decide whether `path` needs converting.
///
/// `.mp4` is a compatible container that may still carry HEVC; `probe` is
/// only called for it, and only when `check_mp4_for_hevc` is set.
pub fn conversion_for(
    path: &Path,
    check_mp4_for_hevc: bool,
    probe: impl FnOnce(&Path) -> Option<String>,
) -> Option<Conversion> {
    match suffix_of(path)?.as_str() {
        ".heic" => Some(Conversion {
            kind: ConversionKind::Image,
            suffix: ".jpg",
        }),
        ".hevc" => Some(Conversion {
            kind: ConversionKind::Video,
            suffix: ".mp4",
        }),
        ".mp4" if check_mp4_for_hevc => {
            let codec = probe(path)?;
            (codec == "hevc").then_some(Conversion {
                kind: ConversionKind::Video,
                suffix: ".mp4",
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_probe(_: &Path) -> Option<String> {
        panic!("probe should not run")
    }

    #[test]
    fn test_heic_becomes_jpg() {
        let conversion = conversion_for(Path::new("/a/IMG_1.HEIC"), true, no_probe).unwrap();
        assert_eq!(conversion.kind, ConversionKind::Image);
        assert_eq!(conversion.suffix, ".jpg");
    }

    #[test]
    fn test_hevc_becomes_mp4() {
        let conversion = conversion_for(Path::new("clip.hevc"), true, no_probe).unwrap();
        assert_eq!(conversion.kind, ConversionKind::Video);
        assert_eq!(conversion.suffix, ".mp4");
    }

    #[test]
    fn test_mp4_depends_on_probed_codec() {
        let hevc = conversion_for(Path::new("a.mp4"), true, |_| Some("hevc".into()));
        assert!(hevc.is_some());
        let h264 = conversion_for(Path::new("a.mp4"), true, |_| Some("h264".into()));
        assert!(h264.is_none());
        let unknown = conversion_for(Path::new("a.mp4"), true, |_| None);
        assert!(unknown.is_none());
        assert!(conversion_for(Path::new("a.mp4"), false, no_probe).is_none());
    }

    #[test]
    fn test_compatible_formats_pass() {
        assert!(conversion_for(Path::new("a.webm"), true, no_probe).is_none());
        assert!(conversion_for(Path::new("a.jpg"), true, no_probe).is_none());
        assert!(conversion_for(Path::new("noext"), true, no_probe).is_none());
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("x/photo.JPG")));
        assert!(is_image(Path::new("photo.heic")));
        assert!(!is_image(Path::new("clip.mp4")));
        assert!(!is_image(Path::new("README")));
    }
}
