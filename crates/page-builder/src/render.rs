//! HTML assembly.

use std::path::{Path, PathBuf};

use slidershow_common::config::{PageConfig, DEFAULT_SLIDERSHOW_URL};
use slidershow_common::error::{SlidershowError, SlidershowResult};

use crate::plan::{MediaKind, Slide};

/// Page skeleton used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Slidershow</title>
    <script src="{slidershow_url}"></script>
</head>
<body>
<main>
{contents}
</main>
</body>
</html>
"#;

const CONTENTS_PLACEHOLDER: &str = "{contents}";
const URL_PLACEHOLDER: &str = "{slidershow_url}";

/// Render slides to `<article>` fragments, one per line.
///
/// `resolve` maps each media source to the path embedded in `data-src`
/// (for instance a converted cache entry).
pub fn render_slides(slides: &[Slide], mut resolve: impl FnMut(&Path) -> PathBuf) -> String {
    let mut lines = Vec::with_capacity(slides.len());
    let mut in_section = false;

    for slide in slides {
        match slide {
            Slide::Section => {
                if in_section {
                    lines.push("</section>".to_string());
                }
                lines.push("<section>".to_string());
                in_section = true;
            }
            Slide::Media {
                comment,
                source,
                kind,
            } => {
                push_comment(&mut lines, comment.as_deref());
                let src = escape_attr(&resolve(source).display().to_string());
                lines.push(match kind {
                    MediaKind::Video(timeline) => format!(
                        r#"<article data-video-points='[{}]'><video controls="controls" data-src="{src}"></video></article>"#,
                        timeline.points()
                    ),
                    MediaKind::Image { start: Some(start) } => format!(
                        r#"<article data-step-points='[{start}]'><img data-src="{src}" /></article>"#
                    ),
                    MediaKind::Image { start: None } => {
                        format!(r#"<article><img data-src="{src}" /></article>"#)
                    }
                });
            }
            Slide::Text {
                comment,
                title,
                body,
            } => {
                push_comment(&mut lines, comment.as_deref());
                lines.push(format!(
                    r#"<article class="main"><h1>{title}</h1><p>{body}</p></article>"#
                ));
            }
        }
    }

    if in_section {
        lines.push("</section>".to_string());
    }
    lines.join("\n")
}

fn push_comment(lines: &mut Vec<String>, comment: Option<&str>) {
    if let Some(comment) = comment {
        // `--` may not appear inside an HTML comment.
        lines.push(format!("<!-- {} -->", comment.replace("--", "- -")));
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Page template with its player script URL.
#[derive(Debug, Clone)]
pub struct Page {
    template: String,
    slidershow_url: String,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, DEFAULT_SLIDERSHOW_URL)
    }
}

impl Page {
    pub fn new(template: impl Into<String>, slidershow_url: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            slidershow_url: slidershow_url.into(),
        }
    }

    /// Read the configured template file, or use [`DEFAULT_TEMPLATE`].
    pub fn from_config(config: &PageConfig) -> SlidershowResult<Self> {
        let template = match &config.template {
            Some(path) => {
                if !path.exists() {
                    return Err(SlidershowError::FileNotFound { path: path.clone() });
                }
                std::fs::read_to_string(path)?
            }
            None => DEFAULT_TEMPLATE.to_string(),
        };
        Ok(Self::new(template, config.slidershow_url.clone()))
    }

    /// Substitute `contents` and the player URL into the template.
    pub fn render(&self, contents: &str) -> SlidershowResult<String> {
        if !self.template.contains(CONTENTS_PLACEHOLDER) {
            return Err(SlidershowError::template(format!(
                "Template has no {CONTENTS_PLACEHOLDER} placeholder"
            )));
        }
        Ok(self
            .template
            .replace(URL_PLACEHOLDER, &self.slidershow_url)
            .replace(CONTENTS_PLACEHOLDER, contents))
    }
}

/// Per-sheet output file: `talk.html` + `Intro` → `talk_Intro.html`.
pub fn sheet_output_path(output: &Path, sheet_name: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{stem}_{sheet_name}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{sheet_name}"),
    };
    output.with_file_name(name)
}
