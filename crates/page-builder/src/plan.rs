//! Turning a sheet into slides.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use slidershow_common::error::{SlidershowError, SlidershowResult};
use slidershow_media_cache::is_image;
use slidershow_timeline::{compile_row, Timeline};

use crate::locate::FilenameLocator;
use crate::row::{classify_row, RowKind};
use crate::sheet::Sheet;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaKind {
    Video(Timeline),
    /// Images ignore timeline commands; `start` is passed through verbatim.
    Image { start: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    Section,
    Media {
        comment: Option<String>,
        source: PathBuf,
        kind: MediaKind,
    },
    Text {
        comment: Option<String>,
        title: String,
        body: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Skip rows that fail to compile instead of aborting the sheet.
    pub keep_going: bool,
}

/// Slides of one sheet, in row order.
#[derive(Debug, Clone, Default)]
pub struct SheetPlan {
    pub name: String,
    pub slides: Vec<Slide>,
    /// Rows dropped because of errors (only with `keep_going`).
    pub skipped: usize,
}

impl SheetPlan {
    /// Distinct media sources in first-appearance order.
    pub fn media_sources(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        self.slides
            .iter()
            .filter_map(|slide| match slide {
                Slide::Media { source, .. } => Some(source.as_path()),
                _ => None,
            })
            .filter(|source| seen.insert(*source))
            .collect()
    }
}

/// Plan a sheet: classify rows until the first blank one, compile media
/// timelines and locate their files.
pub fn plan_sheet(
    sheet: &Sheet,
    locator: &FilenameLocator,
    options: &PlanOptions,
) -> SlidershowResult<SheetPlan> {
    let mut plan = SheetPlan {
        name: sheet.name.clone(),
        ..SheetPlan::default()
    };

    for (index, row) in sheet.rows.iter().enumerate() {
        // Row 1 is the header.
        let row_number = index + 2;

        let slide = match classify_row(row) {
            RowKind::End => {
                tracing::debug!(sheet = %sheet.name, row = row_number, "Early stop at blank row");
                break;
            }
            RowKind::Section => Ok(Slide::Section),
            RowKind::Media { filename } => {
                let source = locator.locate(filename);
                media_kind(filename, &source, row.start.as_deref(), &row.commands).map(|kind| {
                    Slide::Media {
                        comment: row.comment.clone(),
                        source,
                        kind,
                    }
                })
            }
            RowKind::Text { title, body } => Ok(Slide::Text {
                comment: row.comment.clone(),
                title: title.to_string(),
                body,
            }),
            RowKind::CommentOnly => Err(SlidershowError::sheet(format!(
                "Row {row_number} of sheet {} has a comment but nothing to show",
                sheet.name
            ))),
        };

        match slide {
            Ok(slide) => plan.slides.push(slide),
            Err(e) if options.keep_going => {
                tracing::error!(sheet = %sheet.name, row = row_number, error = %e, "Skipping row");
                plan.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(plan)
}

fn media_kind(
    filename: &str,
    source: &Path,
    start: Option<&str>,
    commands: &[Option<String>],
) -> SlidershowResult<MediaKind> {
    if is_image(source) {
        if commands.iter().any(Option::is_some) {
            tracing::warn!(filename, "Commands are ignored for images");
        }
        return Ok(MediaKind::Image {
            start: start.map(str::to_string),
        });
    }

    compile_row(start, commands)
        .map(MediaKind::Video)
        .map_err(|e| SlidershowError::timeline(filename, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::RawRow;

    fn sheet(rows: &[&[Option<&str>]]) -> Sheet {
        Sheet {
            name: "Main".to_string(),
            rows: rows
                .iter()
                .map(|cells| RawRow::from_cells(cells.iter().map(|c| c.map(str::to_string))))
                .collect(),
        }
    }

    #[test]
    fn test_plan_stops_at_blank_row() {
        let sheet = sheet(&[
            &[Some("SECTION")],
            &[None, Some("a.mp4"), None, Some("0"), Some("→60.5")],
            &[None, None, Some("Title"), Some("Body")],
            &[None, None, None, None],
            &[None, Some("after-end.mp4")],
        ]);
        let plan = plan_sheet(&sheet, &FilenameLocator::default(), &PlanOptions::default()).unwrap();

        assert_eq!(plan.slides.len(), 3);
        assert_eq!(plan.slides[0], Slide::Section);
        let Slide::Media { kind: MediaKind::Video(timeline), .. } = &plan.slides[1] else {
            panic!("expected video slide");
        };
        assert_eq!(timeline.points(), r#"[0, "goto:60.5"]"#);
        assert_eq!(
            plan.slides[2],
            Slide::Text {
                comment: None,
                title: "Title".to_string(),
                body: "Body".to_string()
            }
        );
    }

    #[test]
    fn test_images_ignore_commands() {
        let sheet = sheet(&[&[None, Some("photo.JPG"), Some("3"), Some("nonsense")]]);
        let plan = plan_sheet(&sheet, &FilenameLocator::default(), &PlanOptions::default()).unwrap();
        assert_eq!(
            plan.slides[0],
            Slide::Media {
                comment: None,
                source: PathBuf::from("photo.JPG"),
                kind: MediaKind::Image {
                    start: Some("3".to_string())
                },
            }
        );
    }

    #[test]
    fn test_compile_error_names_file() {
        let sheet = sheet(&[&[None, Some("bad.mp4"), None, Some("jump")]]);
        let err =
            plan_sheet(&sheet, &FilenameLocator::default(), &PlanOptions::default()).unwrap_err();
        match err {
            SlidershowError::Timeline { filename, message } => {
                assert_eq!(filename, "bad.mp4");
                assert!(message.contains("Unknown command jump"));
            }
            other => panic!("expected timeline error, got {other:?}"),
        }
    }

    #[test]
    fn test_keep_going_skips_bad_rows() {
        let sheet = sheet(&[
            &[None, Some("bad.mp4"), None, Some("5"), Some("10"), Some("M")],
            &[Some("orphan comment")],
            &[None, Some("good.mp4"), None, Some("5"), Some("M")],
        ]);
        let plan = plan_sheet(
            &sheet,
            &FilenameLocator::default(),
            &PlanOptions { keep_going: true },
        )
        .unwrap();
        assert_eq!(plan.skipped, 2);
        assert_eq!(plan.slides.len(), 1);
    }

    #[test]
    fn test_media_sources_are_distinct() {
        let sheet = sheet(&[
            &[None, Some("a.mp4"), None, Some("1")],
            &[None, Some("b.png")],
            &[None, Some("a.mp4"), None, Some("2")],
        ]);
        let plan = plan_sheet(&sheet, &FilenameLocator::default(), &PlanOptions::default()).unwrap();
        assert_eq!(
            plan.media_sources(),
            vec![Path::new("a.mp4"), Path::new("b.png")]
        );
    }
}
