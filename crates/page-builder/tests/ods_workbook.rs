//! Reading an OpenDocument spreadsheet with several sheets.

use std::path::PathBuf;

use slidershow_page_builder::{plan_sheet, FilenameLocator, PlanOptions, Slide, Workbook};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/talk.ods")
}

#[test]
fn test_every_sheet_is_read_in_order() {
    let workbook = Workbook::open(&fixture()).unwrap();
    let names: Vec<_> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Intro", "Outro"]);
}

#[test]
fn test_numeric_cells_read_as_written() {
    let workbook = Workbook::open(&fixture()).unwrap();
    let intro = workbook.sheet("Intro").unwrap();
    assert_eq!(intro.rows.len(), 3);

    assert_eq!(intro.rows[0].comment.as_deref(), Some("SECTION"));
    assert!(!intro.rows[0].has_commands());

    let clip = &intro.rows[1];
    assert_eq!(clip.comment.as_deref(), Some("opening"));
    assert_eq!(clip.filename.as_deref(), Some("clip.mp4"));
    assert_eq!(clip.start.as_deref(), Some("12"));
    assert_eq!(
        clip.commands.iter().flatten().map(String::as_str).collect::<Vec<_>>(),
        vec!["30.5", "rate 2", "45"]
    );

    let text = &intro.rows[2];
    assert_eq!(text.filename, None);
    assert_eq!(text.start.as_deref(), Some("Welcome"));
}

#[test]
fn test_unused_first_column_keeps_column_positions() {
    let workbook = Workbook::open(&fixture()).unwrap();
    let outro = workbook.sheet("Outro").unwrap();
    assert_eq!(outro.rows.len(), 1);

    let row = &outro.rows[0];
    assert_eq!(row.comment, None);
    assert_eq!(row.filename.as_deref(), Some("end.mp4"));
    assert_eq!(row.start.as_deref(), Some("1:30"));
    assert_eq!(
        row.commands.iter().flatten().map(String::as_str).collect::<Vec<_>>(),
        vec!["95", "M"]
    );
}

#[test]
fn test_spreadsheet_sheet_plans_like_any_other() {
    let workbook = Workbook::open(&fixture()).unwrap();
    let intro = workbook.sheet("Intro").unwrap();
    let plan = plan_sheet(intro, &FilenameLocator::default(), &PlanOptions::default()).unwrap();

    assert_eq!(plan.skipped, 0);
    assert!(matches!(plan.slides[0], Slide::Section));
    assert!(matches!(plan.slides[1], Slide::Media { .. }));
    assert!(matches!(plan.slides[2], Slide::Text { .. }));
}
