//! Slidershow Page Builder
//!
//! Everything around the directive compiler that turns a workbook into a
//! presentation page:
//! - **Sheet:** workbook loading (`.ods`, tab-separated text or JSON export)
//! - **Row:** end-of-sheet, section breaks, media and text rows
//! - **Locate:** filename rewriting and lookup in search directories
//! - **Plan:** compiled slides for one sheet
//! - **Render:** `<article>` fragments and the page template

pub mod locate;
pub mod plan;
pub mod render;
pub mod row;
pub mod sheet;

pub use locate::FilenameLocator;
pub use plan::{plan_sheet, MediaKind, PlanOptions, SheetPlan, Slide};
pub use render::{render_slides, sheet_output_path, Page, DEFAULT_TEMPLATE};
pub use row::{classify_row, RowKind};
pub use sheet::{RawRow, Sheet, Workbook};
