//! Slidershow Timeline: the directive compiler.
//!
//! Turns the free-form command cells of one spreadsheet row into an
//! ordered list of `(moment, actions)` events for the player:
//! - **Time:** `"92.5"` stays text, `"1:32.2"` becomes `92.2` seconds
//! - **Split:** cells become atomic directives (`|` and `,` separate them,
//!   bracketed point literals stay whole)
//! - **Compile:** directives are classified by an ordered rule table and
//!   accumulated into timeline events
//!
//! This crate is pure computation with no I/O. Events keep row order and are
//! never sorted: a row may jump backward in time.

pub mod compile;
pub mod error;
pub mod split;
pub mod time;
pub mod token;

pub use compile::{classify, compile, rules, Rule};
pub use error::CompileError;
pub use split::split_directives;
pub use time::{normalize, Moment};
pub use token::{Timeline, TimelineEvent, Token};

/// Split and compile one row's `start` and command cells.
pub fn compile_row(
    start: Option<&str>,
    commands: &[Option<String>],
) -> Result<Timeline, CompileError> {
    let directives = split_directives(start, commands);
    tracing::debug!(?directives, "Compiling row");
    compile(&directives)
}
