//! Compiler failures. Each one aborts the row being compiled.

/// Why a row's directives could not be compiled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// A moment was opened and a new one began before any action.
    #[error("No action at moment before {directive} in {directives:?}")]
    DanglingMoment {
        directive: String,
        directives: Vec<String>,
    },

    /// A `time→time` directive while a standalone moment is open.
    #[error("Moment already defined, moment {moment} while processing {directive} in {directives:?}")]
    MomentConflict {
        moment: String,
        directive: String,
        directives: Vec<String>,
    },

    /// The directive matches no rule.
    #[error("Unknown command {directive} in {directives:?}")]
    UnknownDirective {
        directive: String,
        directives: Vec<String>,
    },
}

impl CompileError {
    /// The directive that triggered the failure.
    pub fn directive(&self) -> &str {
        match self {
            Self::DanglingMoment { directive, .. }
            | Self::MomentConflict { directive, .. }
            | Self::UnknownDirective { directive, .. } => directive,
        }
    }
}
