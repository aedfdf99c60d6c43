//! In-place annotation of student submissions.
//!
//! The grading checks record their deductions directly inside the submitted
//! file: the feedback message is inserted as `# GRADER:` comment lines right
//! after the header (and docstring, if any) of the function under test,
//! followed by a line recording the deducted points. The same marker makes the
//! notes easy to strip again ([`cleanup_notes`]) and to tally into a final
//! score ([`tally`]).
//!
//! The target function is located in the file's syntax tree, so decorated
//! functions, multi-line signatures and methods inside classes all resolve to
//! the correct insertion line. The inserted lines copy the indentation of the
//! function body, keeping the annotated file syntactically valid.

mod annotation;
mod cleanup;
mod python;
mod tally;

use std::path::PathBuf;

use thiserror::Error;

pub use annotation::{annotate_file, annotate_function, AnnotateOutcome, RunningScore};
pub use cleanup::cleanup_notes;
pub use python::{find_function, has_syntax_errors, FunctionSite};
pub use tally::{append_tally_log, author_id, file_stem, tally, FileScore, UNKNOWN_AUTHOR_ID};

/// Marker prefixed to every feedback comment inserted by the grader.
pub const GRADER_TOKEN: &str = "# GRADER:";
/// Marker students use to declare their id inside the submission.
pub const AUTHOR_ID_TOKEN: &str = "# AUTHOR_ID:";

/// The errors that can occur while annotating or tallying a submission.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The submission cannot be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path of the offending file.
        path: PathBuf,
        /// Error from the filesystem.
        source: std::io::Error,
    },
    /// The submission cannot be written back.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Path of the offending file.
        path: PathBuf,
        /// Error from the filesystem.
        source: std::io::Error,
    },
    /// The tally log cannot be appended to.
    #[error("cannot append to the tally log {path}: {source}")]
    TallyLog {
        /// Path of the log file.
        path: PathBuf,
        /// Error from the filesystem.
        source: std::io::Error,
    },
}
