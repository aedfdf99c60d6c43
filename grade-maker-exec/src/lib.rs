//! Invocation of the external graders and discovery of the submissions.
//!
//! The actual checks live in an instructor-authored pytest suite: this crate
//! spawns it (and the formatter that normalizes the submissions before
//! grading), captures its output, and finds the files to grade, either loose
//! in a directory or packed in the archives the LMS exports.

mod archive;
mod discovery;
mod runner;

use std::path::PathBuf;

use thiserror::Error;

pub use archive::unpack_all;
pub use discovery::{list_submissions, submission_id, UNKNOWN_SUBMISSION_ID};
pub use runner::{Formatter, RunnerOutput, TestRunner};

/// The errors that can occur while running the external graders.
#[derive(Debug, Error)]
pub enum ExecError {
    /// An external command cannot be spawned at all.
    #[error("cannot launch '{command}': {source}")]
    Spawn {
        /// The command that failed to start.
        command: String,
        /// Error from the operating system.
        source: std::io::Error,
    },
    /// The formatter exited with an error.
    #[error("failed to format {path}:\n{stderr}")]
    Format {
        /// The file being formatted.
        path: PathBuf,
        /// What the formatter printed on stderr.
        stderr: String,
    },
    /// A directory or file cannot be accessed.
    #[error("cannot access {path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// Error from the filesystem.
        source: std::io::Error,
    },
    /// A submission archive is broken.
    #[error("invalid archive {path}: {source}")]
    Archive {
        /// Path of the archive.
        path: PathBuf,
        /// Error from the zip reader.
        source: zip::result::ZipError,
    },
}
