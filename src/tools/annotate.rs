//! Tool that inserts a feedback note inside a submission.
//!
//! The instructor suites shell out to this tool when a check fails: the note
//! lands inside the function under test (or at the end of the file) and the
//! deducted points are recorded with it, ready to be tallied.

use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;

use grade_maker_annotate::{annotate_file, annotate_function, AnnotateOutcome, RunningScore};

#[derive(Parser, Debug)]
pub struct AnnotateOpt {
    /// The submission to annotate
    #[clap(short, long)]
    pub file: PathBuf,

    /// The function the note refers to
    ///
    /// Without it the note is appended at the end of the file.
    #[clap(long)]
    pub function: Option<String>,

    /// The feedback message, possibly multi-line
    #[clap(short, long)]
    pub message: String,

    /// How many points the failed check deducts
    #[clap(short, long)]
    pub points: f64,
}

pub fn main_annotate(opt: AnnotateOpt) -> Result<(), Error> {
    let mut score = RunningScore::new(0.0);
    match &opt.function {
        Some(function) => {
            let outcome =
                annotate_function(&opt.file, function, &opt.message, opt.points, &mut score)?;
            if outcome == AnnotateOutcome::TargetNotFound {
                // visible even without RUST_LOG, the suite wants to know
                eprintln!(
                    "function '{}' not found in {}, nothing was recorded",
                    function,
                    opt.file.display()
                );
            }
        }
        None => annotate_file(&opt.file, &opt.message, opt.points, &mut score)?,
    }
    Ok(())
}
