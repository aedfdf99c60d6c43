//! Tool that strips the grader notes from some submissions.

use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;

use grade_maker_annotate::cleanup_notes;

#[derive(Parser, Debug)]
pub struct CleanupOpt {
    /// The files to clean
    #[clap(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn main_cleanup(opt: CleanupOpt) -> Result<(), Error> {
    for file in &opt.files {
        cleanup_notes(file)?;
        info!("cleaned {}", file.display());
    }
    Ok(())
}
