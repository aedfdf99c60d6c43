//! Tool that tallies the deductions recorded in some submissions.

use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;

use grade_maker_annotate::{append_tally_log, file_stem, tally};

#[derive(Parser, Debug)]
pub struct TallyOpt {
    /// The files to tally
    #[clap(required = true)]
    pub files: Vec<PathBuf>,

    /// The score each file starts from, before the deductions
    #[clap(short, long, default_value_t = 100.0)]
    pub starting_points: f64,

    /// Append a timestamped CSV row per file to this log
    #[clap(short, long)]
    pub output_file: Option<PathBuf>,
}

pub fn main_tally(opt: TallyOpt) -> Result<(), Error> {
    for file in &opt.files {
        let score = tally(file, opt.starting_points)?;
        println!(
            "{:<30}, author_id: {:<20}, total: {}",
            file_stem(file),
            score.author_id,
            score.total
        );
        if let Some(log) = &opt.output_file {
            append_tally_log(log, file, &score)?;
        }
    }
    Ok(())
}
