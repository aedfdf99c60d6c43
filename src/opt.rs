use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Grade every submission of one or more folders against the instructor's
/// test suite.
#[derive(Parser, Debug)]
#[clap(name = "grade-maker", version)]
pub struct Opt {
    /// Directory with the submissions to grade.
    ///
    /// More than one directory can be passed, comma separated; each one is
    /// graded by its own worker and gets its own summary.csv.
    #[clap(short = 'f', long = "folder")]
    pub folder: String,

    /// File with the instructor test suite to run against each submission.
    #[clap(short = 't', long = "tests")]
    pub tests: PathBuf,

    /// The instructor's reference solution.
    ///
    /// It is graded before the submissions as a sanity check: if it does not
    /// reach the full starting score the suite itself is broken and the
    /// folder is not graded.
    #[clap(short = 'e', long = "example-solution")]
    pub example_solution: PathBuf,

    /// What to do when a summary.csv already exists in a folder.
    #[clap(long, value_enum, default_value_t = SummaryStrategy::Overwrite)]
    pub summary_strategy: SummaryStrategy,

    /// The score each submission starts from, before the deductions.
    #[clap(short = 's', long, default_value_t = 100.0)]
    pub starting_points: f64,

    /// Do not print the per-file score lines.
    #[clap(short, long)]
    pub quiet: bool,

    /// Append a JSON line per graded file to this run log.
    #[clap(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Keep the grader notes of a previous run instead of stripping them
    /// before grading.
    #[clap(long)]
    pub keep_notes: bool,

    /// Only strip the grader notes, without grading anything.
    #[clap(short = 'C', long)]
    pub cleanup_only: bool,

    /// Reformat each submission with the formatter before grading.
    #[clap(short = 'b', long)]
    pub format_solution: bool,

    /// Abort on a failing test process instead of scoring the submission 0.
    ///
    /// The suite is expected to record deductions and keep going; a failing
    /// run usually means the submission crashed the collection phase.
    #[clap(long)]
    pub strict: bool,

    /// Command used to run the test suite.
    #[clap(long, default_value = "py.test")]
    pub runner: String,

    /// Command used to reformat the submissions.
    #[clap(long, default_value = "black")]
    pub formatter: String,

    /// The number of worker threads. Defaults to one per CPU core, capped by
    /// the number of folders.
    #[clap(long = "num-threads")]
    pub num_threads: Option<usize>,

    #[clap(flatten)]
    pub logger: LoggerOpt,
}

/// What to do with a summary.csv left from a previous run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStrategy {
    /// Delete the old summary and start over.
    Overwrite,
    /// Keep the old rows and append the new ones.
    Append,
    /// Refuse to grade the folder.
    Cancel,
}

#[derive(Parser, Debug, Clone)]
pub struct LoggerOpt {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl LoggerOpt {
    /// Configure the global logger based on the verbosity level and install
    /// the panic handler.
    pub fn enable_log(&self) {
        if self.verbose > 0 {
            std::env::set_var("RUST_BACKTRACE", "1");
            match self.verbose {
                1 => std::env::set_var("RUST_LOG", "info"),
                2 => std::env::set_var("RUST_LOG", "debug"),
                _ => std::env::set_var("RUST_LOG", "trace"),
            }
        }

        env_logger::Builder::from_default_env()
            .format_timestamp_nanos()
            .init();
        better_panic::install();
    }
}
