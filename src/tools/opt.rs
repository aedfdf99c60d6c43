use clap::{Parser, Subcommand};

use crate::opt::LoggerOpt;
use crate::tools::annotate::AnnotateOpt;
use crate::tools::cleanup::CleanupOpt;
use crate::tools::gen_autocompletion::GenAutocompletionOpt;
use crate::tools::review::ReviewOpt;
use crate::tools::tally::TallyOpt;
use crate::tools::unpack::UnpackOpt;

#[derive(Parser, Debug)]
#[clap(name = "grade-maker-tools", version)]
pub struct Opt {
    #[clap(flatten)]
    pub logger: LoggerOpt,

    /// Which tool to use
    #[clap(subcommand)]
    pub tool: Tool,
}

#[derive(Subcommand, Debug)]
pub enum Tool {
    /// Insert a feedback note inside a submission, deducting points
    ///
    /// This is what the instructor suites call when a check fails.
    Annotate(AnnotateOpt),
    /// Strip the grader notes from some submissions
    Cleanup(CleanupOpt),
    /// Tally the deductions recorded in some submissions
    Tally(TallyOpt),
    /// Extract the submission archives of a directory
    Unpack(UnpackOpt),
    /// Grade the answers to open questions with a language model
    Review(ReviewOpt),
    /// Generate the autocompletion files for the shell
    GenAutocompletion(GenAutocompletionOpt),
}
