use clap::Parser;

use grade_maker_rust::error::NiceError;
use grade_maker_rust::tools::annotate::main_annotate;
use grade_maker_rust::tools::cleanup::main_cleanup;
use grade_maker_rust::tools::gen_autocompletion::main_gen_autocompletion;
use grade_maker_rust::tools::opt::{Opt, Tool};
use grade_maker_rust::tools::review::main_review;
use grade_maker_rust::tools::tally::main_tally;
use grade_maker_rust::tools::unpack::main_unpack;

fn main() {
    let base_opt = Opt::parse();
    base_opt.logger.enable_log();

    match base_opt.tool {
        Tool::Annotate(opt) => main_annotate(opt),
        Tool::Cleanup(opt) => main_cleanup(opt),
        Tool::Tally(opt) => main_tally(opt),
        Tool::Unpack(opt) => main_unpack(opt),
        Tool::Review(opt) => main_review(opt),
        Tool::GenAutocompletion(opt) => main_gen_autocompletion(opt),
    }
    .nice_unwrap()
}
