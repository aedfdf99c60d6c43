use clap::Parser;

use grade_maker_rust::error::NiceError;
use grade_maker_rust::opt::Opt;
use grade_maker_rust::pipeline::main_grade;

fn main() {
    let opt = Opt::parse();
    opt.logger.enable_log();
    main_grade(opt).nice_unwrap();
}
