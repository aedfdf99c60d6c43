//! Tool that extracts the submission archives exported by the LMS.

use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;

use grade_maker_exec::unpack_all;

#[derive(Parser, Debug)]
pub struct UnpackOpt {
    /// The directory with the archives to extract
    #[clap(short, long)]
    pub directory: PathBuf,

    /// Delete each archive after extracting it
    #[clap(long)]
    pub remove_archives: bool,
}

pub fn main_unpack(opt: UnpackOpt) -> Result<(), Error> {
    let unpacked = unpack_all(&opt.directory, opt.remove_archives)?;
    println!("{} archives extracted", unpacked);
    Ok(())
}
