//! Tool that generates the autocompletion scripts inside the target/autocompletion directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Generator, Shell};

#[derive(Parser, Debug)]
pub struct GenAutocompletionOpt {
    /// Where to write the autocompletion files
    #[clap(short = 't', long = "target")]
    pub target: Option<PathBuf>,
}

pub fn main_gen_autocompletion(opt: GenAutocompletionOpt) -> Result<(), Error> {
    let target = match opt.target {
        Some(target) => target,
        None => Path::new(env!("CARGO_MANIFEST_DIR")).join("target/autocompletion"),
    };
    std::fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create target dir: {}", target.display()))?;
    for &shell in Shell::value_variants() {
        generate(shell, &target, "grade-maker", crate::opt::Opt::command())?;
        generate(
            shell,
            &target,
            "grade-maker-tools",
            crate::tools::opt::Opt::command(),
        )?;
    }
    Ok(())
}

fn generate(
    shell: Shell,
    target: &Path,
    name: &str,
    mut command: clap::Command,
) -> Result<(), Error> {
    let target = target.join(shell.file_name(name));
    let mut file = File::create(&target).with_context(|| {
        format!(
            "Failed to create completion for {} at {}",
            shell,
            target.display()
        )
    })?;
    clap_complete::generate(shell, &mut command, name, &mut file);
    Ok(())
}
