//! The local grading pipeline: per-file grading and per-folder fan-out.

use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Error};
use colored::Colorize;

use grade_maker_annotate::{author_id, cleanup_notes, file_stem, tally, FileScore};
use grade_maker_exec::{list_submissions, Formatter, TestRunner};

use crate::opt::{Opt, SummaryStrategy};
use crate::summary::{append_run_record, Summary};

/// Everything needed to grade one file, shared by the whole run.
#[derive(Debug)]
pub struct GradeContext {
    /// Runner of the instructor suite.
    pub runner: TestRunner,
    /// Formatter normalizing the submissions.
    pub formatter: Formatter,
    /// Path of the instructor suite.
    pub tests: PathBuf,
    /// Score each submission starts from.
    pub starting_points: f64,
    /// Strip the notes of a previous run before grading.
    pub cleanup_first: bool,
    /// Stop after stripping the notes.
    pub cleanup_only: bool,
    /// Run the formatter before grading.
    pub format_solution: bool,
    /// Score 0 on a failing test process instead of aborting.
    pub allow_failed_tests: bool,
    /// Do not print the per-file score lines.
    pub quiet: bool,
    /// Optional JSONL run log.
    pub output_file: Option<PathBuf>,
}

impl GradeContext {
    /// Build the context of a run from the command line options.
    pub fn from_opt(opt: &Opt) -> Result<GradeContext, Error> {
        let tests = opt
            .tests
            .canonicalize()
            .with_context(|| format!("Test file not found: {}", opt.tests.display()))?;
        Ok(GradeContext {
            runner: TestRunner::new(&opt.runner),
            formatter: Formatter::new(&opt.formatter),
            tests,
            starting_points: opt.starting_points,
            cleanup_first: !opt.keep_notes,
            cleanup_only: opt.cleanup_only,
            format_solution: opt.format_solution,
            allow_failed_tests: !opt.strict,
            quiet: opt.quiet,
            output_file: opt.output_file.clone(),
        })
    }
}

/// Grade a single submission.
///
/// Returns `None` when the run is cleanup-only, the tallied score otherwise.
pub fn grade_file(file: &Path, ctx: &GradeContext) -> Result<Option<FileScore>, Error> {
    let file = file
        .canonicalize()
        .with_context(|| format!("File not found: {}", file.display()))?;

    if ctx.cleanup_first {
        cleanup_notes(&file)?;
    }
    if ctx.format_solution {
        ctx.formatter.format(&file)?;
    }
    if ctx.cleanup_only {
        return Ok(None);
    }

    let outcome = ctx.runner.run(&ctx.tests, &file)?;
    let score = if outcome.success {
        tally(&file, ctx.starting_points)?
    } else if ctx.allow_failed_tests {
        warn!(
            "test run failed for {} (exit code {:?}), scoring 0",
            file.display(),
            outcome.code
        );
        FileScore {
            author_id: author_id(&file)?,
            total: 0,
        }
    } else {
        bail!(
            "The test suite failed on {}.\n\
             Checks are expected to record a deduction and keep going: a failing run points at \
             a problem in the suite itself, or at a submission broken enough to abort the \
             collection phase.\nStderr:\n{}\nStdout:\n{}",
            file.display(),
            outcome.stderr,
            outcome.stdout
        );
    };

    if !ctx.quiet {
        println!(
            "{:<30}, author_id: {:<20}, total: {}",
            file_stem(&file),
            score.author_id,
            score.total
        );
    }
    if let Some(log) = &ctx.output_file {
        append_run_record(log, &file, &score)?;
    }
    Ok(Some(score))
}

/// What grading a folder produced.
#[derive(Debug)]
pub struct FolderReport {
    /// The graded folder.
    pub folder: PathBuf,
    /// How many files got a summary row.
    pub graded: usize,
}

/// Grade every submission of a folder, the example solution first.
pub fn grade_folder(
    folder: &Path,
    example_solution: &Path,
    strategy: SummaryStrategy,
    ctx: &GradeContext,
) -> Result<FolderReport, Error> {
    let summary = Summary::prepare(folder, strategy)?;
    let example = example_solution
        .canonicalize()
        .with_context(|| format!("File not found: {}", example_solution.display()))?;

    let mut files = vec![example.clone()];
    for file in list_submissions(folder)? {
        let file = file.canonicalize().unwrap_or(file);
        if file != example {
            files.push(file);
        }
    }

    let mut graded = 0;
    for file in &files {
        let score = match grade_file(file, ctx)? {
            Some(score) => score,
            None => continue,
        };
        if file == &example {
            // the suite must not take points from its own reference solution
            ensure!(
                score.total as f64 >= ctx.starting_points,
                "The example solution scored {} out of {}: not grading {}",
                score.total,
                ctx.starting_points,
                folder.display()
            );
            debug!("example solution scored {}", score.total);
        }
        summary.append(file, &score)?;
        graded += 1;
    }
    Ok(FolderReport {
        folder: folder.into(),
        graded,
    })
}

/// Entry point of the grading: fan the folders out over the workers.
pub fn main_grade(opt: Opt) -> Result<(), Error> {
    let ctx = GradeContext::from_opt(&opt)?;
    let folders: Vec<PathBuf> = opt.folder.split(',').map(PathBuf::from).collect();
    for folder in &folders {
        ensure!(folder.is_dir(), "Not a directory: {}", folder.display());
    }

    let workers = opt
        .num_threads
        .unwrap_or_else(num_cpus::get)
        .clamp(1, folders.len());

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<PathBuf>();
    let (report_tx, report_rx) = crossbeam_channel::unbounded();
    let reports: Vec<(PathBuf, Result<FolderReport, Error>)> = std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let report_tx = report_tx.clone();
            let ctx = &ctx;
            let opt = &opt;
            scope.spawn(move || {
                while let Ok(folder) = job_rx.recv() {
                    let report =
                        grade_folder(&folder, &opt.example_solution, opt.summary_strategy, ctx);
                    if report_tx.send((folder, report)).is_err() {
                        break;
                    }
                }
            });
        }
        for folder in folders.clone() {
            job_tx.send(folder).unwrap();
        }
        drop(job_tx);
        drop(report_tx);
        report_rx.iter().collect()
    });

    let mut failures = 0;
    for (folder, report) in reports {
        match report {
            Ok(report) => println!(
                "{}: {} ({} submissions graded)",
                report.folder.display(),
                "done".green().bold(),
                report.graded
            ),
            Err(error) => {
                failures += 1;
                eprintln!(
                    "{}: {} {:#}",
                    folder.display(),
                    "failed".red().bold(),
                    error
                );
            }
        }
    }
    if failures > 0 {
        bail!("{} of {} folders failed", failures, folders.len());
    }
    Ok(())
}
