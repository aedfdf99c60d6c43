//! The per-folder summary and the per-run JSONL log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Error};
use grade_maker_annotate::FileScore;
use grade_maker_exec::submission_id;
use serde::Serialize;

use crate::opt::SummaryStrategy;

/// Name of the summary collected in each submission folder.
pub const SUMMARY_FILE: &str = "summary.csv";

const SUMMARY_HEADER: &str = "ts,filename,submission_id,student_id,points\n";

/// The `summary.csv` of one submission folder, one row per graded file.
#[derive(Debug)]
pub struct Summary {
    path: PathBuf,
}

impl Summary {
    /// Get the summary of `folder`, dealing with a leftover file according to
    /// the strategy.
    pub fn prepare(folder: &Path, strategy: SummaryStrategy) -> Result<Summary, Error> {
        let path = folder.join(SUMMARY_FILE);
        if path.exists() {
            match strategy {
                SummaryStrategy::Cancel => bail!("File already exists: {}", path.display()),
                SummaryStrategy::Overwrite => fs::remove_file(&path)
                    .with_context(|| format!("Cannot remove {}", path.display()))?,
                SummaryStrategy::Append => {}
            }
        }
        Ok(Summary { path })
    }

    /// Append the row of a graded file, writing the header if the summary is
    /// new.
    pub fn append(&self, file: &Path, score: &FileScore) -> Result<(), Error> {
        let write_header = !self.path.exists();
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open {}", self.path.display()))?;
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut record = String::new();
        if write_header {
            record.push_str(SUMMARY_HEADER);
        }
        record.push_str(&format!(
            "{},{},{},{},{}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            filename,
            submission_id(file),
            score.author_id,
            score.total
        ));
        out.write_all(record.as_bytes())
            .with_context(|| format!("Cannot write {}", self.path.display()))
    }
}

/// One line of the JSONL run log.
#[derive(Debug, Serialize)]
struct RunRecord<'a> {
    timestamp: String,
    file: String,
    author_id: &'a str,
    total: i64,
}

/// Append the record of a graded file to the JSONL run log.
pub fn append_run_record(log: &Path, file: &Path, score: &FileScore) -> Result<(), Error> {
    let record = RunRecord {
        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        file: file.display().to_string(),
        author_id: &score.author_id,
        total: score.total,
    };
    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log)
        .with_context(|| format!("Cannot open {}", log.display()))?;
    let mut line = serde_json::to_string(&record)?;
    line.push('\n');
    out.write_all(line.as_bytes())
        .with_context(|| format!("Cannot write {}", log.display()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn score() -> FileScore {
        FileScore {
            author_id: "212410104".into(),
            total: 85,
        }
    }

    #[test]
    fn rows_carry_the_submission_and_student_ids() {
        let dir = tempfile::TempDir::new().unwrap();
        let summary = Summary::prepare(dir.path(), SummaryStrategy::Overwrite).unwrap();
        let file = dir.path().join("ID_212410104_WorkCode_533293.py");
        summary.append(&file, &score()).unwrap();

        let content = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "ts,filename,submission_id,student_id,points");
        assert!(lines[1].ends_with(",ID_212410104_WorkCode_533293.py,533293,212410104,85"));
    }

    #[test]
    fn overwrite_discards_the_previous_summary() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(SUMMARY_FILE), "old content\n").unwrap();
        let summary = Summary::prepare(dir.path(), SummaryStrategy::Overwrite).unwrap();
        summary.append(Path::new("solution.py"), &score()).unwrap();

        let content = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
        assert!(!content.contains("old content"));
        assert!(content.starts_with(SUMMARY_HEADER));
    }

    #[test]
    fn append_keeps_the_previous_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(SUMMARY_FILE),
            "ts,filename,submission_id,student_id,points\nold row\n",
        )
        .unwrap();
        let summary = Summary::prepare(dir.path(), SummaryStrategy::Append).unwrap();
        summary.append(Path::new("solution.py"), &score()).unwrap();

        let content = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
        assert!(content.contains("old row"));
        // the header is not repeated
        assert_eq!(content.matches("ts,filename").count(), 1);
    }

    #[test]
    fn cancel_refuses_to_touch_an_existing_summary() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(SUMMARY_FILE), "old content\n").unwrap();
        assert!(Summary::prepare(dir.path(), SummaryStrategy::Cancel).is_err());
    }

    #[test]
    fn run_records_are_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = dir.path().join("run.jsonl");
        append_run_record(&log, Path::new("solution.py"), &score()).unwrap();
        append_run_record(&log, Path::new("solution.py"), &score()).unwrap();

        let content = fs::read_to_string(&log).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["author_id"], "212410104");
        assert_eq!(record["total"], 85);
    }
}
