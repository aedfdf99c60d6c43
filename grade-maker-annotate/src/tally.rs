//! Tallying of the recorded deductions into a final score.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{AnnotateError, AUTHOR_ID_TOKEN, GRADER_TOKEN};

lazy_static! {
    static ref POINTS: Regex = Regex::new(&format!(
        r"{}.*?(-?\d+(?:\.\d+)?)\s*points",
        regex::escape(GRADER_TOKEN)
    ))
    .unwrap();
    static ref AUTHOR: Regex =
        Regex::new(&format!(r"{}(.*)", regex::escape(AUTHOR_ID_TOKEN))).unwrap();
}

/// Author id used when the submission does not declare one.
pub const UNKNOWN_AUTHOR_ID: &str = "UNKNOWN";

/// The tallied score of a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScore {
    /// Who submitted the file.
    pub author_id: String,
    /// Total score, after all the recorded deductions.
    pub total: i64,
}

/// Sum the deductions recorded in the file onto `starting_points`.
///
/// Every `# GRADER: … <points> points` line contributes its signed value; the
/// total is rounded to the nearest integer. A file with no annotations scores
/// the full `starting_points`.
pub fn tally(path: &Path, starting_points: f64) -> Result<FileScore, AnnotateError> {
    let content = read(path)?;
    let mut total = starting_points;
    for capture in POINTS.captures_iter(&content) {
        // the regex only matches valid float literals
        total += capture[1].parse::<f64>().unwrap();
    }
    Ok(FileScore {
        author_id: author_id_of(&content, path),
        total: total.round() as i64,
    })
}

/// Extract the author id of a submission.
///
/// The last `# AUTHOR_ID: …` line wins; when the file declares none, the
/// `ID_<author>_…` file naming convention is tried, and failing that the id is
/// [`UNKNOWN_AUTHOR_ID`].
pub fn author_id(path: &Path) -> Result<String, AnnotateError> {
    let content = read(path)?;
    Ok(author_id_of(&content, path))
}

/// Append a `timestamp,fn,author_id,total` row to the tally log.
///
/// The header row is written only when the log is created by this call.
pub fn append_tally_log(log: &Path, file: &Path, score: &FileScore) -> Result<(), AnnotateError> {
    let write_header = !log.exists();
    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log)
        .map_err(|source| AnnotateError::TallyLog {
            path: log.into(),
            source,
        })?;
    let row = format!(
        "{},{},{},{}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        file_stem(file),
        score.author_id,
        score.total
    );
    let mut record = String::new();
    if write_header {
        record.push_str("timestamp,fn,author_id,total\n");
    }
    record.push_str(&row);
    out.write_all(record.as_bytes())
        .map_err(|source| AnnotateError::TallyLog {
            path: log.into(),
            source,
        })
}

/// The file name without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn author_id_of(content: &str, path: &Path) -> String {
    let mut author = None;
    for line in content.lines() {
        if let Some(capture) = AUTHOR.captures(line) {
            author = Some(capture[1].trim().to_owned());
        }
    }
    match author {
        Some(author) if !author.is_empty() => author,
        _ => author_id_from_file_name(path).unwrap_or_else(|| UNKNOWN_AUTHOR_ID.to_owned()),
    }
}

/// Guess the author from the `ID_<author>_…` file naming convention.
fn author_id_from_file_name(path: &Path) -> Option<String> {
    let stem = file_stem(path);
    let mut tokens = stem.split('_');
    let marker = tokens.next()?;
    let author = tokens.next()?;
    if marker.eq_ignore_ascii_case("id") {
        Some(author.to_owned())
    } else {
        None
    }
}

fn read(path: &Path) -> Result<String, AnnotateError> {
    fs::read_to_string(path).map_err(|source| AnnotateError::Read {
        path: path.into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tally_of(content: &str, name: &str) -> FileScore {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        tally(&path, 100.0).unwrap()
    }

    #[test]
    fn unannotated_files_score_the_full_points() {
        let score = tally_of("def foo():\n    pass\n", "solution.py");
        assert_eq!(score.total, 100);
        assert_eq!(score.author_id, UNKNOWN_AUTHOR_ID);
    }

    #[test]
    fn deductions_are_summed() {
        let score = tally_of(
            "# GRADER: bad\n# GRADER: -10 points\nx = 1\n# GRADER: -2.5 points\n",
            "solution.py",
        );
        assert_eq!(score.total, 88);
    }

    #[test]
    fn the_last_author_id_wins() {
        let score = tally_of(
            "# AUTHOR_ID: 111\nx = 1\n# AUTHOR_ID: 222\n",
            "solution.py",
        );
        assert_eq!(score.author_id, "222");
    }

    #[test]
    fn author_id_falls_back_to_the_file_name() {
        let score = tally_of("x = 1\n", "ID_212410104_WorkCode_533293.py");
        assert_eq!(score.author_id, "212410104");
    }

    #[test]
    fn inline_points_count_too() {
        let score = tally_of("x = 1  # GRADER: hardcoded -7 points\n", "solution.py");
        assert_eq!(score.total, 93);
    }

    #[test]
    fn tally_log_gains_one_header_and_one_row_per_call() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = dir.path().join("scores.csv");
        let solution = dir.path().join("solution.py");
        fs::write(&solution, "x = 1\n").unwrap();

        let score = tally(&solution, 100.0).unwrap();
        append_tally_log(&log, &solution, &score).unwrap();
        append_tally_log(&log, &solution, &score).unwrap();

        let content = fs::read_to_string(&log).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,fn,author_id,total");
        assert!(lines[1].ends_with(",solution,UNKNOWN,100"));
    }
}
