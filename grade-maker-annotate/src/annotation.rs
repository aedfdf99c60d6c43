//! Insertion of the feedback comments into a submission.

use std::fs;
use std::path::Path;

use log::warn;

use crate::python::find_function;
use crate::{AnnotateError, GRADER_TOKEN};

/// The mutable running total threaded through the checks of a grading run.
///
/// It starts from the full score of the assignment and every recorded
/// annotation decrements it by the deducted points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningScore {
    total: f64,
}

impl RunningScore {
    /// A new accumulator starting from `starting_points`.
    pub fn new(starting_points: f64) -> RunningScore {
        RunningScore {
            total: starting_points,
        }
    }

    /// The current total.
    pub fn total(&self) -> f64 {
        self.total
    }

    fn record(&mut self, points: f64) {
        self.total += points;
    }
}

/// The result of an annotation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotateOutcome {
    /// The feedback has been inserted and the deduction recorded.
    Inserted,
    /// The target function is not present in the file. The file is left
    /// untouched and nothing is deducted from the running total.
    TargetNotFound,
}

/// Insert `message` as grader comments inside the function named `function`.
///
/// The comment lines are placed right after the function's header and its
/// docstring (if any), indented like the function body, and are followed by a
/// line recording the deduction. The running total is decremented by
/// `points_to_reduce`, rounded to one decimal.
///
/// When the function cannot be located the file is left untouched and
/// [`AnnotateOutcome::TargetNotFound`] is returned; a warning is logged since
/// a deduction the suite asked for has not been recorded anywhere.
pub fn annotate_function(
    path: &Path,
    function: &str,
    message: &str,
    points_to_reduce: f64,
    score: &mut RunningScore,
) -> Result<AnnotateOutcome, AnnotateError> {
    let content = read(path)?;
    let site = match find_function(&content, function) {
        Some(site) => site,
        None => {
            warn!(
                "function '{}' not found in {}: the deduction of {} points has not been recorded",
                function,
                path.display(),
                points_to_reduce
            );
            return Ok(AnnotateOutcome::TargetNotFound);
        }
    };

    let mut lines: Vec<String> = content.split('\n').map(str::to_owned).collect();
    let indent = leading_whitespace(lines.get(site.body_line).map(String::as_str).unwrap_or(""));
    let insert_at = site.insertion_line().min(lines.len());

    let points = -round1(points_to_reduce);
    let mut note = note_lines(message, points, &indent);
    // keep the message lines in order while inserting at a fixed index
    note.reverse();
    for line in note {
        lines.insert(insert_at, line);
    }
    score.record(points);

    write(path, &lines.join("\n"))?;
    Ok(AnnotateOutcome::Inserted)
}

/// Append `message` as grader comments at the end of the file.
///
/// Used when no function is targeted (a submission missing entire parts, a
/// file-level remark). The running total is decremented like in
/// [`annotate_function`].
pub fn annotate_file(
    path: &Path,
    message: &str,
    points_to_reduce: f64,
    score: &mut RunningScore,
) -> Result<(), AnnotateError> {
    let content = read(path)?;
    let mut lines: Vec<String> = content.split('\n').map(str::to_owned).collect();
    // drop the trailing empty line so the note is appended right after the code
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let points = -round1(points_to_reduce);
    lines.extend(note_lines(message, points, ""));
    lines.push(String::new());
    score.record(points);

    write(path, &lines.join("\n"))?;
    Ok(())
}

/// The comment lines of a single annotation: the message, then the points.
fn note_lines(message: &str, points: f64, indent: &str) -> Vec<String> {
    let mut lines: Vec<String> = message
        .split('\n')
        .map(|line| format!("{indent}{GRADER_TOKEN} {line}"))
        .collect();
    lines.push(format!("{indent}{GRADER_TOKEN} {points} points"));
    lines
}

fn leading_whitespace(line: &str) -> String {
    line.chars().take_while(|c| c.is_whitespace()).collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn read(path: &Path) -> Result<String, AnnotateError> {
    fs::read_to_string(path).map_err(|source| AnnotateError::Read {
        path: path.into(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<(), AnnotateError> {
    fs::write(path, content).map_err(|source| AnnotateError::Write {
        path: path.into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::python::has_syntax_errors;

    use super::*;

    fn annotate(source: &str, function: &str, message: &str, points: f64) -> (String, f64) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("solution.py");
        fs::write(&path, source).unwrap();
        let mut score = RunningScore::new(100.0);
        annotate_function(&path, function, message, points, &mut score).unwrap();
        (fs::read_to_string(&path).unwrap(), score.total())
    }

    #[test]
    fn comments_are_inserted_after_the_header() {
        let (content, total) = annotate(
            "def foo():\n    return 1\n",
            "foo",
            "wrong return value",
            10.0,
        );
        assert_eq!(
            content,
            "def foo():\n    # GRADER: wrong return value\n    # GRADER: -10 points\n    return 1\n"
        );
        assert_eq!(total, 90.0);
    }

    #[test]
    fn comments_are_inserted_after_the_docstring() {
        let (content, _) = annotate(
            "def foo():\n    \"\"\"Docs.\"\"\"\n    return 1\n",
            "foo",
            "oops",
            2.5,
        );
        assert_eq!(
            content,
            "def foo():\n    \"\"\"Docs.\"\"\"\n    # GRADER: oops\n    # GRADER: -2.5 points\n    return 1\n"
        );
    }

    #[test]
    fn indentation_matches_the_method_body() {
        let (content, _) = annotate(
            "class Point:\n    def mod(self):\n        return 0\n",
            "mod",
            "always zero",
            40.0,
        );
        assert_eq!(
            content,
            "class Point:\n    def mod(self):\n        # GRADER: always zero\n        # GRADER: -40 points\n        return 0\n"
        );
        assert!(!has_syntax_errors(&content));
    }

    #[test]
    fn multiline_messages_are_prefixed_line_by_line() {
        let (content, total) = annotate(
            "def foo():\n    return 1\n",
            "foo",
            "first line\nsecond line",
            7.49,
        );
        assert_eq!(
            content,
            "def foo():\n    # GRADER: first line\n    # GRADER: second line\n    # GRADER: -7.5 points\n    return 1\n"
        );
        assert_eq!(total, 92.5);
    }

    #[test]
    fn decorated_function_stays_valid() {
        let source = "@property\ndef foo(\n    x,\n):\n    return x\n";
        let (content, _) = annotate(source, "foo", "bad", 1.0);
        assert!(!has_syntax_errors(&content));
        assert!(content.contains("    # GRADER: bad\n    # GRADER: -1 points\n    return x"));
    }

    #[test]
    fn missing_function_leaves_the_file_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("solution.py");
        fs::write(&path, "def foo():\n    pass\n").unwrap();
        let mut score = RunningScore::new(100.0);
        let outcome = annotate_function(&path, "bar", "nope", 10.0, &mut score).unwrap();
        assert_eq!(outcome, AnnotateOutcome::TargetNotFound);
        assert_eq!(fs::read_to_string(&path).unwrap(), "def foo():\n    pass\n");
        assert_eq!(score.total(), 100.0);
    }

    #[test]
    fn whole_file_notes_are_appended() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("solution.py");
        fs::write(&path, "x = 1\n").unwrap();
        let mut score = RunningScore::new(100.0);
        annotate_file(&path, "missing part two", 30.0, &mut score).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "x = 1\n# GRADER: missing part two\n# GRADER: -30 points\n"
        );
        assert_eq!(score.total(), 70.0);
    }
}
