//! grade-maker is a tool for grading the submissions of programming-course
//! assignments.
//!
//! Each submission is graded by running the instructor-authored pytest suite
//! against it; the suite records its deductions directly inside the student's
//! file as `# GRADER:` comments (via `grade-maker-tools annotate`), and the
//! pipeline tallies them into a final score, collecting one row per file in a
//! `summary.csv` per submission folder.

#[macro_use]
extern crate log;

pub mod error;
pub mod opt;
pub mod pipeline;
pub mod summary;
pub mod tools;
