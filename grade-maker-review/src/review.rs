//! Multi-sample grading of a single response.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::warn;
use serde::Serialize;

use crate::client::ChatClient;
use crate::rubric::{score_verdict, Grade, Verdict};
use crate::wrap::wrap_preserving_newlines;
use crate::{prompt, ReviewError};

/// Feedback lines are wrapped at this width.
const WRAP_WIDTH: usize = 100;

/// How the final grade is chosen among the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStrategy {
    /// Keep the most generous sample.
    Best,
    /// Keep the harshest sample.
    Worst,
}

impl FromStr for GradeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<GradeStrategy, String> {
        match s {
            "best" => Ok(GradeStrategy::Best),
            "worst" => Ok(GradeStrategy::Worst),
            _ => Err(format!("unknown strategy '{s}', use 'best' or 'worst'")),
        }
    }
}

impl fmt::Display for GradeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GradeStrategy::Best => write!(f, "best"),
            GradeStrategy::Worst => write!(f, "worst"),
        }
    }
}

/// Options of a review run.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// How many independent gradings to sample.
    pub n_grades: usize,
    /// How many times a failed sample is retried before giving it up.
    pub n_retries: usize,
    /// How many samples to request concurrently.
    pub n_jobs: usize,
    /// How the final grade is chosen among the samples.
    pub strategy: GradeStrategy,
    /// Copy the reference answer into the graded output.
    pub include_reference_answer: bool,
    /// Round the final score up to the next multiple of 5.
    pub round_up: bool,
}

impl Default for ReviewOptions {
    fn default() -> ReviewOptions {
        ReviewOptions {
            n_grades: 3,
            n_retries: 3,
            n_jobs: 3,
            strategy: GradeStrategy::Best,
            include_reference_answer: true,
            round_up: true,
        }
    }
}

/// The final grading decision for one response.
#[derive(Debug, Clone, Serialize)]
pub struct GradedResponse {
    /// Final score in `0..=100`.
    pub grade: i32,
    /// Feedback explaining the deductions.
    pub feedback: String,
    /// Which strategy was used and what the samples scored.
    pub details: String,
    /// The reference answer, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,
}

/// Grade a student's free-text response against the reference answer.
///
/// `n_grades` independent verdicts are sampled from the model (each retried
/// on transport or schema errors), the best or worst one is kept per the
/// strategy, and the resulting feedback is wrapped for terminal output.
pub fn grade_student_response(
    client: &ChatClient,
    question: &str,
    reference_answer: &str,
    response: &str,
    options: &ReviewOptions,
) -> Result<GradedResponse, ReviewError> {
    let samples = sample_grades(client, question, reference_answer, response, options);
    if samples.is_empty() {
        return Err(ReviewError::AllSamplesFailed(options.n_grades));
    }

    let scores = samples.iter().map(|grade| grade.score).collect_vec();
    let chosen = match options.strategy {
        GradeStrategy::Best => samples.into_iter().max_by_key(|grade| grade.score),
        GradeStrategy::Worst => samples.into_iter().min_by_key(|grade| grade.score),
    };
    // samples is not empty here
    let mut chosen = chosen.unwrap();

    if options.round_up {
        let rounded = round_up_to_multiple_of_5(chosen.score);
        if rounded > chosen.score {
            chosen.score = rounded;
            chosen
                .feedback
                .push_str(&format!("\n\nRounded up to {rounded}"));
        }
    }

    Ok(GradedResponse {
        grade: chosen.score,
        feedback: wrap_preserving_newlines(&chosen.feedback, WRAP_WIDTH),
        details: format!(
            "{} of {} grades: {:?}",
            options.strategy, options.n_grades, scores
        ),
        reference_answer: options
            .include_reference_answer
            .then(|| wrap_preserving_newlines(reference_answer, WRAP_WIDTH)),
    })
}

/// Collect up to `n_grades` verdict samples on a small worker pool.
fn sample_grades(
    client: &ChatClient,
    question: &str,
    reference_answer: &str,
    response: &str,
    options: &ReviewOptions,
) -> Vec<Grade> {
    let workers = options.n_jobs.clamp(1, options.n_grades.max(1));
    let (sample_tx, sample_rx) = crossbeam_channel::unbounded();
    std::thread::scope(|scope| {
        for worker in 0..workers {
            let sample_tx = sample_tx.clone();
            scope.spawn(move || {
                // workers split the samples evenly, remainder to the first ones
                let samples = options.n_grades / workers
                    + usize::from(worker < options.n_grades % workers);
                for _ in 0..samples {
                    if let Some(grade) =
                        grade_with_retries(client, question, reference_answer, response, options)
                    {
                        let _ = sample_tx.send(grade);
                    }
                }
            });
        }
        drop(sample_tx);
        sample_rx.iter().collect()
    })
}

/// One sample, retried up to `n_retries` times. `None` when every try failed.
fn grade_with_retries(
    client: &ChatClient,
    question: &str,
    reference_answer: &str,
    response: &str,
    options: &ReviewOptions,
) -> Option<Grade> {
    for attempt in 1..=options.n_retries {
        match grade_once(client, question, reference_answer, response) {
            Ok(grade) => return Some(grade),
            Err(error) => warn!(
                "grading attempt {}/{} failed: {}",
                attempt, options.n_retries, error
            ),
        }
    }
    None
}

fn grade_once(
    client: &ChatClient,
    question: &str,
    reference_answer: &str,
    response: &str,
) -> Result<Grade, ReviewError> {
    let prompt = prompt::render(question, reference_answer, response);
    let raw = client.complete_json(&prompt)?;
    let verdict: Verdict = serde_json::from_str(&raw)?;
    score_verdict(&verdict)
}

fn round_up_to_multiple_of_5(score: i32) -> i32 {
    let quotient = score / 5;
    let rounded_up = if score % 5 > 0 { quotient + 1 } else { quotient };
    rounded_up * 5
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn strategies_parse_from_the_command_line() {
        assert_eq!("best".parse::<GradeStrategy>(), Ok(GradeStrategy::Best));
        assert_eq!("worst".parse::<GradeStrategy>(), Ok(GradeStrategy::Worst));
        assert!("median".parse::<GradeStrategy>().is_err());
    }

    #[test]
    fn rounding_goes_up_to_the_next_multiple_of_5() {
        assert_eq!(round_up_to_multiple_of_5(0), 0);
        assert_eq!(round_up_to_multiple_of_5(81), 85);
        assert_eq!(round_up_to_multiple_of_5(85), 85);
        assert_eq!(round_up_to_multiple_of_5(98), 100);
    }
}
