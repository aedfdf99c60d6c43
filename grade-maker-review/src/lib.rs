//! LLM review of open questions.
//!
//! Free-text answers cannot go through the pytest pipeline, so they are graded
//! by a language model instead: the question, the reference answer and the
//! student's response are sent to an OpenAI-compatible chat API which returns
//! a structured verdict; a fixed rule table then converts the verdict into a
//! score. To keep a single hallucinated verdict from deciding a grade, several
//! independent samples are taken and the best (or worst) one wins.

mod client;
mod prompt;
mod review;
mod rubric;
mod wrap;

use thiserror::Error;

pub use client::ChatClient;
pub use review::{grade_student_response, GradeStrategy, GradedResponse, ReviewOptions};
pub use rubric::{score_verdict, Grade, Verdict};
pub use wrap::wrap_preserving_newlines;

/// The errors that can occur while reviewing a response.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// `OPENAI_API_KEY` is not set anywhere.
    #[error("OPENAI_API_KEY is not set, put it in the environment or in a .env file")]
    MissingApiKey,
    /// The HTTP request could not be carried out.
    #[error("chat API request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with an error status.
    #[error("chat API returned status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Body of the error response.
        body: String,
    },
    /// The API answered with no choices at all.
    #[error("chat API returned an empty response")]
    EmptyResponse,
    /// The model did not produce the JSON verdict it was asked for.
    #[error("cannot parse the model's verdict: {0}")]
    InvalidVerdict(#[from] serde_json::Error),
    /// The model used a rating outside the rubric.
    #[error("unknown {field} rating: '{value}'")]
    UnknownRating {
        /// Which rubric field was invalid.
        field: &'static str,
        /// The rating the model produced.
        value: String,
    },
    /// Every sample failed, even after the per-sample retries.
    #[error("failed to grade the response: all {0} samples failed")]
    AllSamplesFailed(usize),
}
