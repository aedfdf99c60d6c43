//! Tool that grades the answers to open questions with a language model.
//!
//! Open questions cannot go through the pytest pipeline: each response is
//! graded by sampling several independent verdicts from a chat model and
//! converting them to scores with a fixed rule table.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Error};
use clap::Parser;
use serde::{Deserialize, Serialize};

use grade_maker_review::{
    grade_student_response, ChatClient, GradeStrategy, GradedResponse, ReviewOptions,
};

#[derive(Parser, Debug)]
pub struct ReviewOpt {
    /// JSON file with the responses to grade
    ///
    /// The file is an array of objects with the keys "question",
    /// "reference_answer" and "response".
    #[clap(short, long)]
    pub input: PathBuf,

    /// Where to write the graded JSON; stdout when missing
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Chat model to grade with
    #[clap(long)]
    pub model: Option<String>,

    /// Endpoint of the chat API, for OpenAI-compatible providers
    #[clap(long)]
    pub api_url: Option<String>,

    /// How many independent gradings to sample per response
    #[clap(long, default_value_t = 3)]
    pub n_grades: usize,

    /// How many times a failed sample is retried
    #[clap(long, default_value_t = 3)]
    pub n_retries: usize,

    /// How many samples to request concurrently
    #[clap(long, default_value_t = 3)]
    pub n_jobs: usize,

    /// Keep the best or the worst sample
    #[clap(long, default_value = "best")]
    pub strategy: GradeStrategy,

    /// Do not copy the reference answer into the graded output
    #[clap(long)]
    pub no_reference_answer: bool,

    /// Keep the exact score instead of rounding it up to a multiple of 5
    #[clap(long)]
    pub exact_scores: bool,
}

/// One record of the input file.
#[derive(Debug, Deserialize)]
struct OpenQuestion {
    question: String,
    reference_answer: String,
    response: String,
}

/// One record of the graded output.
#[derive(Debug, Serialize)]
struct GradedQuestion {
    question: String,
    #[serde(flatten)]
    graded: GradedResponse,
}

pub fn main_review(opt: ReviewOpt) -> Result<(), Error> {
    let client = ChatClient::from_env(opt.model.clone(), opt.api_url.clone())?;
    let options = ReviewOptions {
        n_grades: opt.n_grades,
        n_retries: opt.n_retries,
        n_jobs: opt.n_jobs,
        strategy: opt.strategy,
        include_reference_answer: !opt.no_reference_answer,
        round_up: !opt.exact_scores,
    };

    let raw = fs::read_to_string(&opt.input)
        .with_context(|| format!("Cannot read {}", opt.input.display()))?;
    let questions: Vec<OpenQuestion> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid questions file {}", opt.input.display()))?;

    let mut graded = Vec::with_capacity(questions.len());
    for question in questions {
        info!("grading the response to '{}'", question.question);
        let response = grade_student_response(
            &client,
            &question.question,
            &question.reference_answer,
            &question.response,
            &options,
        )
        .with_context(|| format!("Failed to grade the response to '{}'", question.question))?;
        graded.push(GradedQuestion {
            question: question.question,
            graded: response,
        });
    }

    let report = serde_json::to_string_pretty(&graded)?;
    match &opt.output {
        Some(output) => fs::write(output, report)
            .with_context(|| format!("Cannot write {}", output.display()))?,
        None => println!("{report}"),
    }
    Ok(())
}
