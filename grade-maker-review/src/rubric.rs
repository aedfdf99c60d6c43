//! The rule table converting a verdict into a score.

use serde::Deserialize;

use crate::ReviewError;

/// The structured verdict returned by the model.
///
/// The JSON keys contain spaces, matching the prompt; missing keys fall back
/// to the harshest rating.
#[derive(Debug, Clone, Deserialize)]
pub struct Verdict {
    /// Whether the response is a valid attempt at all.
    #[serde(default)]
    pub valid: String,
    /// Whether the response contains major errors.
    #[serde(default = "absent", rename = "gross mistakes")]
    pub gross_mistakes: String,
    /// Explanation of the major errors.
    #[serde(default, rename = "gross mistakes explanation")]
    pub gross_mistakes_explanation: String,
    /// Factual accuracy rating.
    #[serde(default = "inaccurate")]
    pub accuracy: String,
    /// Explanation of the inaccuracies.
    #[serde(default, rename = "accuracy explanation")]
    pub accuracy_explanation: String,
    /// Coverage rating with respect to the reference answer.
    #[serde(default = "incomplete")]
    pub completeness: String,
    /// Explanation of what was omitted.
    #[serde(default, rename = "completeness explanation")]
    pub completeness_explanation: String,
    /// How much off-topic content the response carries.
    #[serde(default = "irrelevant")]
    pub relevance: String,
    /// Explanation of the off-topic parts.
    #[serde(default, rename = "relevance explanation")]
    pub relevance_explanation: String,
    /// Overall quality of the response.
    #[serde(default = "low", rename = "overall quality")]
    pub overall_quality: String,
}

fn absent() -> String {
    "absent".into()
}
fn inaccurate() -> String {
    "inaccurate".into()
}
fn incomplete() -> String {
    "incomplete".into()
}
fn irrelevant() -> String {
    "irrelevant".into()
}
fn low() -> String {
    "low".into()
}

/// A score with the feedback explaining it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    /// Score in `0..=100`.
    pub score: i32,
    /// Human-readable explanation of every applied deduction.
    pub feedback: String,
}

/// Apply the rule table to a verdict.
///
/// Starting from 100 points: an invalid response short-circuits to 0; gross
/// mistakes cost 20; accuracy, completeness and relevance deduct according to
/// their rating; a good/ok overall quality grants a bonus (only when points
/// were lost, and never above 100). The final score never goes below 0.
///
/// A rating outside the rubric is an error, so the sample is retried instead
/// of being scored arbitrarily.
pub fn score_verdict(verdict: &Verdict) -> Result<Grade, ReviewError> {
    let mut points: i32 = 100;
    let mut feedback = String::new();

    let validity = verdict.valid.to_lowercase();
    if !matches!(validity.as_str(), "valid" | "ok") {
        return Ok(Grade {
            score: 0,
            feedback: format!("The response is not a valid attempt at the question ({validity})."),
        });
    }

    if verdict.gross_mistakes == "present" {
        points -= 20;
        feedback.push_str(&format!(
            "\nThe response contains gross mistakes:\n{}\nReduce 20%\n",
            verdict.gross_mistakes_explanation
        ));
    }

    let accuracy = rate(
        "accuracy",
        &verdict.accuracy,
        &[
            ("accurate", 0),
            ("mostly accurate", 2),
            ("mostly inaccurate", 15),
            ("inaccurate", 30),
        ],
    )?;
    if accuracy > 0 {
        feedback.push_str(&format!(
            "\nAccuracy: {}. {}\nReduce {}%\n",
            verdict.accuracy, verdict.accuracy_explanation, accuracy
        ));
    }
    points -= accuracy;

    let completeness = rate(
        "completeness",
        &verdict.completeness,
        &[
            ("complete", 0),
            ("mostly complete", 2),
            ("partial", 10),
            ("incomplete", 20),
        ],
    )?;
    if completeness > 0 {
        feedback.push_str(&format!(
            "\nCompleteness: {}. {}\nReduce {}%\n",
            verdict.completeness, verdict.completeness_explanation, completeness
        ));
    }
    points -= completeness;

    let relevance = rate(
        "relevance",
        &verdict.relevance,
        &[
            ("relevant", 0),
            ("mostly relevant", 2),
            ("mostly irrelevant", 5),
            ("irrelevant", 15),
        ],
    )?;
    if relevance > 0 {
        feedback.push_str(&format!(
            "\nRelevance: {}. {}\nReduce {}%\n",
            verdict.relevance, verdict.relevance_explanation, relevance
        ));
    }
    points -= relevance;

    let bonus = rate(
        "overall quality",
        &verdict.overall_quality,
        &[("good", 20), ("ok", 10), ("low", 0)],
    )?;
    if points < 100 && bonus > 0 {
        points = (points + bonus).min(100);
        feedback.push_str(&format!(
            "\nOverall quality: {}.\nBonus up to {}%\n",
            verdict.overall_quality, bonus
        ));
    }

    Ok(Grade {
        score: points.max(0),
        feedback,
    })
}

fn rate(field: &'static str, value: &str, table: &[(&str, i32)]) -> Result<i32, ReviewError> {
    table
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, points)| *points)
        .ok_or_else(|| ReviewError::UnknownRating {
            field,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn perfect() -> Verdict {
        serde_json::from_str(
            r#"{
                "valid": "valid",
                "gross mistakes": "absent",
                "accuracy": "accurate",
                "completeness": "complete",
                "relevance": "relevant",
                "overall quality": "good"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn perfect_verdicts_score_100() {
        let grade = score_verdict(&perfect()).unwrap();
        assert_eq!(grade.score, 100);
        assert_eq!(grade.feedback, "");
    }

    #[test]
    fn invalid_responses_score_0() {
        let mut verdict = perfect();
        verdict.valid = "empty".into();
        let grade = score_verdict(&verdict).unwrap();
        assert_eq!(grade.score, 0);
        assert!(grade.feedback.contains("not a valid attempt"));
    }

    #[test]
    fn deductions_add_up() {
        let mut verdict = perfect();
        verdict.gross_mistakes = "present".into();
        verdict.accuracy = "mostly inaccurate".into();
        verdict.completeness = "partial".into();
        verdict.relevance = "mostly relevant".into();
        verdict.overall_quality = "low".into();
        // 100 - 20 - 15 - 10 - 2
        assert_eq!(score_verdict(&verdict).unwrap().score, 53);
    }

    #[test]
    fn quality_bonus_applies_only_below_100() {
        let mut verdict = perfect();
        verdict.accuracy = "mostly accurate".into();
        // 100 - 2 + 20, capped at 100
        assert_eq!(score_verdict(&verdict).unwrap().score, 100);

        verdict.accuracy = "inaccurate".into();
        verdict.completeness = "incomplete".into();
        // 100 - 30 - 20 + 20
        assert_eq!(score_verdict(&verdict).unwrap().score, 70);
    }

    #[test]
    fn harsh_verdicts_score_the_floor() {
        let mut verdict = perfect();
        verdict.gross_mistakes = "present".into();
        verdict.accuracy = "inaccurate".into();
        verdict.completeness = "incomplete".into();
        verdict.relevance = "irrelevant".into();
        verdict.overall_quality = "ok".into();
        // 100 - 20 - 30 - 20 - 15 = 15, +10 bonus
        assert_eq!(score_verdict(&verdict).unwrap().score, 25);

        verdict.overall_quality = "low".into();
        assert_eq!(score_verdict(&verdict).unwrap().score, 15);
    }

    #[test]
    fn unknown_ratings_are_errors() {
        let mut verdict = perfect();
        verdict.accuracy = "superb".into();
        let err = score_verdict(&verdict).unwrap_err();
        assert!(matches!(
            err,
            ReviewError::UnknownRating {
                field: "accuracy",
                ..
            }
        ));
    }

    #[test]
    fn missing_keys_default_to_the_harshest_rating() {
        let verdict: Verdict = serde_json::from_str(r#"{"valid": "valid"}"#).unwrap();
        // 100 - 30 - 20 - 15
        assert_eq!(score_verdict(&verdict).unwrap().score, 35);
    }
}
