//! The grading prompt sent to the model.

/// Template of the system message. The placeholders are replaced verbatim,
/// the answers are fenced in tags so the model cannot confuse them.
const TEMPLATE: &str = r#"
You are an exercise grader tasked with evaluating student submissions.
Setting aside any prior knowledge on the subject, focus solely on the
student's response and the reference answer provided.
Your objective is to assess how well the student understood the question and
accurately addressed it in their response, relative to the reference answer.


Question:
<question>
{QUESTION}
</question>

Reference Answer:
<reference_answer>
{REFERENCE_ANSWER}
</reference_answer>

Student's Response:
<response>
{RESPONSE}
</response>

Your feedback should be structured in JSON format, encompassing the following
keys and associated values:

 - `valid`: one of ["empty", "only irrelevant", "valid"], indicating whether
    the response is empty or only contains irrelevant information, or is a
    valid attempt at answering the question.

 - `gross mistakes`: one of ["absent", "present"], indicating whether the
    answer contains any major errors.
 - `gross mistakes explanation`: A brief explanation of any major errors found
    in the response, formatted as "The student's response contains <major
    error> which is incorrect: <explanation>", or "absent" if there are no
    major errors.

 - `accuracy`: one of ["accurate", "mostly accurate", "mostly inaccurate",
   "inaccurate"], representing the factual accuracy of the student's response.
 - `accuracy explanation`: A concise explanation of any factual inaccuracies
   identified, formatted as "The student stated that: <inaccurate information>
   The accurate information is: ...", or "accurate" if there are no
   inaccuracies.

 - `completeness`: one of ["complete", "mostly complete", "partial",
   "incomplete"], reflecting how comprehensively the student's response covers
   the required aspects mentioned in the reference answer.
 - `completeness explanation`: A brief explanation of how the response
   compares to the reference in terms of completeness. Highlight specific
   areas that were well-covered or omitted. Use "complete" if the response
   fully matches the reference's scope.

 - `relevance`: one of ["relevant", "mostly relevant", "mostly irrelevant",
   "irrelevant"], indicating the presence of any irrelevant information in the
   student's response.
 - `relevance explanation`: A short explanation identifying parts of the
   response that were off-topic or not pertinent to the question, in the form
   "The student talked about <irrelevant part> which has no relevance to the
   question." Use "relevant" if all information was on point.

 - `overall quality`: one of ["good", "ok", "low"], indicating the overall
   quality of the response.
"#;

/// Render the grading prompt for one student's response.
pub fn render(question: &str, reference_answer: &str, response: &str) -> String {
    TEMPLATE
        .replace("{QUESTION}", question)
        .replace("{REFERENCE_ANSWER}", reference_answer)
        .replace("{RESPONSE}", response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_replaced() {
        let prompt = render("What is SVD?", "A factorization.", "Dunno.");
        assert!(prompt.contains("<question>\nWhat is SVD?\n</question>"));
        assert!(prompt.contains("<reference_answer>\nA factorization.\n</reference_answer>"));
        assert!(prompt.contains("<response>\nDunno.\n</response>"));
        assert!(!prompt.contains("{QUESTION}"));
    }
}
