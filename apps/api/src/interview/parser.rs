//! Extraction of structured data from the model's free-form text.
//!
//! The output format is only enforced by prompt instruction, so parsing is
//! best-effort. Evaluation parsing reports which fields were actually found;
//! defaults are applied in [`EvaluationParse::into_evaluation`].

use tracing::warn;

pub const DEFAULT_SCORE: f64 = 5.0;
pub const DEFAULT_FEEDBACK: &str = "Good effort. Keep practicing to improve your skills.";

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 10.0;

/// Splits numbered model output into question strings.
///
/// Text before the first period on a line is dropped (the "1." numbering).
/// Lines without a period pass through unchanged.
pub fn parse_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match line.split_once('.') {
            Some((_, rest)) => {
                let question = rest.trim();
                (!question.is_empty()).then(|| question.to_string())
            }
            None => Some(line.to_string()),
        })
        .collect()
}

/// Raw result of scanning an evaluation reply.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationParse {
    /// Last in-range `Score:` value, if any.
    pub score: Option<f64>,
    /// Space-joined text from the last `Feedback:` marker onward.
    pub feedback: Option<String>,
}

/// Evaluation with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub feedback: String,
}

impl Evaluation {
    /// Returned when the model answered with no content at all.
    pub fn unavailable() -> Self {
        Self {
            score: DEFAULT_SCORE,
            feedback: "Unable to evaluate answer at this time.".to_string(),
        }
    }
}

impl EvaluationParse {
    pub fn into_evaluation(self) -> Evaluation {
        let score = self.score.unwrap_or_else(|| {
            warn!("Evaluation reply had no usable score; using default {DEFAULT_SCORE}");
            DEFAULT_SCORE
        });
        let feedback = self.feedback.unwrap_or_else(|| {
            warn!("Evaluation reply had no feedback line; using default feedback");
            DEFAULT_FEEDBACK.to_string()
        });
        Evaluation { score, feedback }
    }
}

/// Scans `Score:` and `Feedback:` lines (case-insensitive).
///
/// Lines before the first feedback marker are ignored unless they carry a score.
/// Every later non-empty line is appended to the feedback.
pub fn parse_evaluation(text: &str) -> EvaluationParse {
    let mut score = None;
    let mut feedback: Option<Vec<&str>> = None;

    for line in text.lines().map(str::trim) {
        if let Some(rest) = strip_prefix_ignore_case(line, "score:") {
            match parse_score(rest) {
                Some(value) => score = Some(value),
                None => warn!("Discarding unusable score text: {rest:?}"),
            }
        } else if let Some(rest) = strip_prefix_ignore_case(line, "feedback:") {
            let rest = rest.trim();
            feedback = Some(if rest.is_empty() { vec![] } else { vec![rest] });
        } else if let Some(parts) = feedback.as_mut() {
            if !line.is_empty() {
                parts.push(line);
            }
        }
    }

    EvaluationParse {
        score,
        feedback: feedback
            .map(|parts| parts.join(" "))
            .filter(|joined| !joined.is_empty()),
    }
}

/// Reads a decimal score, tolerating an "X/10" form. Out-of-range values are rejected.
fn parse_score(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.split_once('/').map_or(text, |(before, _)| before.trim());
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    let value: f64 = text[..end].trim_end_matches('.').parse().ok()?;
    (MIN_SCORE..=MAX_SCORE).contains(&value).then_some(value)
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}
