//! Backend response parser.
//!
//! Turns the text a generation backend returns into validated questions.

use serde::Deserialize;

use crate::error::ParseError;
use crate::model::{Question, WireQuestion};

/// Accepted top-level payload shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<WireQuestion>),
    Wrapped { questions: Vec<WireQuestion> },
}

/// Parse a backend response into exactly `count` questions.
///
/// Extra records beyond `count` are dropped. Fewer records, an empty body,
/// malformed JSON or any record that breaks the question invariants is an
/// error.
pub fn parse_questions(response: &str, count: usize) -> Result<Vec<Question>, ParseError> {
    let payload = extract_json_payload(response);
    if payload.is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let records = match serde_json::from_str::<Payload>(payload)? {
        Payload::List(records) => records,
        Payload::Wrapped { questions } => questions,
    };

    if records.len() < count {
        return Err(ParseError::TooFewQuestions {
            expected: count,
            actual: records.len(),
        });
    }
    if records.len() > count {
        tracing::debug!(
            "backend returned {} questions, keeping the first {count}",
            records.len()
        );
    }

    records
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(index, wire)| {
            Question::try_from(wire).map_err(|source| ParseError::InvalidQuestion { index, source })
        })
        .collect()
}

/// Strip a markdown code fence around a JSON payload, if present.
///
/// Prefers a ```json block, then a bare ``` block; unfenced text is returned
/// trimmed. An unclosed fence (truncated response) yields what was captured.
pub fn extract_json_payload(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(fence_start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_fence = &trimmed[fence_start + 3..];
    let body_start = match after_fence.find('\n') {
        Some(newline) => {
            let lang = after_fence[..newline].trim().to_lowercase();
            if !lang.is_empty() && lang != "json" {
                return trimmed;
            }
            newline + 1
        }
        None => return trimmed,
    };

    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuestionError;
    use crate::model::Difficulty;

    const THREE_QUESTIONS: &str = r#"[
        {"question": "Who sculpted David?", "options": ["Donatello", "Michelangelo", "Bernini", "Rodin"], "correctAnswer": "Michelangelo", "difficulty": "Easy"},
        {"question": "Who composed The Four Seasons?", "options": ["Bach", "Handel", "Vivaldi", "Corelli"], "correctAnswer": "Vivaldi", "difficulty": "Medium"},
        {"question": "Which Titan carried the sky?", "options": ["Cronus", "Atlas", "Hyperion", "Oceanus"], "correctAnswer": "Atlas", "difficulty": "Hard"}
    ]"#;

    #[test]
    fn parse_plain_array() {
        let questions = parse_questions(THREE_QUESTIONS, 3).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1].correct_option(), "Vivaldi");
        assert_eq!(questions[2].difficulty(), Difficulty::Hard);
    }

    #[test]
    fn parse_fenced_payload() {
        let fenced = format!("Here are your questions:\n\n```json\n{THREE_QUESTIONS}\n```\n");
        let questions = parse_questions(&fenced, 3).unwrap();
        assert_eq!(questions[0].prompt(), "Who sculpted David?");
    }

    #[test]
    fn parse_wrapped_object() {
        let wrapped = format!(r#"{{"questions": {THREE_QUESTIONS}}}"#);
        let questions = parse_questions(&wrapped, 3).unwrap();
        assert_eq!(questions.len(), 3);
    }

    #[test]
    fn extra_questions_are_truncated() {
        let questions = parse_questions(THREE_QUESTIONS, 2).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].correct_option(), "Vivaldi");
    }

    #[test]
    fn too_few_questions_is_an_error() {
        let err = parse_questions(THREE_QUESTIONS, 5).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TooFewQuestions {
                expected: 5,
                actual: 3
            }
        ));
        assert!(matches!(
            parse_questions("[]", 1),
            Err(ParseError::TooFewQuestions { .. })
        ));
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(matches!(parse_questions("", 3), Err(ParseError::EmptyResponse)));
        assert!(matches!(
            parse_questions("  \n ", 3),
            Err(ParseError::EmptyResponse)
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_questions("the oracle is silent", 3),
            Err(ParseError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_questions(r#"[{"question": "missing fields"}]"#, 1),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn invalid_record_reports_index() {
        let bad = r#"[
            {"question": "Q1", "options": ["A", "B", "C", "D"], "correctAnswer": "A", "difficulty": "Easy"},
            {"question": "Q2", "options": ["A", "B", "C", "D"], "correctAnswer": "E", "difficulty": "Easy"}
        ]"#;
        let err = parse_questions(bad, 2).unwrap_err();
        match err {
            ParseError::InvalidQuestion { index, source } => {
                assert_eq!(index, 1);
                assert_eq!(source, QuestionError::CorrectNotInOptions("E".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let bad = r#"[{"question": "Q", "options": ["A", "B", "C", "D"], "correctAnswer": "A", "difficulty": "Impossible"}]"#;
        assert!(matches!(
            parse_questions(bad, 1),
            Err(ParseError::InvalidQuestion {
                index: 0,
                source: QuestionError::UnknownDifficulty(_)
            })
        ));
    }

    #[test]
    fn extract_unfenced_returns_trimmed() {
        assert_eq!(extract_json_payload("  [1, 2]\n"), "[1, 2]");
    }

    #[test]
    fn extract_bare_fence() {
        assert_eq!(extract_json_payload("```\n[1]\n```"), "[1]");
    }

    #[test]
    fn extract_truncated_fence() {
        assert_eq!(extract_json_payload("```json\n[1, 2"), "[1, 2");
    }

    #[test]
    fn extract_ignores_other_languages() {
        let input = "```python\nprint(1)\n```";
        assert_eq!(extract_json_payload(input), input);
    }
}
