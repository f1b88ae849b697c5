//! Core data model types for aureus.
//!
//! A `Question` can only be built through [`Question::new`], which enforces
//! the record invariants: four distinct non-empty options, one of which is
//! the correct answer. Deserialization goes through the same check, so a
//! `Question` value is always playable.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::QuestionError;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// How hard the backend judged a question to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(QuestionError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// A single multiple-choice trivia question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireQuestion", into = "WireQuestion")]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_option: String,
    difficulty: Difficulty,
}

impl Question {
    /// Build a question, checking the option and answer invariants.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_option = correct_option.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                expected: OPTION_COUNT,
                actual: options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &options {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        if !options.contains(&correct_option) {
            return Err(QuestionError::CorrectNotInOptions(correct_option));
        }

        Ok(Self {
            prompt,
            options,
            correct_option,
            difficulty,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Exact-match check of a selected option.
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_option
    }
}

/// Shape of a question as the generation backend sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    difficulty: String,
}

impl TryFrom<WireQuestion> for Question {
    type Error = QuestionError;

    fn try_from(wire: WireQuestion) -> Result<Self, Self::Error> {
        let difficulty = wire.difficulty.parse()?;
        Question::new(wire.question, wire.options, wire.correct_answer, difficulty)
    }
}

impl From<Question> for WireQuestion {
    fn from(q: Question) -> Self {
        Self {
            question: q.prompt,
            options: q.options,
            correct_answer: q.correct_option,
            difficulty: q.difficulty.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(
            "legendary".parse::<Difficulty>(),
            Err(QuestionError::UnknownDifficulty("legendary".into()))
        );
    }

    #[test]
    fn valid_question() {
        let q = Question::new(
            "Who wrote the Odyssey?",
            opts(&["Homer", "Virgil", "Ovid", "Sappho"]),
            "Homer",
            Difficulty::Easy,
        )
        .unwrap();
        assert_eq!(q.options().len(), OPTION_COUNT);
        assert!(q.options().contains(&q.correct_option().to_string()));
        assert!(q.is_correct("Homer"));
        assert!(!q.is_correct("homer"));
    }

    #[test]
    fn rejects_correct_answer_outside_options() {
        let err = Question::new(
            "Who wrote the Aeneid?",
            opts(&["Homer", "Hesiod", "Ovid", "Sappho"]),
            "Virgil",
            Difficulty::Medium,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::CorrectNotInOptions("Virgil".into()));
    }

    #[test]
    fn rejects_wrong_option_count() {
        let err = Question::new("Q?", opts(&["A", "B", "C"]), "A", Difficulty::Easy).unwrap_err();
        assert_eq!(
            err,
            QuestionError::WrongOptionCount {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn rejects_duplicate_and_empty_options() {
        let dup = Question::new("Q?", opts(&["A", "B", "A", "C"]), "A", Difficulty::Easy);
        assert_eq!(dup.unwrap_err(), QuestionError::DuplicateOption("A".into()));

        let empty = Question::new("Q?", opts(&["A", " ", "B", "C"]), "A", Difficulty::Easy);
        assert_eq!(empty.unwrap_err(), QuestionError::EmptyOption);

        let no_prompt = Question::new("  ", opts(&["A", "B", "C", "D"]), "A", Difficulty::Easy);
        assert_eq!(no_prompt.unwrap_err(), QuestionError::EmptyPrompt);
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"{
            "question": "What is the chemical symbol for Gold?",
            "options": ["Ag", "Au", "Fe", "Cu"],
            "correctAnswer": "Au",
            "difficulty": "Easy"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_option(), "Au");
        assert_eq!(q.difficulty(), Difficulty::Easy);

        let back = serde_json::to_value(&q).unwrap();
        assert_eq!(back["correctAnswer"], "Au");
        assert_eq!(back["question"], "What is the chemical symbol for Gold?");
    }

    #[test]
    fn deserialization_enforces_invariants() {
        let json = r#"{
            "question": "What is the chemical symbol for Gold?",
            "options": ["Ag", "Au", "Fe", "Cu"],
            "correctAnswer": "Pb",
            "difficulty": "Easy"
        }"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }
}
