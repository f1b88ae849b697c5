//! Prompt and response schema for trivia generation.

use serde_json::{json, Value};

use crate::model::OPTION_COUNT;

/// System instruction sent alongside every trivia request.
pub const SYSTEM_PROMPT: &str = "You are the Oracle, a trivia master. Respond ONLY with a JSON array of question objects. Each object has the keys \"question\", \"options\" (a list of exactly 4 distinct answers), \"correctAnswer\" (exactly one of the strings from \"options\") and \"difficulty\" (one of \"Easy\", \"Medium\", \"Hard\"). Do not add any text outside the JSON.";

/// User prompt asking for `count` questions about `topic`.
pub fn trivia_prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate {count} unique multiple-choice trivia questions about {topic}. \
         The questions should be challenging but answerable."
    )
}

/// Response schema in the OpenAPI subset generation backends accept.
pub fn question_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": format!("A list of {OPTION_COUNT} possible answers.")
                },
                "correctAnswer": {
                    "type": "STRING",
                    "description": "Must be exactly one of the strings from the options array."
                },
                "difficulty": {
                    "type": "STRING",
                    "enum": ["Easy", "Medium", "Hard"]
                }
            },
            "required": ["question", "options", "correctAnswer", "difficulty"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_topic_and_count() {
        let prompt = trivia_prompt("Mythology", 3);
        assert!(prompt.starts_with("Generate 3 unique multiple-choice trivia questions about Mythology."));
    }

    #[test]
    fn schema_requires_all_fields() {
        let schema = question_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(schema["items"]["properties"]["difficulty"]["enum"][2], "Hard");
    }
}
