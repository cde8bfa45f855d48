//! Shared data model types for trivia questions and API responses.

use serde::Deserialize;

/// The three difficulties the API is known to produce, in display order.
pub const KNOWN_DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

/// A single trivia question as returned by the Open Trivia DB.
///
/// Every field defaults when absent so that malformed records are still indexed
/// (under the empty-string key) instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Question {
    /// Question kind, e.g. "multiple" or "boolean".
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw difficulty string. Usually one of [`KNOWN_DIFFICULTIES`].
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// Top-level body of `api.php`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    /// Open Trivia DB status code (0 = success).
    pub response_code: i64,
    pub results: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_question_deserializes_api_record() {
        let value = json!({
            "type": "multiple",
            "difficulty": "easy",
            "category": "Entertainment: Music",
            "question": "Who sang &quot;Hello&quot;?",
            "correct_answer": "Adele",
            "incorrect_answers": ["Lionel Richie", "Beyonc&eacute;", "Sia"]
        });
        let q: Question = serde_json::from_value(value).unwrap();
        assert_eq!(q.kind, "multiple");
        assert_eq!(q.difficulty, "easy");
        assert_eq!(q.incorrect_answers.len(), 3);
        // Deserialization never decodes entities.
        assert_eq!(q.question, "Who sang &quot;Hello&quot;?");
    }

    #[test]
    fn test_question_missing_fields_default_to_empty() {
        let q: Question = serde_json::from_value(json!({"question": "Q"})).unwrap();
        assert_eq!(q.category, "");
        assert_eq!(q.difficulty, "");
        assert!(q.incorrect_answers.is_empty());
    }

    #[test]
    fn test_api_response_without_results() {
        let resp: ApiResponse = serde_json::from_str(r#"{"response_code": 1}"#).unwrap();
        assert_eq!(resp.response_code, 1);
        assert!(resp.results.is_empty());
    }
}
