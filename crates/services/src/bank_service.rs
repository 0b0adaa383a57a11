use std::path::Path;

use serde::Deserialize;
use tracing::info;

use quiz_core::model::{Question, QuestionBank};

use crate::error::BankLoadError;

// Wire shape of the bank document:
// {"ddt-questions": {"state": {"allQuestions": [Question, ...]}}}
#[derive(Debug, Deserialize)]
struct BankDocument {
    #[serde(rename = "ddt-questions")]
    ddt_questions: BankEnvelope,
}

#[derive(Debug, Deserialize)]
struct BankEnvelope {
    state: BankState,
}

#[derive(Debug, Deserialize)]
struct BankState {
    #[serde(rename = "allQuestions")]
    all_questions: Vec<Question>,
}

/// Loads the question bank once at startup, from a URL or a local file.
#[derive(Clone, Default)]
pub struct BankLoader {
    client: reqwest::Client,
}

impl BankLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the bank from `source`: an `http(s)://` URL or a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError` when the fetch, read, parse, or validation
    /// fails. All of these are fatal; nothing retries a bank load.
    pub async fn load(&self, source: &str) -> Result<QuestionBank, BankLoadError> {
        let raw = if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch(source).await?
        } else {
            tokio::fs::read_to_string(Path::new(source)).await?
        };
        let bank = Self::parse(&raw)?;
        info!(
            questions = bank.len(),
            sections = bank.sections().len(),
            source,
            "question bank loaded"
        );
        Ok(bank)
    }

    /// Parse a bank document into a validated bank.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError::Parse` for malformed JSON and
    /// `BankLoadError::Bank` when the question list fails validation or is
    /// empty.
    pub fn parse(raw: &str) -> Result<QuestionBank, BankLoadError> {
        let document: BankDocument = serde_json::from_str(raw)?;
        let bank = QuestionBank::new(document.ddt_questions.state.all_questions)?;
        Ok(bank)
    }

    async fn fetch(&self, url: &str) -> Result<String, BankLoadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BankLoadError::HttpStatus(status));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{BankError, QuestionIndex};

    fn document(questions: &str) -> String {
        format!(r#"{{"ddt-questions": {{"state": {{"allQuestions": [{questions}]}}}}}}"#)
    }

    fn question_json(index: u32, correct: usize) -> String {
        format!(
            r#"{{"index": {index}, "section": "Signs", "question": "Q{index}?",
                "options": ["a", "b", "c"], "correct_answer": {correct},
                "explanation": "E{index}"}}"#
        )
    }

    #[test]
    fn parses_nested_document_shape() {
        let raw = document(&format!("{}, {}", question_json(1, 0), question_json(2, 2)));
        let bank = BankLoader::parse(&raw).unwrap();
        assert_eq!(bank.len(), 2);
        assert!(bank.contains(QuestionIndex::new(2)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = BankLoader::parse("{not json").unwrap_err();
        assert!(matches!(err, BankLoadError::Parse(_)));
    }

    #[test]
    fn missing_envelope_is_a_parse_error() {
        let err = BankLoader::parse(r#"{"allQuestions": []}"#).unwrap_err();
        assert!(matches!(err, BankLoadError::Parse(_)));
    }

    #[test]
    fn empty_question_list_is_a_bank_error() {
        let err = BankLoader::parse(&document("")).unwrap_err();
        assert!(matches!(err, BankLoadError::Bank(BankError::Empty)));
    }

    #[test]
    fn invalid_correct_answer_is_rejected() {
        let raw = document(&question_json(1, 5));
        let err = BankLoader::parse(&raw).unwrap_err();
        assert!(matches!(err, BankLoadError::Bank(BankError::Question(_))));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let loader = BankLoader::new();
        let err = loader.load("/nonexistent/questions.json").await.unwrap_err();
        assert!(matches!(err, BankLoadError::Io(_)));
    }
}
