// src/models/question.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{error::QuizError, models::book::BookId};

/// One labeled choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Single-letter tag, e.g. 'A'.
    pub label: char,
    pub text: String,
}

/// A quiz question as stored in a book's bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within the book's bank.
    pub id: i64,

    pub prompt: String,

    pub options: Vec<AnswerOption>,

    /// Label of the correct option.
    pub correct: char,

    /// Scripture reference, possibly listing several passages ("Ezekiel 10, 43").
    pub reference: String,

    /// Display text for `reference`, cached once fetched during a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_text: Option<String>,

    pub explanation: String,
}

impl Question {
    pub fn has_option(&self, label: char) -> bool {
        self.options.iter().any(|o| o.label == label)
    }

    pub fn is_correct(&self, label: char) -> bool {
        self.correct == label
    }

    /// Checks the per-question invariants: unique labels and a resolvable correct label.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.options.is_empty() {
            return Err(QuizError::Configuration(format!(
                "question {} has no options",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.label) {
                return Err(QuizError::Configuration(format!(
                    "question {} repeats option label '{}'",
                    self.id, option.label
                )));
            }
        }

        if !self.has_option(self.correct) {
            return Err(QuizError::Configuration(format!(
                "question {} marks '{}' correct but has no such option",
                self.id, self.correct
            )));
        }

        Ok(())
    }
}

/// DTO for sending a question to the client (excludes the answer and explanation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
    pub reference: String,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            reference: q.reference.clone(),
        }
    }
}

/// A validated, non-empty set of questions for one book.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    book: BookId,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank, rejecting empty or malformed content.
    pub fn new(book: BookId, questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Configuration(format!(
                "question bank for {} is empty",
                book
            )));
        }

        let mut ids = HashSet::new();
        for question in &questions {
            if !ids.insert(question.id) {
                return Err(QuizError::Configuration(format!(
                    "question bank for {} repeats id {}",
                    book, question.id
                )));
            }
            question.validate()?;
        }

        Ok(Self { book, questions })
    }

    /// Parses and validates a JSON array of questions.
    pub fn from_json(book: BookId, raw: &str) -> Result<Self, QuizError> {
        let questions: Vec<Question> = serde_json::from_str(raw).map_err(|e| {
            QuizError::Configuration(format!("question bank for {} is not valid JSON: {}", book, e))
        })?;
        Self::new(book, questions)
    }

    pub fn book(&self) -> BookId {
        self.book
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

#[cfg(test)]
pub(crate) fn sample_question(id: i64) -> Question {
    Question {
        id,
        prompt: format!("Question {}", id),
        options: vec![
            AnswerOption { label: 'A', text: "First".to_string() },
            AnswerOption { label: 'B', text: "Second".to_string() },
            AnswerOption { label: 'C', text: "Third".to_string() },
            AnswerOption { label: 'D', text: "Fourth".to_string() },
        ],
        correct: 'B',
        reference: format!("Daniel {}:1", id),
        verse_text: None,
        explanation: "Because it is written.".to_string(),
    }
}
