// src/models/book.rs

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::QuizError, models::question::QuestionBank};

/// The books that have a quiz. Serialized as the URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookId {
    Daniel,
    Ezekiel,
    Habakkuk,
    Haggai,
    Job,
    John,
    Malachi,
    Psalms,
    Revelation,
    Zechariah,
    Zephaniah,
}

impl BookId {
    pub const ALL: [BookId; 11] = [
        BookId::Daniel,
        BookId::Ezekiel,
        BookId::Habakkuk,
        BookId::Haggai,
        BookId::Job,
        BookId::John,
        BookId::Malachi,
        BookId::Psalms,
        BookId::Revelation,
        BookId::Zechariah,
        BookId::Zephaniah,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            BookId::Daniel => "daniel",
            BookId::Ezekiel => "ezekiel",
            BookId::Habakkuk => "habakkuk",
            BookId::Haggai => "haggai",
            BookId::Job => "job",
            BookId::John => "john",
            BookId::Malachi => "malachi",
            BookId::Psalms => "psalms",
            BookId::Revelation => "revelation",
            BookId::Zechariah => "zechariah",
            BookId::Zephaniah => "zephaniah",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BookId::Daniel => "Daniel",
            BookId::Ezekiel => "Ezekiel",
            BookId::Habakkuk => "Habakkuk",
            BookId::Haggai => "Haggai",
            BookId::Job => "Job",
            BookId::John => "John",
            BookId::Malachi => "Malachi",
            BookId::Psalms => "Psalms",
            BookId::Revelation => "Revelation",
            BookId::Zechariah => "Zechariah",
            BookId::Zephaniah => "Zephaniah",
        }
    }

    /// Embedded question data for this book.
    fn raw_bank(self) -> &'static str {
        match self {
            BookId::Daniel => include_str!("../../data/books/daniel.json"),
            BookId::Ezekiel => include_str!("../../data/books/ezekiel.json"),
            BookId::Habakkuk => include_str!("../../data/books/habakkuk.json"),
            BookId::Haggai => include_str!("../../data/books/haggai.json"),
            BookId::Job => include_str!("../../data/books/job.json"),
            BookId::John => include_str!("../../data/books/john.json"),
            BookId::Malachi => include_str!("../../data/books/malachi.json"),
            BookId::Psalms => include_str!("../../data/books/psalms.json"),
            BookId::Revelation => include_str!("../../data/books/revelation.json"),
            BookId::Zechariah => include_str!("../../data/books/zechariah.json"),
            BookId::Zephaniah => include_str!("../../data/books/zephaniah.json"),
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BookId {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BookId::ALL
            .into_iter()
            .find(|b| b.slug() == wanted)
            .ok_or_else(|| QuizError::UnknownBook(s.to_string()))
    }
}

/// Lookup from book to its question bank.
#[derive(Debug, Clone, Default)]
pub struct Library {
    banks: HashMap<BookId, QuestionBank>,
}

impl Library {
    /// Loads every embedded bank. Fails on the first malformed one.
    pub fn embedded() -> Result<Self, QuizError> {
        let mut library = Self::default();
        for book in BookId::ALL {
            library.insert(QuestionBank::from_json(book, book.raw_bank())?);
        }
        Ok(library)
    }

    pub fn insert(&mut self, bank: QuestionBank) {
        self.banks.insert(bank.book(), bank);
    }

    pub fn bank(&self, book: BookId) -> Result<&QuestionBank, QuizError> {
        self.banks
            .get(&book)
            .ok_or_else(|| QuizError::UnknownBook(book.slug().to_string()))
    }

    /// Banks in a stable (alphabetical) order.
    pub fn banks(&self) -> Vec<&QuestionBank> {
        let mut banks: Vec<&QuestionBank> = self.banks.values().collect();
        banks.sort_by_key(|b| b.book());
        banks
    }
}

/// Summary row for the book listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub name: String,
    pub question_count: usize,
}

impl From<&QuestionBank> for BookSummary {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            id: bank.book(),
            name: bank.book().display_name().to_string(),
            question_count: bank.len(),
        }
    }
}
