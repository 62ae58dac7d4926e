// src/quiz/session.rs

//! The quiz session state machine.
//!
//! `NotStarted -> InProgress { Unanswered | Revealed } -> Completed`
//!
//! The machine does no I/O. Answering returns [`SessionEvent`]s that the
//! caller dispatches to the progress store and the verse lookup.
//! Every mutation after completion is rejected with
//! [`QuizError::InvalidSession`].

use crate::{
    error::QuizError,
    models::{book::BookId, question::Question},
    quiz::grade::FinalScore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Unanswered,
    Revealed,
    Completed,
}

/// Side effects requested by the session. Dispatched outside the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    AnswerSubmitted {
        book: BookId,
        question_id: i64,
        is_correct: bool,
    },
    VerseRequested {
        question_id: i64,
        reference: String,
    },
}

/// Result of [`QuizSession::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this position.
    Next(usize),
    Completed(FinalScore),
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    book: BookId,
    questions: Vec<Question>,
    phase: Phase,
    position: usize,
    correct_count: usize,
    selected: Option<char>,
}

impl QuizSession {
    pub fn new(book: BookId) -> Self {
        Self {
            book,
            questions: Vec::new(),
            phase: Phase::NotStarted,
            position: 0,
            correct_count: 0,
            selected: None,
        }
    }

    /// Fixes the question order for the whole session.
    pub fn start(&mut self, questions: Vec<Question>) -> Result<(), QuizError> {
        if self.phase != Phase::NotStarted {
            return Err(QuizError::InvalidSession(
                "session has already been started".to_string(),
            ));
        }
        if questions.is_empty() {
            return Err(QuizError::InvalidSession(
                "cannot start a session without questions".to_string(),
            ));
        }

        self.questions = questions;
        self.phase = Phase::Unanswered;
        self.position = 0;
        self.correct_count = 0;
        self.selected = None;
        Ok(())
    }

    /// Answers the current question.
    ///
    /// The first answer wins: once the question is revealed further calls
    /// change nothing and return no events.
    pub fn select_answer(&mut self, label: char) -> Result<Vec<SessionEvent>, QuizError> {
        match self.phase {
            Phase::NotStarted => {
                return Err(QuizError::InvalidSession(
                    "session has not been started".to_string(),
                ));
            }
            Phase::Completed => {
                return Err(QuizError::InvalidSession(
                    "session is already completed".to_string(),
                ));
            }
            Phase::Revealed => return Ok(Vec::new()),
            Phase::Unanswered => {}
        }

        let question = &self.questions[self.position];
        if !question.has_option(label) {
            return Err(QuizError::InvalidSession(format!(
                "question {} has no option '{}'",
                question.id, label
            )));
        }

        let is_correct = question.is_correct(label);
        let mut events = vec![SessionEvent::AnswerSubmitted {
            book: self.book,
            question_id: question.id,
            is_correct,
        }];
        if question.verse_text.is_none() {
            events.push(SessionEvent::VerseRequested {
                question_id: question.id,
                reference: question.reference.clone(),
            });
        }

        if is_correct {
            self.correct_count += 1;
        }
        self.selected = Some(label);
        self.phase = Phase::Revealed;

        Ok(events)
    }

    /// Moves past a revealed question, completing the session after the last one.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        match self.phase {
            Phase::Revealed => {}
            Phase::Unanswered => {
                return Err(QuizError::InvalidSession(
                    "current question has not been answered".to_string(),
                ));
            }
            Phase::NotStarted => {
                return Err(QuizError::InvalidSession(
                    "session has not been started".to_string(),
                ));
            }
            Phase::Completed => {
                return Err(QuizError::InvalidSession(
                    "session is already completed".to_string(),
                ));
            }
        }

        if self.position + 1 < self.questions.len() {
            self.position += 1;
            self.selected = None;
            self.phase = Phase::Unanswered;
            Ok(Advance::Next(self.position))
        } else {
            self.phase = Phase::Completed;
            Ok(Advance::Completed(self.final_score()))
        }
    }

    /// Caches fetched verse text on the in-session copy. Never overwrites.
    /// Returns whether the text was stored.
    pub fn attach_verse_text(&mut self, question_id: i64, text: String) -> bool {
        match self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id && q.verse_text.is_none())
        {
            Some(question) => {
                question.verse_text = Some(text);
                true
            }
            None => false,
        }
    }

    pub fn book(&self) -> BookId {
        self.book
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Unanswered | Phase::Revealed => self.questions.get(self.position),
            Phase::NotStarted | Phase::Completed => None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> usize {
        self.correct_count
    }

    pub fn selected_answer(&self) -> Option<char> {
        self.selected
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == Phase::Revealed
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Only meaningful once completed.
    pub fn final_score(&self) -> FinalScore {
        FinalScore::new(self.correct_count, self.questions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::question::sample_question, quiz::grade::GradeBand};

    fn started(n: i64) -> QuizSession {
        let mut session = QuizSession::new(BookId::Daniel);
        session
            .start((1..=n).map(sample_question).collect())
            .unwrap();
        session
    }

    #[test]
    fn start_twice_or_empty_is_rejected() {
        let mut empty = QuizSession::new(BookId::Job);
        assert!(matches!(
            empty.start(vec![]),
            Err(QuizError::InvalidSession(_))
        ));
        assert_eq!(empty.phase(), Phase::NotStarted);

        let mut session = started(2);
        assert!(matches!(
            session.start(vec![sample_question(9)]),
            Err(QuizError::InvalidSession(_))
        ));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn select_before_start_is_rejected() {
        let mut session = QuizSession::new(BookId::Job);
        assert!(session.select_answer('A').is_err());
        assert!(session.advance().is_err());
    }

    #[test]
    fn correct_answer_scores_and_requests_side_effects() {
        let mut session = started(2);
        let events = session.select_answer('B').unwrap();

        assert_eq!(session.score(), 1);
        assert!(session.is_revealed());
        assert_eq!(session.selected_answer(), Some('B'));
        assert_eq!(
            events,
            vec![
                SessionEvent::AnswerSubmitted {
                    book: BookId::Daniel,
                    question_id: 1,
                    is_correct: true,
                },
                SessionEvent::VerseRequested {
                    question_id: 1,
                    reference: "Daniel 1:1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn first_answer_wins() {
        let mut session = started(2);
        session.select_answer('A').unwrap();

        for label in ['B', 'C', 'A', 'Z'] {
            let events = session.select_answer(label).unwrap();
            assert!(events.is_empty());
            assert_eq!(session.selected_answer(), Some('A'));
            assert_eq!(session.score(), 0);
            assert!(session.is_revealed());
        }
    }

    #[test]
    fn unknown_label_leaves_state_untouched() {
        let mut session = started(1);
        assert!(matches!(
            session.select_answer('Q'),
            Err(QuizError::InvalidSession(_))
        ));
        assert_eq!(session.phase(), Phase::Unanswered);
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn advance_requires_reveal() {
        let mut session = started(2);
        assert!(matches!(
            session.advance(),
            Err(QuizError::InvalidSession(_))
        ));
        session.select_answer('C').unwrap();
        assert_eq!(session.advance().unwrap(), Advance::Next(1));
        assert_eq!(session.selected_answer(), None);
        assert!(!session.is_revealed());
        assert_eq!(session.current_question().unwrap().id, 2);
    }

    #[test]
    fn completing_freezes_the_session() {
        let mut session = started(3);
        let answers = ['B', 'A', 'B'];
        for (i, label) in answers.into_iter().enumerate() {
            session.select_answer(label).unwrap();
            let step = session.advance().unwrap();
            if i < 2 {
                assert_eq!(step, Advance::Next(i + 1));
            } else {
                match step {
                    Advance::Completed(score) => {
                        assert_eq!(score.correct, 2);
                        assert_eq!(score.total, 3);
                        assert_eq!(score.band, GradeBand::Good);
                    }
                    other => panic!("expected completion, got {:?}", other),
                }
            }
        }

        assert!(session.is_completed());
        assert!(session.current_question().is_none());
        assert!(session.select_answer('B').is_err());
        assert!(session.advance().is_err());
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn score_matches_correct_selections() {
        let mut session = started(10);
        let mut expected = 0;
        for i in 0..10 {
            let label = if i % 3 == 0 { 'B' } else { 'D' };
            if label == 'B' {
                expected += 1;
            }
            session.select_answer(label).unwrap();
            assert!(session.score() <= session.position() + 1);
            session.advance().unwrap();
        }
        assert_eq!(session.final_score().correct, expected);
        assert!(session.final_score().correct <= session.len());
    }

    #[test]
    fn cached_verse_is_not_requested_again() {
        let mut session = started(1);
        assert!(session.attach_verse_text(1, "In the third year...".to_string()));
        assert!(!session.attach_verse_text(1, "overwritten".to_string()));
        assert_eq!(
            session.questions()[0].verse_text.as_deref(),
            Some("In the third year...")
        );

        let events = session.select_answer('B').unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::AnswerSubmitted { .. }));
    }
}
