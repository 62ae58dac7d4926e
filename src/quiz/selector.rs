// src/quiz/selector.rs

use rand::{Rng, seq::SliceRandom};

use crate::{
    error::QuizError,
    models::{progress::ProgressSnapshot, question::Question},
};

/// Questions eligible for a new session.
///
/// Questions the user already answered correctly are skipped. When that
/// leaves nothing, the whole bank is eligible again so mastered books can
/// still be reviewed.
pub fn candidate_pool<'a>(
    bank: &'a [Question],
    snapshot: Option<&ProgressSnapshot>,
) -> Vec<&'a Question> {
    let available: Vec<&Question> = match snapshot {
        Some(snapshot) => bank
            .iter()
            .filter(|q| !snapshot.answered_correctly(q.id))
            .collect(),
        None => bank.iter().collect(),
    };

    if available.is_empty() {
        bank.iter().collect()
    } else {
        available
    }
}

/// Draws up to `count` questions in uniformly random order.
pub fn select_questions<R>(
    bank: &[Question],
    snapshot: Option<&ProgressSnapshot>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError>
where
    R: Rng + ?Sized,
{
    if bank.is_empty() {
        return Err(QuizError::Configuration(
            "cannot draw a session from an empty question bank".to_string(),
        ));
    }

    let mut available = candidate_pool(bank, snapshot);
    // Fisher-Yates; every permutation is equally likely.
    available.shuffle(rng);
    available.truncate(count);

    Ok(available.into_iter().cloned().collect())
}
