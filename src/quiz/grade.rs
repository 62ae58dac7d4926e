// src/quiz/grade.rs

use serde::{Deserialize, Serialize};

/// Feedback band for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    Perfect,
    Excellent,
    Good,
    KeepTrying,
    Encouragement,
}

impl GradeBand {
    /// Band for `correct` out of `total`. Thresholds: 90, 80, 60, 40 percent.
    pub fn from_score(correct: usize, total: usize) -> Self {
        if total == 0 {
            return GradeBand::Encouragement;
        }
        // Integer comparison keeps 9/10 exactly on the 90% line.
        let scaled = correct * 100;
        if scaled >= 90 * total {
            GradeBand::Perfect
        } else if scaled >= 80 * total {
            GradeBand::Excellent
        } else if scaled >= 60 * total {
            GradeBand::Good
        } else if scaled >= 40 * total {
            GradeBand::KeepTrying
        } else {
            GradeBand::Encouragement
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GradeBand::Perfect => "Outstanding! You know this book inside and out.",
            GradeBand::Excellent => "Excellent work! Only a few slipped past you.",
            GradeBand::Good => "Good job! A little more reading and you'll master it.",
            GradeBand::KeepTrying => "Keep trying! Every session builds your knowledge.",
            GradeBand::Encouragement => "Don't give up! Read the passages and try again.",
        }
    }
}

/// Final result of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub correct: usize,
    pub total: usize,
    /// Rounded down.
    pub percentage: usize,
    pub band: GradeBand,
    pub message: String,
}

impl FinalScore {
    pub fn new(correct: usize, total: usize) -> Self {
        let band = GradeBand::from_score(correct, total);
        Self {
            correct,
            total,
            percentage: if total == 0 { 0 } else { correct * 100 / total },
            band,
            message: band.message().to_string(),
        }
    }
}
