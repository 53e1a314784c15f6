use serde::{Deserialize, Serialize};

use crate::engine::operation::Operation;
use crate::engine::scoring::{self, QuizTier, TableTier};
use crate::generator::DigitLevel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub operation: Operation,
    pub level: DigitLevel,
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub stars: u32,
    pub tier: QuizTier,
    pub best_streak: u32,
}

impl QuizSummary {
    pub fn new(
        operation: Operation,
        level: DigitLevel,
        score: u32,
        total: u32,
        best_streak: u32,
    ) -> Self {
        let percentage = scoring::percentage(score, total);
        Self {
            operation,
            level,
            score,
            total,
            percentage,
            stars: scoring::quiz_stars(score, total),
            tier: QuizTier::from_percentage(percentage),
            best_streak,
        }
    }

    pub fn headline(&self) -> String {
        format!("You scored {} out of {}", self.score, self.total)
    }

    pub fn message(&self) -> &'static str {
        self.tier.message()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub base: u32,
    pub score: u32,
    pub total: u32,
    /// Rounded to a whole number before tiering.
    pub percentage: u32,
    pub tier: TableTier,
}

impl TableSummary {
    pub fn new(base: u32, score: u32, total: u32) -> Self {
        let percentage = scoring::percentage(score, total).round() as u32;
        Self {
            base,
            score,
            total,
            percentage,
            tier: TableTier::from_percentage(percentage),
        }
    }

    pub fn stars(&self) -> u32 {
        self.tier.stars()
    }

    pub fn message(&self) -> &'static str {
        self.tier.message()
    }
}
