use std::ops::RangeInclusive;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feedback::{Effect, Notice, Reply, Sound};
use crate::session::input::{AnswerError, parse_answer};
use crate::session::result::TableSummary;

pub const BASES: RangeInclusive<u32> = 1..=20;
pub const MULTIPLIERS: RangeInclusive<u32> = 1..=10;
/// Wrong answers allowed before the answer is revealed.
pub const MAX_WRONG: u32 = 2;

pub const CORRECT_PAUSE: Duration = Duration::from_millis(1000);
pub const REVEAL_PAUSE: Duration = Duration::from_millis(1500);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("times tables go from 1 to 20 (got {0})")]
    BaseOutOfRange(u32),

    #[error("answer the current question first")]
    NotResolved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub base: u32,
    pub multiplier: u32,
    pub product: u32,
}

fn check_base(base: u32) -> Result<(), TableError> {
    if BASES.contains(&base) {
        Ok(())
    } else {
        Err(TableError::BaseOutOfRange(base))
    }
}

/// The reference table `base × 1` through `base × 10`.
pub fn times_table(base: u32) -> Result<Vec<TableRow>, TableError> {
    check_base(base)?;
    Ok(MULTIPLIERS
        .map(|multiplier| TableRow {
            base,
            multiplier,
            product: base * multiplier,
        })
        .collect())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuestion {
    pub multiplier: u32,
    pub answer: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableAnswer {
    /// `scored` is false when the right answer came after a miss.
    Correct { scored: bool },
    TryAgain,
    Revealed { answer: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableAdvance {
    Next(TableQuestion),
    Finished(TableSummary),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableQuizView {
    pub base: u32,
    pub multiplier: u32,
    pub progress_label: String,
    pub progress: f64,
    pub score: u32,
    pub input_enabled: bool,
    pub feedback: Option<Notice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuiz {
    pub base: u32,
    pub questions: Vec<TableQuestion>,
    pub index: usize,
    pub score: u32,
    /// Wrong answers on the current question.
    pub misses: u32,
    resolution: Option<TableAnswer>,
    feedback: Option<Notice>,
    summary: Option<TableSummary>,
}

impl TableQuiz {
    /// Ten questions `base × 1..=10` in shuffled order.
    pub fn new(base: u32, rng: &mut SmallRng) -> Result<Self, TableError> {
        check_base(base)?;
        let mut questions: Vec<TableQuestion> = MULTIPLIERS
            .map(|multiplier| TableQuestion {
                multiplier,
                answer: base * multiplier,
            })
            .collect();
        questions.shuffle(rng);
        log::debug!(
            "table quiz for {base}: {:?}",
            questions.iter().map(|q| q.multiplier).collect::<Vec<_>>()
        );

        Ok(Self {
            base,
            questions,
            index: 0,
            score: 0,
            misses: 0,
            resolution: None,
            feedback: None,
            summary: None,
        })
    }

    pub fn current(&self) -> Option<&TableQuestion> {
        if self.summary.is_some() {
            return None;
        }
        self.questions.get(self.index)
    }

    pub fn summary(&self) -> Option<&TableSummary> {
        self.summary.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// How long the front end should wait before calling [`advance`].
    ///
    /// [`advance`]: TableQuiz::advance
    pub fn pause(&self) -> Option<Duration> {
        match self.resolution? {
            TableAnswer::Revealed { .. } => Some(REVEAL_PAUSE),
            _ => Some(CORRECT_PAUSE),
        }
    }

    pub fn submit(&mut self, raw: &str) -> Result<Reply<TableAnswer>, AnswerError> {
        let question = match self.current() {
            Some(q) if !self.is_resolved() => *q,
            _ => return Err(AnswerError::QuestionClosed),
        };
        let value = parse_answer(raw)?;

        if value == i64::from(question.answer) {
            let scored = self.misses == 0;
            if scored {
                self.score += 1;
            }
            let outcome = TableAnswer::Correct { scored };
            self.resolution = Some(outcome);
            self.feedback = Some(Notice::correct(format!(
                "\u{2705} {} \u{00d7} {} = {}",
                self.base, question.multiplier, question.answer
            )));
            return Ok(Reply::new(outcome, vec![Effect::Sound(Sound::Correct)]));
        }

        self.misses += 1;
        let outcome = if self.misses >= MAX_WRONG {
            self.feedback = Some(Notice::wrong(format!(
                "The answer is {}",
                question.answer
            )));
            let revealed = TableAnswer::Revealed {
                answer: question.answer,
            };
            self.resolution = Some(revealed);
            revealed
        } else {
            self.feedback = Some(Notice::wrong("\u{274c} Try again!"));
            TableAnswer::TryAgain
        };
        Ok(Reply::new(outcome, vec![Effect::Sound(Sound::Wrong)]))
    }

    pub fn advance(&mut self) -> Result<Reply<TableAdvance>, TableError> {
        if !self.is_resolved() {
            return Err(TableError::NotResolved);
        }
        self.index += 1;
        self.misses = 0;
        self.resolution = None;
        self.feedback = None;

        match self.questions.get(self.index) {
            Some(&question) => Ok(Reply::quiet(TableAdvance::Next(question))),
            None => {
                let summary = TableSummary::new(self.base, self.score, self.questions.len() as u32);
                log::debug!("table quiz for {} finished: {}/{}", self.base, summary.score, summary.total);
                let effects = summary.tier.effects();
                self.summary = Some(summary.clone());
                Ok(Reply::new(TableAdvance::Finished(summary), effects))
            }
        }
    }

    pub fn view(&self) -> Option<TableQuizView> {
        let question = self.current()?;
        let total = self.questions.len();
        Some(TableQuizView {
            base: self.base,
            multiplier: question.multiplier,
            progress_label: format!("{} / {total}", self.index + 1),
            progress: self.index as f64 / total as f64,
            score: self.score,
            input_enabled: !self.is_resolved(),
            feedback: self.feedback.clone(),
        })
    }
}
