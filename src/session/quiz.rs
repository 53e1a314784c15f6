use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::hints;
use crate::engine::operation::Operation;
use crate::feedback::{Effect, Notice, Reply, Sound};
use crate::generator::DigitLevel;
use crate::generator::quiz::{Problem, generate_problem};
use crate::session::input::{AnswerError, parse_answer};
use crate::session::result::QuizSummary;

pub const MAX_ATTEMPTS: u32 = 3;
pub const STREAK_BADGE_AT: u32 = 3;
pub const SUPERSTAR_AT: u32 = 5;

const AFFIRMATIONS: [&str; 5] = [
    "Awesome! That's correct!",
    "Great job! You got it!",
    "Well done! You're a math star!",
    "Perfect! Keep it up!",
    "Correct! You're amazing!",
];

const CHEERS: [&str; 7] = [
    "\u{1f389}", // party popper
    "\u{1f31f}", // glowing star
    "\u{1f44f}", // clapping
    "\u{1f3c6}", // trophy
    "\u{1f4af}", // hundred
    "\u{1f973}", // party face
    "\u{2728}",  // sparkles
];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("{} is not available as a quiz", .0.label())]
    UnsupportedOperation(Operation),

    #[error("a quiz needs at least one question")]
    NoQuestions,

    #[error("answer the current question first")]
    QuestionOpen,

    #[error("the quiz is over")]
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    pub operation: Operation,
    pub level: DigitLevel,
    pub total_questions: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionState {
    Unanswered,
    Retrying,
    Correct,
    Exhausted,
}

impl QuestionState {
    pub fn is_open(self) -> bool {
        matches!(self, QuestionState::Unanswered | QuestionState::Retrying)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    Correct {
        message: String,
        streak: u32,
        streak_badge: Option<String>,
    },
    Retry {
        remaining: u32,
        hint: String,
    },
    Exhausted {
        answer: i64,
        equation: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Advance {
    Next(Problem),
    Finished(QuizSummary),
}

/// Everything a renderer needs to draw the current question.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuizView {
    pub operation: Operation,
    pub a: u32,
    pub b: u32,
    pub symbol: &'static str,
    pub progress_label: String,
    /// Share of questions finished before the current one.
    pub progress: f64,
    pub score: u32,
    pub attempts_left: Option<u32>,
    pub input_enabled: bool,
    pub next_visible: bool,
    pub feedback: Option<Notice>,
    pub hint: Option<String>,
    pub streak_badge: Option<String>,
}

pub fn streak_badge(streak: u32) -> Option<String> {
    if streak >= SUPERSTAR_AT {
        Some(format!("\u{1f525} {streak} in a row! SUPERSTAR!"))
    } else if streak >= STREAK_BADGE_AT {
        Some(format!("\u{1f525} {streak} in a row!"))
    } else {
        None
    }
}

pub struct QuizSession {
    pub settings: QuizSettings,
    /// 1-based; exceeds `total_questions` once the quiz is over.
    pub current_index: u32,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub attempts: u32,
    pub state: QuestionState,
    problem: Option<Problem>,
    feedback: Option<Notice>,
    hint: Option<String>,
    summary: Option<QuizSummary>,
    rng: SmallRng,
}

impl QuizSession {
    pub fn start(settings: QuizSettings, rng: SmallRng) -> Result<Self, QuizError> {
        if !settings.operation.is_quiz_operation() {
            return Err(QuizError::UnsupportedOperation(settings.operation));
        }
        if settings.total_questions == 0 {
            return Err(QuizError::NoQuestions);
        }

        let mut session = Self {
            settings,
            current_index: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            attempts: 0,
            state: QuestionState::Unanswered,
            problem: None,
            feedback: None,
            hint: None,
            summary: None,
            rng,
        };
        session.advance();
        Ok(session)
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    pub fn attempts_left(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    pub fn submit_answer(&mut self, raw: &str) -> Result<Reply<AnswerOutcome>, AnswerError> {
        let problem = match self.problem {
            Some(p) if self.state.is_open() => p,
            _ => return Err(AnswerError::QuestionClosed),
        };
        let value = parse_answer(raw)?;

        self.attempts += 1;
        log::debug!(
            "question {} attempt {}: {} answered {value}",
            self.current_index,
            self.attempts,
            problem.expression()
        );

        if value == problem.answer {
            Ok(self.mark_correct())
        } else {
            Ok(self.mark_wrong(problem))
        }
    }

    fn mark_correct(&mut self) -> Reply<AnswerOutcome> {
        self.state = QuestionState::Correct;
        self.score += 1;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);

        let mut effects = Vec::new();
        let badge = streak_badge(self.streak);
        if badge.is_some() {
            effects.push(Effect::Sound(Sound::Streak));
        }

        let message = AFFIRMATIONS[self.rng.gen_range(0..AFFIRMATIONS.len())].to_string();
        let cheer = CHEERS[self.rng.gen_range(0..CHEERS.len())];
        effects.push(Effect::emoji(cheer));
        effects.push(Effect::Sound(Sound::Correct));
        effects.push(Effect::Celebrate(if self.streak >= STREAK_BADGE_AT {
            80
        } else {
            30
        }));

        self.feedback = Some(Notice::correct(message.clone()));
        self.hint = None;

        Reply::new(
            AnswerOutcome::Correct {
                message,
                streak: self.streak,
                streak_badge: badge,
            },
            effects,
        )
    }

    fn mark_wrong(&mut self, problem: Problem) -> Reply<AnswerOutcome> {
        self.streak = 0;
        let remaining = self.attempts_left();

        if remaining > 0 {
            self.state = QuestionState::Retrying;
            let hint = hints::quiz_hint(problem.a, problem.b, problem.operation, self.attempts);
            let tries = if remaining == 1 { "try" } else { "tries" };
            self.feedback = Some(Notice::wrong(format!(
                "Not quite! {remaining} {tries} left."
            )));
            self.hint = Some(format!("Hint: {hint}"));

            let face = if remaining == 1 { "\u{1f62c}" } else { "\u{1f914}" };
            Reply::new(
                AnswerOutcome::Retry { remaining, hint },
                vec![Effect::Sound(Sound::Wrong), Effect::emoji(face)],
            )
        } else {
            self.state = QuestionState::Exhausted;
            let equation = problem.equation();
            self.feedback = Some(Notice::wrong(format!("The answer is: {equation}")));
            self.hint = Some("Don't worry, you'll get it next time!".to_string());
            log::debug!("question {} exhausted", self.current_index);

            Reply::new(
                AnswerOutcome::Exhausted {
                    answer: problem.answer,
                    equation,
                },
                vec![Effect::Sound(Sound::Wrong), Effect::emoji("\u{1f60a}")],
            )
        }
    }

    /// Moves past a resolved question: either the next problem or the
    /// end-of-quiz summary.
    pub fn next_problem(&mut self) -> Result<Reply<Advance>, QuizError> {
        if self.is_finished() {
            return Err(QuizError::Finished);
        }
        if self.state.is_open() {
            return Err(QuizError::QuestionOpen);
        }
        Ok(self.advance())
    }

    fn advance(&mut self) -> Reply<Advance> {
        self.current_index += 1;
        self.attempts = 0;
        self.feedback = None;
        self.hint = None;

        if self.current_index > self.settings.total_questions {
            let summary = QuizSummary::new(
                self.settings.operation,
                self.settings.level,
                self.score,
                self.settings.total_questions,
                self.best_streak,
            );
            log::debug!(
                "quiz finished: {}/{} ({:?})",
                summary.score,
                summary.total,
                summary.tier
            );
            let effects = summary.tier.effects();
            self.problem = None;
            self.summary = Some(summary.clone());
            return Reply::new(Advance::Finished(summary), effects);
        }

        let problem = generate_problem(self.settings.level, self.settings.operation, &mut self.rng);
        log::debug!(
            "question {}/{}: {}",
            self.current_index,
            self.settings.total_questions,
            problem.expression()
        );
        self.problem = Some(problem);
        self.state = QuestionState::Unanswered;
        Reply::quiet(Advance::Next(problem))
    }

    pub fn view(&self) -> Option<QuizView> {
        let problem = self.problem.as_ref()?;
        let total = self.settings.total_questions;
        let open = self.state.is_open();
        Some(QuizView {
            operation: problem.operation,
            a: problem.a,
            b: problem.b,
            symbol: problem.operation.symbol(),
            progress_label: format!("Problem {} of {total}", self.current_index),
            progress: f64::from(self.current_index - 1) / f64::from(total),
            score: self.score,
            attempts_left: open.then(|| self.attempts_left()),
            input_enabled: open,
            next_visible: !open,
            feedback: self.feedback.clone(),
            hint: self.hint.clone(),
            streak_badge: streak_badge(self.streak),
        })
    }
}
