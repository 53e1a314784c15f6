use serde::{Deserialize, Serialize};

use crate::engine::columns::{AddColumns, BorrowTrace, SubColumns, column_name, column_title};
use crate::engine::hints::quiz_hint;
use crate::engine::operation::Operation;
use crate::feedback::{Effect, Notice, Reply, Sound};
use crate::session::demo::ColumnBoard;
use crate::session::input::{AnswerError, parse_answer};

pub const SINGLE_SHOT_ATTEMPTS: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TryOutcome {
    /// One column of a column exercise is done; the pointer moved left.
    ColumnSolved {
        col: usize,
        digit: u8,
        carry: Option<u8>,
    },
    Solved,
    Retry { hint: String },
    Revealed { answer: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnPhase {
    /// The top digit is smaller than the bottom one; only a borrow is accepted.
    NeedsBorrow,
    Calculate,
    Complete,
}

/// Column-by-column addition or subtraction, right to left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnExercise {
    pub board: ColumnBoard,
    pub pointer: usize,
    pub phase: ColumnPhase,
    pub feedback: Option<Notice>,
    result_digits: Vec<u8>,
}

impl ColumnExercise {
    pub fn addition(a: u32, b: u32) -> Self {
        let cols = AddColumns::new(a, b);
        Self::start(ColumnBoard::addition(&cols), cols.result_digits)
    }

    pub fn subtraction(a: u32, b: u32) -> Self {
        let cols = SubColumns::new(a, b);
        Self::start(ColumnBoard::subtraction(&cols), cols.result_digits)
    }

    fn start(board: ColumnBoard, result_digits: Vec<u8>) -> Self {
        let pointer = board.num_cols() - 1;
        let mut exercise = Self {
            board,
            pointer,
            phase: ColumnPhase::Calculate,
            feedback: None,
            result_digits,
        };
        exercise.check_borrow();
        exercise
    }

    fn check_borrow(&mut self) {
        self.board.focus(self.pointer);
        self.phase = if self.board.needs_borrow(self.pointer) {
            ColumnPhase::NeedsBorrow
        } else {
            ColumnPhase::Calculate
        };
    }

    pub fn is_complete(&self) -> bool {
        self.phase == ColumnPhase::Complete
    }

    /// Carry written above `col` by an earlier correct answer.
    fn carry_in(&self, col: usize) -> u8 {
        self.board.carries[col].unwrap_or(0)
    }

    /// What the learner has to type for the current column: the full column
    /// sum for addition (12 for 7 + 5), the digit difference for subtraction.
    pub fn expected(&self) -> i64 {
        let col = self.pointer;
        let (top, bottom) = (self.board.top[col], self.board.bottom[col]);
        match self.board.operation {
            Operation::Subtract => i64::from(top) - i64::from(bottom),
            _ => i64::from(top + bottom + self.carry_in(col)),
        }
    }

    fn column_expression(&self) -> String {
        let col = self.pointer;
        let (top, bottom) = (self.board.top[col], self.board.bottom[col]);
        match self.board.operation {
            Operation::Subtract => format!("{top} \u{2212} {bottom}"),
            _ => {
                let carry = self.carry_in(col);
                if carry > 0 {
                    format!("{top} + {bottom} + {carry} (carry)")
                } else {
                    format!("{top} + {bottom}")
                }
            }
        }
    }

    pub fn prompt(&self) -> String {
        let n = self.board.num_cols();
        let col = self.pointer;
        match self.phase {
            ColumnPhase::Complete => String::new(),
            ColumnPhase::NeedsBorrow => {
                let (top, bottom) = (self.board.top[col], self.board.bottom[col]);
                format!(
                    "{}: {top} \u{2212} {bottom}... {top} is smaller! We need to borrow!",
                    column_name(col, n)
                )
            }
            ColumnPhase::Calculate => format!(
                "{} column: What is {}?",
                column_title(col, n),
                self.column_expression()
            ),
        }
    }

    pub fn request_borrow(&mut self) -> Result<Reply<BorrowTrace>, AnswerError> {
        match self.phase {
            ColumnPhase::Complete => Err(AnswerError::QuestionClosed),
            ColumnPhase::Calculate => Err(AnswerError::BorrowNotNeeded),
            ColumnPhase::NeedsBorrow => {
                let trace = self.board.borrow(self.pointer);
                self.feedback = Some(Notice::correct(format!(
                    "\u{2705} Borrowed! {} becomes {}!",
                    trace.original, trace.raised
                )));
                self.phase = ColumnPhase::Calculate;
                log::debug!("borrowed into column {}: {:?}", self.pointer, trace.changes);
                Ok(Reply::new(trace, vec![Effect::Sound(Sound::Click)]))
            }
        }
    }

    pub fn submit(&mut self, raw: &str) -> Result<Reply<TryOutcome>, AnswerError> {
        if self.is_complete() {
            return Err(AnswerError::QuestionClosed);
        }
        let value = parse_answer(raw)?;
        if self.phase == ColumnPhase::NeedsBorrow {
            return Err(AnswerError::BorrowRequired);
        }

        let expected = self.expected();
        if value != expected {
            let hint = match self.board.operation {
                Operation::Subtract => format!("What is {}?", self.column_expression()),
                _ => format!("Hint: {} = ?", self.column_expression()),
            };
            self.feedback = Some(Notice::wrong(format!("Not quite! {hint}")));
            return Ok(Reply::new(
                TryOutcome::Retry { hint },
                vec![Effect::Sound(Sound::Wrong)],
            ));
        }

        let col = self.pointer;
        let digit = match self.board.operation {
            Operation::Subtract => self.board.top[col] - self.board.bottom[col],
            _ => self.result_digits[col],
        };
        self.board.write_answer(col, digit);

        let carry = (self.board.operation == Operation::Add && col > 0 && expected >= 10)
            .then_some(1u8);
        if let Some(carry) = carry {
            self.board.write_carry(col - 1, carry);
            self.feedback = Some(Notice::correct(format!(
                "\u{2705} {expected}! Write {digit}, carry {carry}!"
            )));
        } else {
            self.feedback = Some(Notice::correct(format!("\u{2705} Correct! {digit}!")));
        }
        let mut effects = vec![Effect::Sound(Sound::Correct)];

        let lead_only = self.board.operation == Operation::Add
            && col == 1
            && self.board.top[0] == 0
            && self.board.bottom[0] == 0;
        if col == 0 || lead_only {
            if lead_only && self.result_digits[0] > 0 {
                self.board.write_answer(0, self.result_digits[0]);
            }
            self.phase = ColumnPhase::Complete;
            self.board.celebrate();
            self.feedback = Some(Notice::correct(format!(
                "\u{1f389} {} = {}! Amazing!",
                self.board.operation.expression(self.board.a, self.board.b),
                self.board.result()
            )));
            effects.push(Effect::Celebrate(50));
            log::debug!("column exercise solved");
            return Ok(Reply::new(TryOutcome::Solved, effects));
        }

        self.pointer -= 1;
        self.check_borrow();
        Ok(Reply::new(
            TryOutcome::ColumnSolved { col, digit, carry },
            effects,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    Groups { groups: u32, per_group: u32 },
    Share { dividend: u32, divisor: u32 },
}

/// One-answer exercise with a fixed number of attempts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleShot {
    pub kind: ShotKind,
    pub attempts: u32,
    pub resolved: bool,
    pub feedback: Option<Notice>,
}

impl SingleShot {
    pub fn new(kind: ShotKind) -> Self {
        Self {
            kind,
            attempts: 0,
            resolved: false,
            feedback: None,
        }
    }

    pub fn expected(&self) -> u32 {
        match self.kind {
            ShotKind::Groups { groups, per_group } => groups * per_group,
            ShotKind::Share { dividend, divisor } => dividend / divisor,
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            ShotKind::Groups { .. } => "\u{1f3af} Count the Groups!".to_string(),
            ShotKind::Share { dividend, divisor } => format!(
                "\u{1f3af} Your Turn: {}",
                Operation::Divide.expression(dividend, divisor)
            ),
        }
    }

    pub fn prompt(&self) -> String {
        match self.kind {
            ShotKind::Groups { groups, per_group } => {
                format!("{groups} groups of {per_group}. How many in total?")
            }
            ShotKind::Share { dividend, divisor } => format!(
                "Share {dividend} items into {divisor} equal groups. How many in each?"
            ),
        }
    }

    /// Standing helper line shown under the prompt.
    pub fn think_line(&self) -> Option<String> {
        match self.kind {
            ShotKind::Groups { .. } => None,
            ShotKind::Share { dividend, divisor } => Some(format!(
                "\u{1f4a1} Think: {divisor} \u{00d7} ? = {dividend}"
            )),
        }
    }

    fn hint(&self) -> String {
        match (self.kind, self.attempts) {
            (ShotKind::Groups { groups, per_group }, 1) => {
                let parts = vec![per_group.to_string(); groups as usize];
                format!("Try counting: {} = ?", parts.join(" + "))
            }
            (ShotKind::Groups { groups, per_group }, _) => format!(
                "Think: {groups} \u{00d7} {per_group} means {groups} groups of {per_group}. Count every dot!"
            ),
            (ShotKind::Share { dividend, divisor }, attempt) => {
                quiz_hint(dividend, divisor, Operation::Divide, attempt)
            }
        }
    }

    pub fn submit(&mut self, raw: &str) -> Result<Reply<TryOutcome>, AnswerError> {
        if self.resolved {
            return Err(AnswerError::QuestionClosed);
        }
        let value = parse_answer(raw)?;
        let expected = self.expected();

        if value == i64::from(expected) {
            self.resolved = true;
            let text = match self.kind {
                ShotKind::Groups { groups, per_group } => {
                    format!("\u{1f389} Correct! {groups} \u{00d7} {per_group} = {expected}!")
                }
                ShotKind::Share { dividend, divisor } => format!(
                    "\u{1f389} Correct! {dividend} \u{00f7} {divisor} = {expected}! Because {divisor} \u{00d7} {expected} = {dividend}!"
                ),
            };
            self.feedback = Some(Notice::correct(text));
            return Ok(Reply::new(
                TryOutcome::Solved,
                vec![Effect::Sound(Sound::Correct), Effect::Celebrate(40)],
            ));
        }

        self.attempts += 1;
        if self.attempts >= SINGLE_SHOT_ATTEMPTS {
            self.resolved = true;
            let text = match self.kind {
                ShotKind::Groups { groups, per_group } => format!(
                    "The answer is {expected}. {groups} \u{00d7} {per_group} = {groups} groups of {per_group} = {expected}!"
                ),
                ShotKind::Share { dividend, divisor } => format!(
                    "The answer is {expected}. {divisor} \u{00d7} {expected} = {dividend}, so {dividend} \u{00f7} {divisor} = {expected}!"
                ),
            };
            self.feedback = Some(Notice::wrong(text));
            return Ok(Reply::new(
                TryOutcome::Revealed { answer: expected },
                vec![Effect::Sound(Sound::Wrong)],
            ));
        }

        let hint = self.hint();
        self.feedback = Some(Notice::wrong(format!("Not quite! {hint}")));
        Ok(Reply::new(
            TryOutcome::Retry { hint },
            vec![Effect::Sound(Sound::Wrong)],
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exercise {
    Columns(ColumnExercise),
    Single(SingleShot),
}

impl Exercise {
    pub fn is_complete(&self) -> bool {
        match self {
            Exercise::Columns(ex) => ex.is_complete(),
            Exercise::Single(ex) => ex.resolved,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Exercise::Columns(ex) => format!(
                "\u{1f3af} Your Turn: {}",
                ex.board.operation.expression(ex.board.a, ex.board.b)
            ),
            Exercise::Single(ex) => ex.title(),
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            Exercise::Columns(ex) => ex.prompt(),
            Exercise::Single(ex) => ex.prompt(),
        }
    }

    pub fn feedback(&self) -> Option<&Notice> {
        match self {
            Exercise::Columns(ex) => ex.feedback.as_ref(),
            Exercise::Single(ex) => ex.feedback.as_ref(),
        }
    }

    pub fn awaiting_borrow(&self) -> bool {
        matches!(self, Exercise::Columns(ex) if ex.phase == ColumnPhase::NeedsBorrow)
    }

    pub fn submit(&mut self, raw: &str) -> Result<Reply<TryOutcome>, AnswerError> {
        match self {
            Exercise::Columns(ex) => ex.submit(raw),
            Exercise::Single(ex) => ex.submit(raw),
        }
    }

    pub fn request_borrow(&mut self) -> Result<Reply<BorrowTrace>, AnswerError> {
        match self {
            Exercise::Columns(ex) => ex.request_borrow(),
            Exercise::Single(ex) if ex.resolved => Err(AnswerError::QuestionClosed),
            Exercise::Single(_) => Err(AnswerError::BorrowNotNeeded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtraction_with_reversed_operands_still_runs() {
        let mut ex = ColumnExercise::subtraction(37, 52);
        assert_eq!(ex.phase, ColumnPhase::Calculate);
        assert_eq!(
            ex.submit("5").unwrap().outcome,
            TryOutcome::ColumnSolved {
                col: 1,
                digit: 5,
                carry: None
            }
        );
        assert_eq!(ex.phase, ColumnPhase::NeedsBorrow);

        let trace = ex.request_borrow().unwrap().outcome;
        assert_eq!(trace.raised, 13);
        assert_eq!(trace.lender, None);
        assert_eq!(ex.submit("8").unwrap().outcome, TryOutcome::Solved);
        assert_eq!(ex.board.answers, vec![Some(8), Some(5)]);
    }

    #[test]
    fn test_addition_walkthrough_47_35() {
        let mut ex = ColumnExercise::addition(47, 35);
        assert_eq!(ex.pointer, 1);
        assert_eq!(ex.prompt(), "Ones column: What is 7 + 5?");

        let reply = ex.submit("12").unwrap();
        assert_eq!(
            reply.outcome,
            TryOutcome::ColumnSolved {
                col: 1,
                digit: 2,
                carry: Some(1)
            }
        );
        assert_eq!(ex.board.carries[0], Some(1));
        assert_eq!(ex.feedback.as_ref().unwrap().text, "\u{2705} 12! Write 2, carry 1!");
        assert_eq!(ex.prompt(), "Tens column: What is 4 + 3 + 1 (carry)?");

        let reply = ex.submit("8").unwrap();
        assert_eq!(reply.outcome, TryOutcome::Solved);
        assert!(reply.effects.contains(&Effect::Celebrate(50)));
        assert!(ex.is_complete());
        assert_eq!(ex.board.answers, vec![Some(8), Some(2)]);
        assert_eq!(ex.feedback.as_ref().unwrap().text, "\u{1f389} 47 + 35 = 82! Amazing!");
    }

    #[test]
    fn test_wrong_column_answer_keeps_pointer() {
        let mut ex = ColumnExercise::addition(47, 35);
        ex.submit("12").unwrap();
        let reply = ex.submit("9").unwrap();
        assert_eq!(
            reply.outcome,
            TryOutcome::Retry {
                hint: "Hint: 4 + 3 + 1 (carry) = ?".to_string()
            }
        );
        assert!(reply.has_sound(Sound::Wrong));
        assert_eq!(ex.pointer, 0);
        assert!(!ex.is_complete());
    }

    #[test]
    fn test_digit_alone_is_not_the_column_sum() {
        let mut ex = ColumnExercise::addition(47, 35);
        let reply = ex.submit("2").unwrap();
        assert!(matches!(reply.outcome, TryOutcome::Retry { .. }));
        assert_eq!(ex.pointer, 1);
    }

    #[test]
    fn test_leading_carry_digit_is_filled_in() {
        let mut ex = ColumnExercise::addition(86, 47);
        assert_eq!(ex.board.num_cols(), 3);
        ex.submit("13").unwrap();
        let reply = ex.submit("13").unwrap();
        assert_eq!(reply.outcome, TryOutcome::Solved);
        assert_eq!(ex.board.answers, vec![Some(1), Some(3), Some(3)]);
    }

    #[test]
    fn test_subtraction_requires_borrow_first() {
        let mut ex = ColumnExercise::subtraction(52, 37);
        assert_eq!(ex.phase, ColumnPhase::NeedsBorrow);
        assert_eq!(ex.prompt(), "ones: 2 \u{2212} 7... 2 is smaller! We need to borrow!");
        assert_eq!(ex.submit("5"), Err(AnswerError::BorrowRequired));

        let trace = ex.request_borrow().unwrap().outcome;
        assert_eq!(trace.raised, 12);
        assert_eq!(ex.board.top, vec![4, 12]);
        assert_eq!(ex.phase, ColumnPhase::Calculate);
        assert_eq!(ex.request_borrow().unwrap_err(), AnswerError::BorrowNotNeeded);

        ex.submit("5").unwrap();
        assert_eq!(ex.prompt(), "Tens column: What is 4 \u{2212} 3?");
        let wrong = ex.submit("2").unwrap();
        assert_eq!(
            wrong.outcome,
            TryOutcome::Retry {
                hint: "What is 4 \u{2212} 3?".to_string()
            }
        );
        assert_eq!(ex.submit("1").unwrap().outcome, TryOutcome::Solved);
        assert_eq!(ex.board.answers, vec![Some(1), Some(5)]);
    }

    #[test]
    fn test_closed_exercise_rejects_input() {
        let mut ex = ColumnExercise::addition(12, 13);
        ex.submit("5").unwrap();
        ex.submit("2").unwrap();
        assert!(ex.is_complete());
        assert_eq!(ex.submit("1"), Err(AnswerError::QuestionClosed));
        assert_eq!(ex.request_borrow().unwrap_err(), AnswerError::QuestionClosed);
    }

    #[test]
    fn test_invalid_input_is_not_judged() {
        let mut ex = ColumnExercise::addition(47, 35);
        assert!(matches!(ex.submit("x"), Err(AnswerError::InvalidInput { .. })));
        assert!(ex.feedback.is_none());
        assert_eq!(ex.pointer, 1);
    }

    #[test]
    fn test_groups_hints_change_then_reveal() {
        let mut shot = SingleShot::new(ShotKind::Groups {
            groups: 3,
            per_group: 4,
        });
        let first = shot.submit("10").unwrap();
        assert_eq!(
            first.outcome,
            TryOutcome::Retry {
                hint: "Try counting: 4 + 4 + 4 = ?".to_string()
            }
        );
        let second = shot.submit("11").unwrap();
        match second.outcome {
            TryOutcome::Retry { hint } => assert!(hint.starts_with("Think: 3 \u{00d7} 4")),
            other => panic!("expected retry, got {other:?}"),
        }
        let third = shot.submit("13").unwrap();
        assert_eq!(third.outcome, TryOutcome::Revealed { answer: 12 });
        assert!(shot.resolved);
        assert_eq!(shot.submit("12"), Err(AnswerError::QuestionClosed));
    }

    #[test]
    fn test_division_shot() {
        let mut shot = SingleShot::new(ShotKind::Share {
            dividend: 24,
            divisor: 6,
        });
        assert_eq!(shot.think_line().unwrap(), "\u{1f4a1} Think: 6 \u{00d7} ? = 24");
        let miss = shot.submit("5").unwrap();
        assert_eq!(
            miss.outcome,
            TryOutcome::Retry {
                hint: "Think: 6 \u{00d7} ? = 24".to_string()
            }
        );
        let hit = shot.submit("4").unwrap();
        assert_eq!(hit.outcome, TryOutcome::Solved);
        assert!(hit.effects.contains(&Effect::Celebrate(40)));
        assert!(shot.feedback.unwrap().text.contains("Because 6 \u{00d7} 4 = 24"));
    }

    #[test]
    fn test_single_shot_has_no_borrow() {
        let mut ex = Exercise::Single(SingleShot::new(ShotKind::Groups {
            groups: 2,
            per_group: 2,
        }));
        assert_eq!(ex.request_borrow().unwrap_err(), AnswerError::BorrowNotNeeded);
        assert!(!ex.awaiting_borrow());
    }
}
