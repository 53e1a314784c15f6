//! Guided demos. A demo is a list of [`SubStep`]s executed one per tap by
//! [`DemoState::tap`]; each sub-step updates the board overlay and the
//! narration and asks for its feedback effects.

use serde::{Deserialize, Serialize};

use crate::engine::columns::{AddColumns, BorrowTrace, SubColumns, cascade_borrow, column_name, column_title};
use crate::engine::operation::Operation;
use crate::feedback::{Effect, Reply, Sound};

/// Column layout as the learner currently sees it: the top row reflects
/// borrows performed so far and answers appear as they are revealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBoard {
    pub operation: Operation,
    pub a: u32,
    pub b: u32,
    pub original_top: Vec<u8>,
    /// Current top digits. A borrowed column can hold values up to 18.
    pub top: Vec<u8>,
    pub bottom: Vec<u8>,
    /// Carry written above each column.
    pub carries: Vec<Option<u8>>,
    pub answers: Vec<Option<u8>>,
    pub active: Option<usize>,
    pub done: Vec<bool>,
    pub celebrating: bool,
}

impl ColumnBoard {
    fn blank(operation: Operation, a: u32, b: u32, top: Vec<u8>, bottom: Vec<u8>) -> Self {
        let n = top.len();
        Self {
            operation,
            a,
            b,
            original_top: top.clone(),
            top,
            bottom,
            carries: vec![None; n],
            answers: vec![None; n],
            active: None,
            done: vec![false; n],
            celebrating: false,
        }
    }

    pub fn addition(cols: &AddColumns) -> Self {
        Self::blank(
            Operation::Add,
            cols.a,
            cols.b,
            cols.a_digits.clone(),
            cols.b_digits.clone(),
        )
    }

    pub fn subtraction(cols: &SubColumns) -> Self {
        Self::blank(
            Operation::Subtract,
            cols.a,
            cols.b,
            cols.a_digits.clone(),
            cols.b_digits.clone(),
        )
    }

    pub fn num_cols(&self) -> usize {
        self.top.len()
    }

    /// True when the top digit at `col` was changed by a borrow and should be
    /// drawn crossed out next to its new value.
    pub fn is_crossed(&self, col: usize) -> bool {
        self.top[col] != self.original_top[col]
    }

    /// Leading zeros of the operands are drawn as blanks.
    pub fn is_leading_blank(&self, col: usize, digit: u8) -> bool {
        col == 0 && digit == 0
    }

    pub fn needs_borrow(&self, col: usize) -> bool {
        self.operation == Operation::Subtract && self.top[col] < self.bottom[col]
    }

    pub fn borrow(&mut self, col: usize) -> BorrowTrace {
        cascade_borrow(&mut self.top, col)
    }

    pub fn focus(&mut self, col: usize) {
        self.active = Some(col);
    }

    pub fn write_answer(&mut self, col: usize, digit: u8) {
        self.answers[col] = Some(digit);
        self.done[col] = true;
        self.active = None;
    }

    pub fn write_carry(&mut self, col: usize, carry: u8) {
        self.carries[col] = Some(carry);
    }

    pub fn celebrate(&mut self) {
        self.active = None;
        self.celebrating = true;
    }

    pub fn result(&self) -> i64 {
        self.operation.compute(self.a, self.b)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemoBoard {
    Columns(ColumnBoard),
    Groups {
        groups: u32,
        per_group: u32,
        shown: u32,
    },
    BreakApart {
        a: u32,
        b: u32,
        split: bool,
        tens_solved: bool,
        ones_solved: bool,
        combined: bool,
    },
    Sharing {
        total: u32,
        plates: u32,
        /// Items on every plate so far.
        each: u32,
    },
    Grouping {
        total: u32,
        per_group: u32,
        made: u32,
    },
}

impl DemoBoard {
    /// Items still waiting in the pile of a division demo.
    pub fn pile_left(&self) -> Option<u32> {
        match *self {
            DemoBoard::Sharing { total, plates, each } => Some(total - plates * each),
            DemoBoard::Grouping {
                total,
                per_group,
                made,
            } => Some(total - per_group * made),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubStep {
    FocusColumn { col: usize },
    Borrow { col: usize },
    RevealColumn { col: usize },
    AddGroup { index: u32 },
    Split,
    SolveTens,
    SolveOnes,
    Recombine,
    ShareRound { round: u32 },
    MakeGroup { index: u32 },
    Finale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemoProgress {
    Advanced,
    Completed,
    AlreadyDone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoState {
    pub title: String,
    pub board: DemoBoard,
    pub subs: Vec<SubStep>,
    pub next_sub: usize,
    pub speech: String,
    pub equation: Option<String>,
    pub done: bool,
}

fn column_subs(num_cols: usize, borrows: Option<&[bool]>) -> Vec<SubStep> {
    let mut subs = Vec::new();
    for col in (0..num_cols).rev() {
        subs.push(SubStep::FocusColumn { col });
        if borrows.is_some_and(|b| b[col]) {
            subs.push(SubStep::Borrow { col });
        }
        subs.push(SubStep::RevealColumn { col });
    }
    subs.push(SubStep::Finale);
    subs
}

impl DemoState {
    fn new(title: String, board: DemoBoard, subs: Vec<SubStep>, speech: String) -> Self {
        Self {
            title,
            board,
            subs,
            next_sub: 0,
            speech,
            equation: None,
            done: false,
        }
    }

    /// Column walk-through of `a op b`. Only addition and subtraction have a
    /// column layout.
    pub fn columns(operation: Operation, a: u32, b: u32) -> Self {
        let title = format!("Watch: {}", operation.expression(a, b));
        match operation {
            Operation::Subtract => {
                let cols = SubColumns::new(a, b);
                let subs = column_subs(cols.num_cols(), Some(cols.borrows.as_slice()));
                let speech = format!(
                    "Let's subtract {}. Start from the right!",
                    operation.expression(a, b)
                );
                Self::new(title, DemoBoard::Columns(ColumnBoard::subtraction(&cols)), subs, speech)
            }
            _ => {
                let cols = AddColumns::new(a, b);
                let subs = column_subs(cols.num_cols(), None);
                let speech = format!(
                    "Let's add {}. We start from the right!",
                    Operation::Add.expression(a, b)
                );
                Self::new(title, DemoBoard::Columns(ColumnBoard::addition(&cols)), subs, speech)
            }
        }
    }

    pub fn groups(groups: u32, per_group: u32) -> Self {
        let mut subs: Vec<_> = (0..groups).map(|index| SubStep::AddGroup { index }).collect();
        subs.push(SubStep::Finale);
        Self::new(
            format!("{groups} \u{00d7} {per_group} = Making Groups!"),
            DemoBoard::Groups {
                groups,
                per_group,
                shown: 0,
            },
            subs,
            format!("{groups} \u{00d7} {per_group} means {groups} groups of {per_group}!"),
        )
    }

    pub fn break_apart(a: u32, b: u32) -> Self {
        Self::new(
            format!("Break Apart: {a} \u{00d7} {b}"),
            DemoBoard::BreakApart {
                a,
                b,
                split: false,
                tens_solved: false,
                ones_solved: false,
                combined: false,
            },
            vec![
                SubStep::Split,
                SubStep::SolveTens,
                SubStep::SolveOnes,
                SubStep::Recombine,
            ],
            format!("{a} looks big! Let's break it apart into easier pieces."),
        )
    }

    pub fn sharing(total: u32, plates: u32) -> Self {
        let rounds = total / plates;
        let mut subs: Vec<_> = (0..rounds).map(|round| SubStep::ShareRound { round }).collect();
        subs.push(SubStep::Finale);
        Self::new(
            format!("Share: {total} \u{00f7} {plates}"),
            DemoBoard::Sharing {
                total,
                plates,
                each: 0,
            },
            subs,
            format!("We have {total} \u{1f36a} to share equally among {plates} plates!"),
        )
    }

    pub fn grouping(total: u32, per_group: u32) -> Self {
        let count = total / per_group;
        let mut subs: Vec<_> = (0..count).map(|index| SubStep::MakeGroup { index }).collect();
        subs.push(SubStep::Finale);
        Self::new(
            format!("Group: {total} \u{00f7} {per_group}"),
            DemoBoard::Grouping {
                total,
                per_group,
                made: 0,
            },
            subs,
            format!("{total} \u{00f7} {per_group} also means: how many groups of {per_group} can we make?"),
        )
    }

    /// Runs the first sub-step. Called once when the step becomes active.
    pub fn enter(&mut self) -> Vec<Effect> {
        match self.subs.first().copied() {
            Some(sub) => {
                self.next_sub = 1;
                self.run(sub)
            }
            None => {
                self.done = true;
                Vec::new()
            }
        }
    }

    pub fn remaining(&self) -> usize {
        self.subs.len().saturating_sub(self.next_sub)
    }

    /// Executes the next pending sub-step. The tap that runs the last one
    /// also unlocks the step.
    pub fn tap(&mut self) -> Reply<DemoProgress> {
        if self.done {
            return Reply::quiet(DemoProgress::AlreadyDone);
        }

        let mut effects = Vec::new();
        if let Some(&sub) = self.subs.get(self.next_sub) {
            effects = self.run(sub);
            self.next_sub += 1;
        }

        if self.next_sub >= self.subs.len() {
            self.done = true;
            effects.push(Effect::Sound(Sound::Correct));
            log::debug!("demo '{}' complete", self.title);
            Reply::new(DemoProgress::Completed, effects)
        } else {
            Reply::new(DemoProgress::Advanced, effects)
        }
    }

    fn run(&mut self, sub: SubStep) -> Vec<Effect> {
        match &mut self.board {
            DemoBoard::Columns(board) => {
                let (speech, effects) = run_column(board, sub);
                if let Some(speech) = speech {
                    self.speech = speech;
                }
                effects
            }
            DemoBoard::Groups {
                groups,
                per_group,
                shown,
            } => match sub {
                SubStep::AddGroup { index } => {
                    *shown = index + 1;
                    let total = *shown * *per_group;
                    self.equation = Some(if index == 0 {
                        per_group.to_string()
                    } else {
                        let parts = vec![per_group.to_string(); *shown as usize];
                        format!("{} = {total}", parts.join(" + "))
                    });
                    self.speech = format!(
                        "Group {}: {per_group} more! Total so far: {total}",
                        index + 1
                    );
                    vec![Effect::Sound(Sound::Click)]
                }
                _ => {
                    let total = *groups * *per_group;
                    self.equation = Some(format!("{groups} \u{00d7} {per_group} = {total} \u{1f389}"));
                    self.speech = format!(
                        "{groups} groups of {per_group} = {total}! Multiplication is just fast adding!"
                    );
                    vec![Effect::Sound(Sound::Correct), Effect::Celebrate(30)]
                }
            },
            DemoBoard::BreakApart {
                a,
                b,
                split,
                tens_solved,
                ones_solved,
                combined,
            } => {
                let tens = *a / 10 * 10;
                let ones = *a % 10;
                match sub {
                    SubStep::Split => {
                        *split = true;
                        self.speech = format!(
                            "Split {a} into {tens} and {ones}: ({tens} \u{00d7} {b}) + ({ones} \u{00d7} {b})"
                        );
                        vec![Effect::Sound(Sound::Click)]
                    }
                    SubStep::SolveTens => {
                        *tens_solved = true;
                        self.speech = format!("{tens} \u{00d7} {b} = {}. That's easy!", tens * *b);
                        vec![Effect::Sound(Sound::Click)]
                    }
                    SubStep::SolveOnes => {
                        *ones_solved = true;
                        self.speech = format!("{ones} \u{00d7} {b} = {}. Easy too!", ones * *b);
                        vec![Effect::Sound(Sound::Click)]
                    }
                    _ => {
                        *combined = true;
                        let total = *a * *b;
                        self.equation = Some(format!("{a} \u{00d7} {b} = {total} \u{1f389}"));
                        self.speech = format!(
                            "{} + {} = {total}! Breaking apart makes big multiplications easy!",
                            tens * *b,
                            ones * *b
                        );
                        vec![Effect::Sound(Sound::Correct), Effect::Celebrate(30)]
                    }
                }
            }
            DemoBoard::Sharing {
                total,
                plates,
                each,
            } => match sub {
                SubStep::ShareRound { round } => {
                    *each = round + 1;
                    self.speech = format!(
                        "Round {}: Give 1 to each plate. Each plate now has {}.",
                        round + 1,
                        round + 1
                    );
                    vec![Effect::Sound(Sound::Click)]
                }
                _ => {
                    let share = *total / *plates;
                    self.equation = Some(format!("{total} \u{00f7} {plates} = {share} \u{1f389}"));
                    self.speech = format!(
                        "\u{1f389} {total} shared equally among {plates} = {share} each! That's division!"
                    );
                    vec![Effect::Sound(Sound::Correct), Effect::Celebrate(30)]
                }
            },
            DemoBoard::Grouping {
                total,
                per_group,
                made,
            } => match sub {
                SubStep::MakeGroup { index } => {
                    *made = index + 1;
                    let plural = if index > 0 { "s" } else { "" };
                    self.speech = format!(
                        "Group {}! That's {} group{plural} of {per_group} so far.",
                        index + 1,
                        index + 1
                    );
                    vec![Effect::Sound(Sound::Click)]
                }
                _ => {
                    let count = *total / *per_group;
                    self.equation =
                        Some(format!("{total} \u{00f7} {per_group} = {count} groups! \u{1f389}"));
                    self.speech = format!(
                        "\u{1f389} We made {count} groups of {per_group}! So {total} \u{00f7} {per_group} = {count}!"
                    );
                    vec![Effect::Sound(Sound::Correct), Effect::Celebrate(30)]
                }
            },
        }
    }
}

fn carry_text(carry: u8) -> String {
    if carry > 0 {
        format!(" + {carry} (carry)")
    } else {
        String::new()
    }
}

/// Narration for a borrow, naming the column that actually lent.
pub fn borrow_narration(trace: &BorrowTrace, num_cols: usize) -> String {
    let lender = trace
        .lender
        .map(|col| column_name(col, num_cols))
        .unwrap_or("next");
    let how = if trace.changes.len() > 1 {
        format!("We borrowed through the zeros from the {lender} column.")
    } else {
        format!("We borrowed 1 from the {lender} column.")
    };
    format!("Borrow! {} becomes {}. {how}", trace.original, trace.raised)
}

fn run_column(board: &mut ColumnBoard, sub: SubStep) -> (Option<String>, Vec<Effect>) {
    let n = board.num_cols();
    match (board.operation, sub) {
        (Operation::Subtract, SubStep::FocusColumn { col }) => {
            board.focus(col);
            let (top, bottom) = (board.top[col], board.bottom[col]);
            let title = column_title(col, n);
            let speech = if top < bottom {
                format!(
                    "{title}: {top} \u{2212} {bottom}... We can't! {top} is smaller than {bottom}. We need to borrow!"
                )
            } else {
                format!("{title}: {top} \u{2212} {bottom} = {}", top - bottom)
            };
            (Some(speech), vec![Effect::Sound(Sound::Click)])
        }
        (Operation::Subtract, SubStep::Borrow { col }) => {
            let trace = board.borrow(col);
            (Some(borrow_narration(&trace, n)), vec![Effect::Sound(Sound::Click)])
        }
        (Operation::Subtract, SubStep::RevealColumn { col }) => {
            let (top, bottom) = (board.top[col], board.bottom[col]);
            let borrowed = board.is_crossed(col) && top >= 10;
            board.write_answer(col, top - bottom);
            let speech =
                borrowed.then(|| format!("Now {top} \u{2212} {bottom} = {}!", top - bottom));
            (speech, vec![Effect::Sound(Sound::Correct)])
        }
        (_, SubStep::FocusColumn { col }) => {
            let cols = AddColumns::new(board.a, board.b);
            board.focus(col);
            let speech = format!(
                "{} column: {} + {}{} = {}",
                column_title(col, n),
                cols.a_digits[col],
                cols.b_digits[col],
                carry_text(cols.carry_in(col)),
                cols.column_sum(col)
            );
            (Some(speech), vec![Effect::Sound(Sound::Click)])
        }
        (_, SubStep::RevealColumn { col }) => {
            let cols = AddColumns::new(board.a, board.b);
            let digit = cols.result_digits[col];
            let sum = cols.column_sum(col);
            let carry = cols.carry_out(col);
            board.write_answer(col, digit);
            let speech = if carry > 0 {
                board.write_carry(col - 1, carry);
                format!("{sum} is more than 9! Write {digit} and carry {carry}.")
            } else {
                format!(
                    "{} + {}{} = {digit}. Write it down!",
                    cols.a_digits[col],
                    cols.b_digits[col],
                    carry_text(cols.carry_in(col))
                )
            };
            (Some(speech), vec![Effect::Sound(Sound::Correct)])
        }
        (op, _) => {
            board.celebrate();
            let cheer = if op == Operation::Subtract {
                "You got it!"
            } else {
                "Great job!"
            };
            let speech = format!(
                "\u{1f389} {} = {}! {cheer}",
                op.expression(board.a, board.b),
                board.result()
            );
            (Some(speech), vec![Effect::Celebrate(40)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(demo: &DemoState) -> &ColumnBoard {
        match &demo.board {
            DemoBoard::Columns(b) => b,
            other => panic!("expected a column board, got {other:?}"),
        }
    }

    fn run_to_end(demo: &mut DemoState) -> Vec<Effect> {
        let mut effects = if demo.next_sub == 0 { demo.enter() } else { Vec::new() };
        while !demo.done {
            effects.extend(demo.tap().effects);
        }
        effects
    }

    #[test]
    fn test_addition_demo_has_two_substeps_per_column() {
        let demo = DemoState::columns(Operation::Add, 47, 35);
        assert_eq!(demo.subs.len(), 5);
        assert_eq!(demo.subs[0], SubStep::FocusColumn { col: 1 });
        assert_eq!(*demo.subs.last().unwrap(), SubStep::Finale);
    }

    #[test]
    fn test_enter_runs_first_substep() {
        let mut demo = DemoState::columns(Operation::Add, 47, 35);
        let effects = demo.enter();
        assert_eq!(effects, vec![Effect::Sound(Sound::Click)]);
        assert_eq!(demo.next_sub, 1);
        assert_eq!(demo.speech, "Ones column: 7 + 5 = 12");
        assert_eq!(board(&demo).active, Some(1));
        assert!(!demo.done);
    }

    #[test]
    fn test_addition_demo_reveals_carry() {
        let mut demo = DemoState::columns(Operation::Add, 47, 35);
        demo.enter();
        demo.tap();
        assert_eq!(demo.speech, "12 is more than 9! Write 2 and carry 1.");
        assert_eq!(board(&demo).answers, vec![None, Some(2)]);
        assert_eq!(board(&demo).carries, vec![Some(1), None]);

        demo.tap();
        assert_eq!(demo.speech, "Tens column: 4 + 3 + 1 (carry) = 8");
        demo.tap();
        assert_eq!(board(&demo).answers, vec![Some(8), Some(2)]);
    }

    #[test]
    fn test_last_tap_unlocks() {
        let mut demo = DemoState::columns(Operation::Add, 47, 35);
        demo.enter();
        for _ in 0..3 {
            assert_eq!(demo.tap().outcome, DemoProgress::Advanced);
        }
        let last = demo.tap();
        assert_eq!(last.outcome, DemoProgress::Completed);
        assert!(last.effects.contains(&Effect::Celebrate(40)));
        assert!(last.has_sound(Sound::Correct));
        assert!(demo.done);
        assert!(board(&demo).celebrating);
        assert_eq!(demo.speech, "\u{1f389} 47 + 35 = 82! Great job!");
        assert_eq!(demo.tap().outcome, DemoProgress::AlreadyDone);
    }

    #[test]
    fn test_subtraction_demo_with_reversed_operands_completes() {
        let mut demo = DemoState::columns(Operation::Subtract, 3, 8);
        run_to_end(&mut demo);
        let b = board(&demo);
        assert_eq!(b.top, vec![13]);
        assert_eq!(b.answers, vec![Some(5)]);
        assert!(b.celebrating);
    }

    #[test]
    fn test_three_digit_addition_demo() {
        let mut demo = DemoState::columns(Operation::Add, 186, 247);
        run_to_end(&mut demo);
        let b = board(&demo);
        assert_eq!(b.answers, vec![Some(4), Some(3), Some(3)]);
        assert_eq!(b.carries, vec![Some(1), Some(1), None]);
    }

    #[test]
    fn test_subtraction_demo_borrow_substeps() {
        let demo = DemoState::columns(Operation::Subtract, 52, 37);
        assert_eq!(
            demo.subs,
            vec![
                SubStep::FocusColumn { col: 1 },
                SubStep::Borrow { col: 1 },
                SubStep::RevealColumn { col: 1 },
                SubStep::FocusColumn { col: 0 },
                SubStep::RevealColumn { col: 0 },
                SubStep::Finale,
            ]
        );
    }

    #[test]
    fn test_subtraction_demo_overlay() {
        let mut demo = DemoState::columns(Operation::Subtract, 52, 37);
        demo.enter();
        assert!(demo.speech.contains("We need to borrow!"));
        demo.tap();
        assert_eq!(board(&demo).top, vec![4, 12]);
        assert!(board(&demo).is_crossed(0));
        assert!(demo.speech.starts_with("Borrow! 2 becomes 12."));
        assert!(demo.speech.contains("tens column"));
        demo.tap();
        assert_eq!(demo.speech, "Now 12 \u{2212} 7 = 5!");
        demo.tap();
        assert_eq!(demo.speech, "Tens: 4 \u{2212} 3 = 1");
        run_to_end(&mut demo);
        assert_eq!(board(&demo).answers, vec![Some(1), Some(5)]);
    }

    #[test]
    fn test_borrow_through_zero_names_lender() {
        let mut demo = DemoState::columns(Operation::Subtract, 304, 156);
        assert_eq!(demo.subs.len(), 8);
        demo.enter();
        demo.tap();
        assert_eq!(board(&demo).top, vec![2, 9, 14]);
        assert!(demo.speech.contains("through the zeros from the hundreds column"));
        run_to_end(&mut demo);
        assert_eq!(board(&demo).answers, vec![Some(1), Some(4), Some(8)]);
    }

    #[test]
    fn test_groups_demo_running_sum() {
        let mut demo = DemoState::groups(3, 4);
        assert_eq!(demo.subs.len(), 4);
        demo.enter();
        assert_eq!(demo.equation.as_deref(), Some("4"));
        demo.tap();
        demo.tap();
        assert_eq!(demo.equation.as_deref(), Some("4 + 4 + 4 = 12"));
        assert_eq!(demo.speech, "Group 3: 4 more! Total so far: 12");
        let last = demo.tap();
        assert_eq!(last.outcome, DemoProgress::Completed);
        assert!(last.effects.contains(&Effect::Celebrate(30)));
    }

    #[test]
    fn test_break_apart_has_four_substeps() {
        let mut demo = DemoState::break_apart(12, 3);
        assert_eq!(demo.subs.len(), 4);
        demo.enter();
        assert_eq!(demo.speech, "Split 12 into 10 and 2: (10 \u{00d7} 3) + (2 \u{00d7} 3)");
        demo.tap();
        assert_eq!(demo.speech, "10 \u{00d7} 3 = 30. That's easy!");
        demo.tap();
        demo.tap();
        assert!(demo.done);
        assert!(demo.speech.starts_with("30 + 6 = 36!"));
    }

    #[test]
    fn test_sharing_demo_rounds() {
        let mut demo = DemoState::sharing(12, 3);
        assert_eq!(demo.subs.len(), 5);
        demo.enter();
        assert_eq!(demo.board.pile_left(), Some(9));
        run_to_end(&mut demo);
        assert_eq!(demo.board.pile_left(), Some(0));
        assert!(demo.speech.contains("4 each"));
    }

    #[test]
    fn test_grouping_demo_counts_groups() {
        let mut demo = DemoState::grouping(15, 5);
        demo.enter();
        assert_eq!(demo.speech, "Group 1! That's 1 group of 5 so far.");
        demo.tap();
        assert_eq!(demo.speech, "Group 2! That's 2 groups of 5 so far.");
        run_to_end(&mut demo);
        assert_eq!(demo.equation.as_deref(), Some("15 \u{00f7} 5 = 3 groups! \u{1f389}"));
    }
}
