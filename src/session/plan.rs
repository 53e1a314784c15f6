use serde::{Deserialize, Serialize};

use crate::engine::operation::Operation;

/// One entry of a lesson plan. Operands for demos are fixed; try-it steps draw
/// fresh operands every time they are entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepSpec {
    Intro(Operation),
    ColumnDemo { operation: Operation, a: u32, b: u32 },
    GroupsDemo { groups: u32, per_group: u32 },
    BreakApartDemo { a: u32, b: u32 },
    SharingDemo { total: u32, plates: u32 },
    GroupingDemo { total: u32, per_group: u32 },
    Connection,
    TryIt(Operation),
    Summary(Operation),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    Static,
    Demo,
    TryIt,
}

impl StepSpec {
    pub fn kind(self) -> StepKind {
        match self {
            StepSpec::Intro(_) | StepSpec::Connection | StepSpec::Summary(_) => StepKind::Static,
            StepSpec::TryIt(_) => StepKind::TryIt,
            _ => StepKind::Demo,
        }
    }
}

pub fn lesson_plan(operation: Operation) -> Vec<StepSpec> {
    use StepSpec::*;
    match operation {
        Operation::Add => vec![
            Intro(operation),
            ColumnDemo { operation, a: 47, b: 35 },
            ColumnDemo { operation, a: 186, b: 247 },
            TryIt(operation),
            TryIt(operation),
            Summary(operation),
        ],
        Operation::Subtract => vec![
            Intro(operation),
            ColumnDemo { operation, a: 52, b: 37 },
            ColumnDemo { operation, a: 304, b: 156 },
            TryIt(operation),
            TryIt(operation),
            Summary(operation),
        ],
        Operation::Multiply => vec![
            Intro(operation),
            GroupsDemo { groups: 3, per_group: 4 },
            GroupsDemo { groups: 5, per_group: 3 },
            BreakApartDemo { a: 12, b: 3 },
            TryIt(operation),
            Summary(operation),
        ],
        Operation::Divide => vec![
            Intro(operation),
            SharingDemo { total: 12, plates: 3 },
            SharingDemo { total: 20, plates: 4 },
            GroupingDemo { total: 15, per_group: 5 },
            Connection,
            TryIt(operation),
            TryIt(operation),
            Summary(operation),
        ],
    }
}

pub fn lesson_title(operation: Operation) -> &'static str {
    match operation {
        Operation::Add => "Carrying in Addition",
        Operation::Subtract => "Borrowing in Subtraction",
        Operation::Multiply => "Grouping in Multiplication",
        Operation::Divide => "Sharing in Division",
    }
}

/// Text content of a static step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub mascot: String,
    pub title: String,
    pub lines: Vec<String>,
    pub call_to_action: String,
}

impl Page {
    fn new(mascot: &str, title: &str, lines: &[&str], call_to_action: &str) -> Self {
        Self {
            mascot: mascot.to_string(),
            title: title.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            call_to_action: call_to_action.to_string(),
        }
    }
}

pub fn intro_page(operation: Operation) -> Page {
    match operation {
        Operation::Add => Page::new(
            "\u{1f913}",
            "How to Carry in Addition",
            &[
                "When we add two numbers in a column and the answer is 10 or more, we can't fit it in one place!",
                "8 + 5 = 13",
                "13 has two digits! We write the 3 and carry the 1 to the next column.",
                "1 \u{2197} carried!    3 \u{2193} written",
            ],
            "Let's see it in action! Press Next \u{2192}",
        ),
        Operation::Subtract => Page::new(
            "\u{1f914}",
            "How to Borrow in Subtraction",
            &[
                "Sometimes the top number in a column is smaller than the bottom number. We can't subtract!",
                "3 \u{2212} 8 = \u{1f937}",
                "3 is less than 8! We need to borrow from the next column.",
                "5 3  \u{2192} borrow \u{2192}  4 13",
                "5 gives 1 to become 4, and 3 becomes 13!",
            ],
            "Let's practice! Press Next \u{2192}",
        ),
        Operation::Multiply => Page::new(
            "\u{1f9e0}",
            "Multiplication = Making Groups!",
            &[
                "Multiplication is a fast way to add equal groups!",
                "\u{1f34e}\u{1f34e}\u{1f34e}   \u{1f34e}\u{1f34e}\u{1f34e}",
                "2 groups of 3 apples = 2 \u{00d7} 3 = 6 apples!",
                "For bigger numbers, we can break them apart to make it easier!",
            ],
            "Let's explore! Press Next \u{2192}",
        ),
        Operation::Divide => Page::new(
            "\u{1f36a}",
            "What is Division?",
            &[
                "Division means sharing equally!",
                "Imagine you have 12 cookies and 3 friends. How many cookies does each friend get?",
                "12 \u{00f7} 3 = 4",
                "12 cookies shared among 3 friends = 4 cookies each!",
                "Division is the opposite of multiplication:  3 \u{00d7} 4 = 12 \u{2194} 12 \u{00f7} 3 = 4",
            ],
            "Let's see how sharing works! Press Next \u{2192}",
        ),
    }
}

pub fn connection_page() -> Page {
    Page::new(
        "\u{1f4a1}",
        "The Secret Trick!",
        &[
            "Division and multiplication are best friends! They're opposites!",
            "4 \u{00d7} 5 = 20  \u{2194}  20 \u{00f7} 5 = 4",
            "3 \u{00d7} 7 = 21  \u{2194}  21 \u{00f7} 7 = 3",
            "6 \u{00d7} 8 = 48  \u{2194}  48 \u{00f7} 8 = 6",
            "Trick: when you see 20 \u{00f7} 5 = ?, think: \"5 \u{00d7} what = 20?\"",
            "5 \u{00d7} 4 = 20 \u{2192} the answer is 4!",
            "If you know your times tables, division is easy! \u{1f3c6}",
        ],
        "Now try it yourself! Press Next \u{2192}",
    )
}

pub fn summary_page(operation: Operation) -> Page {
    let tip = match operation {
        Operation::Add => {
            "When a column adds to 10 or more, write the ones digit and carry the rest!"
        }
        Operation::Subtract => "When the top is smaller, borrow 10 from the next column!",
        Operation::Multiply => "Break big numbers into tens and ones to make it easy!",
        Operation::Divide => {
            "Division is sharing equally! Think: how many groups of the divisor fit inside the number?"
        }
    };
    let tip_line = format!("\u{1f4a1} {tip}");
    Page::new(
        "\u{1f3c6}",
        "Lesson Complete!",
        &[
            lesson_title(operation),
            &tip_line,
            "\u{2b50}\u{2b50}\u{2b50}\u{2b50}\u{2b50}",
            "You did an amazing job! Keep practicing!",
        ],
        "Press Finish to go back, or try another lesson!",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_lengths() {
        assert_eq!(lesson_plan(Operation::Add).len(), 6);
        assert_eq!(lesson_plan(Operation::Subtract).len(), 6);
        assert_eq!(lesson_plan(Operation::Multiply).len(), 6);
        assert_eq!(lesson_plan(Operation::Divide).len(), 8);
    }

    #[test]
    fn test_plans_open_with_intro_and_close_with_summary() {
        for op in Operation::ALL {
            let plan = lesson_plan(op);
            assert_eq!(plan[0], StepSpec::Intro(op));
            assert_eq!(*plan.last().unwrap(), StepSpec::Summary(op));
        }
    }

    #[test]
    fn test_step_kinds() {
        let kinds: Vec<_> = lesson_plan(Operation::Divide).iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Static,
                StepKind::Demo,
                StepKind::Demo,
                StepKind::Demo,
                StepKind::Static,
                StepKind::TryIt,
                StepKind::TryIt,
                StepKind::Static,
            ]
        );
    }

    #[test]
    fn test_summary_names_the_lesson() {
        let page = summary_page(Operation::Subtract);
        assert_eq!(page.lines[0], "Borrowing in Subtraction");
        assert!(page.lines[1].contains("borrow 10"));
    }
}
