use crate::engine::operation::Operation;

/// Hint shown after a wrong answer. `attempt` is the number of attempts
/// already used on the question (1 after the first miss). Division hints
/// serve the sharing try-it, since quizzes never ask division.
pub fn quiz_hint(a: u32, b: u32, op: Operation, attempt: u32) -> String {
    let answer = op.compute(a, b);

    match op {
        Operation::Add => match attempt {
            1 => format!("Try counting up from {a}, then add {b} more!"),
            2 if b > 1 => {
                let part = b / 2;
                format!(
                    "Break it up! {a} + {part} = {}, now add {} more.",
                    a + part,
                    b - part
                )
            }
            2 => format!("What is one more than {a}?"),
            _ => range_hint(answer, 2),
        },
        Operation::Subtract => match attempt {
            1 => format!("Start at {a} and count backwards {b} times!"),
            2 if b > 1 => {
                let part = b / 2;
                format!(
                    "Break it up! {a} - {part} = {}, now take away {} more.",
                    i64::from(a) - i64::from(part),
                    b - part
                )
            }
            2 => format!("What is one less than {a}?"),
            _ => range_hint(answer, 2),
        },
        Operation::Multiply => match attempt {
            1 => format!(
                "Multiply means repeated addition! {a} \u{00d7} {b} = {a} added {b} times."
            ),
            2 => {
                let fewer = b.saturating_sub(1);
                let part = if b > 1 { a * fewer } else { 0 };
                format!("{a} \u{00d7} {fewer} = {part}. Now add one more {a}.")
            }
            _ => range_hint(answer, 3),
        },
        Operation::Divide => match attempt {
            1 => format!("Think: {b} \u{00d7} ? = {a}"),
            _ => format!("Almost! The answer is close to {answer}."),
        },
    }
}

fn range_hint(answer: i64, spread: i64) -> String {
    format!(
        "The answer is between {} and {}.",
        answer - spread,
        answer + spread
    )
}
