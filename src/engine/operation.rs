use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Operations offered by the quiz. Division only appears in lessons.
    pub const QUIZ: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "\u{2212}",
            Operation::Multiply => "\u{00d7}",
            Operation::Divide => "\u{00f7}",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::Add => "Addition",
            Operation::Subtract => "Subtraction",
            Operation::Multiply => "Multiplication",
            Operation::Divide => "Division",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    pub fn is_quiz_operation(self) -> bool {
        Self::QUIZ.contains(&self)
    }

    /// Exact result of `a op b`, signed so that callers comparing against
    /// learner input never underflow. Division truncates and treats a zero
    /// divisor as zero.
    pub fn compute(self, a: u32, b: u32) -> i64 {
        let (a, b) = (i64::from(a), i64::from(b));
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0 {
                    0
                } else {
                    a / b
                }
            }
        }
    }

    /// `"12 + 7"`
    pub fn expression(self, a: u32, b: u32) -> String {
        format!("{a} {} {b}", self.symbol())
    }

    /// `"12 + 7 = 19"`
    pub fn equation(self, a: u32, b: u32) -> String {
        format!("{} = {}", self.expression(a, b), self.compute(a, b))
    }
}
