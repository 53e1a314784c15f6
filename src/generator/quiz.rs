use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::engine::operation::Operation;
use crate::generator::{DigitLevel, subtraction_operands};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub a: u32,
    pub b: u32,
    pub operation: Operation,
    pub answer: i64,
}

impl Problem {
    pub fn new(a: u32, b: u32, operation: Operation) -> Self {
        Self {
            a,
            b,
            operation,
            answer: operation.compute(a, b),
        }
    }

    pub fn expression(&self) -> String {
        self.operation.expression(self.a, self.b)
    }

    pub fn equation(&self) -> String {
        format!("{} = {}", self.expression(), self.answer)
    }
}

/// Two operands drawn uniformly from the level's range. Subtraction puts the
/// larger operand first so the answer is never negative.
pub fn operand_pair(level: DigitLevel, operation: Operation, rng: &mut SmallRng) -> (u32, u32) {
    let range = level.range();
    let a = rng.gen_range(range.clone());
    let b = rng.gen_range(range);
    match operation {
        Operation::Subtract => subtraction_operands(a.max(b), a.min(b)),
        _ => (a, b),
    }
}

pub fn generate_problem(level: DigitLevel, operation: Operation, rng: &mut SmallRng) -> Problem {
    let (a, b) = operand_pair(level, operation, rng);
    Problem::new(a, b, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_operands_stay_in_level_range() {
        let mut rng = SmallRng::seed_from_u64(42);
        for level in DigitLevel::ALL {
            for _ in 0..200 {
                let (a, b) = operand_pair(level, Operation::Add, &mut rng);
                assert!(level.range().contains(&a));
                assert!(level.range().contains(&b));
            }
        }
    }

    #[test]
    fn test_subtraction_never_goes_negative() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let p = generate_problem(DigitLevel::Two, Operation::Subtract, &mut rng);
            assert!(p.a >= p.b);
            assert!(p.answer >= 0);
        }
    }

    #[test]
    fn test_problem_answer_matches_operation() {
        let p = Problem::new(6, 7, Operation::Multiply);
        assert_eq!(p.answer, 42);
        assert_eq!(p.equation(), "6 \u{00d7} 7 = 42");
    }

    #[test]
    fn test_same_seed_same_problems() {
        let mut r1 = SmallRng::seed_from_u64(9);
        let mut r2 = SmallRng::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(
                generate_problem(DigitLevel::Three, Operation::Add, &mut r1),
                generate_problem(DigitLevel::Three, Operation::Add, &mut r2)
            );
        }
    }
}
