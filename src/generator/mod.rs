pub mod lesson;
pub mod quiz;

use std::ops::RangeInclusive;

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

/// Upper bound on rejection-sampling draws. The constraints used here accept
/// a large share of draws, so this only guards against a broken predicate.
pub const MAX_DRAWS: usize = 10_000;

/// Operand size for quiz problems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DigitLevel {
    One,
    Two,
    Three,
}

impl DigitLevel {
    pub const ALL: [DigitLevel; 3] = [DigitLevel::One, DigitLevel::Two, DigitLevel::Three];

    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            DigitLevel::One => 1..=9,
            DigitLevel::Two => 10..=99,
            DigitLevel::Three => 100..=999,
        }
    }

    pub fn digits(self) -> u8 {
        match self {
            DigitLevel::One => 1,
            DigitLevel::Two => 2,
            DigitLevel::Three => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DigitLevel::One => "1 digit",
            DigitLevel::Two => "2 digits",
            DigitLevel::Three => "3 digits",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DigitLevel::One => DigitLevel::Two,
            DigitLevel::Two => DigitLevel::Three,
            DigitLevel::Three => DigitLevel::One,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DigitLevel::One => DigitLevel::Three,
            DigitLevel::Two => DigitLevel::One,
            DigitLevel::Three => DigitLevel::Two,
        }
    }
}

impl TryFrom<u8> for DigitLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DigitLevel::One),
            2 => Ok(DigitLevel::Two),
            3 => Ok(DigitLevel::Three),
            other => Err(format!("digit level must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<DigitLevel> for u8 {
    fn from(level: DigitLevel) -> Self {
        level.digits()
    }
}

/// Draws from `draw` until `accept` holds. After [`MAX_DRAWS`] misses the
/// last draw is returned as-is.
pub fn draw_until<T: Copy>(
    rng: &mut SmallRng,
    mut draw: impl FnMut(&mut SmallRng) -> T,
    accept: impl Fn(T) -> bool,
) -> T {
    let mut candidate = draw(rng);
    for _ in 0..MAX_DRAWS {
        if accept(candidate) {
            return candidate;
        }
        candidate = draw(rng);
    }
    log::warn!("rejection sampling gave up after {MAX_DRAWS} draws");
    candidate
}

pub fn rand_in(rng: &mut SmallRng, range: RangeInclusive<u32>) -> u32 {
    rng.gen_range(range)
}

/// Hands a subtraction pair on to the column model. Every generator orders
/// its operands so the answer is never negative.
fn subtraction_operands(a: u32, b: u32) -> (u32, u32) {
    debug_assert!(a >= b, "subtraction operands need minuend >= subtrahend ({a} < {b})");
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_level_ranges() {
        assert_eq!(DigitLevel::One.range(), 1..=9);
        assert_eq!(DigitLevel::Two.range(), 10..=99);
        assert_eq!(DigitLevel::Three.range(), 100..=999);
    }

    #[test]
    fn test_level_from_u8() {
        assert_eq!(DigitLevel::try_from(2), Ok(DigitLevel::Two));
        assert!(DigitLevel::try_from(0).is_err());
        assert!(DigitLevel::try_from(4).is_err());
    }

    #[test]
    fn test_level_cycles() {
        for level in DigitLevel::ALL {
            assert_eq!(level.next().prev(), level);
        }
    }

    #[test]
    fn test_draw_until_honours_predicate() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let n = draw_until(&mut rng, |r| r.gen_range(0..100u32), |n| n % 10 == 3);
            assert_eq!(n % 10, 3);
        }
    }

    #[test]
    fn test_draw_until_gives_up_on_impossible_predicate() {
        let mut rng = SmallRng::seed_from_u64(7);
        let n = draw_until(&mut rng, |r| r.gen_range(0..10u32), |_| false);
        assert!(n < 10);
    }

    #[test]
    fn test_subtraction_operands_pass_ordered_pairs() {
        assert_eq!(subtraction_operands(52, 37), (52, 37));
        assert_eq!(subtraction_operands(8, 8), (8, 8));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "minuend >= subtrahend")]
    fn test_subtraction_operands_reject_negative_result() {
        let _ = subtraction_operands(3, 8);
    }
}
