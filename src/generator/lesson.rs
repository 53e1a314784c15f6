use rand::Rng;
use rand::rngs::SmallRng;

use crate::generator::{draw_until, rand_in, subtraction_operands};

/// Two-digit addition whose ones column carries.
pub fn carry_addition(rng: &mut SmallRng) -> (u32, u32) {
    draw_until(
        rng,
        |r| (rand_in(r, 20..=89), rand_in(r, 10..=79)),
        |(a, b)| a % 10 + b % 10 >= 10,
    )
}

/// Two-digit subtraction `a - b` with `b < a` whose ones column borrows.
pub fn borrow_subtraction(rng: &mut SmallRng) -> (u32, u32) {
    let (a, b) = draw_until(
        rng,
        |r| {
            let a = rand_in(r, 30..=89);
            let b = rand_in(r, 10..=a - 2);
            (a, b)
        },
        |(a, b)| a % 10 < b % 10,
    );
    subtraction_operands(a, b)
}

/// `(groups, per_group)` for the count-the-groups exercise.
pub fn equal_groups(rng: &mut SmallRng) -> (u32, u32) {
    (rand_in(rng, 2..=5), rand_in(rng, 2..=6))
}

/// `(dividend, divisor)` that divide exactly, with a quotient of 2..=10.
pub fn exact_division(rng: &mut SmallRng) -> (u32, u32) {
    const DIVISORS: [u32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];
    let divisor = DIVISORS[rng.gen_range(0..DIVISORS.len())];
    let quotient = rand_in(rng, 2..=10);
    (divisor * quotient, divisor)
}
