//! Arithmetic problem generation
//!
//! Problems are immutable once created. All randomness comes from the
//! injected RNG so problem streams are reproducible from a seed.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{CHOICE_COUNT, DECOY_SPREAD, DECOY_SPREAD_DIVISION};

/// Attempts at drawing a single decoy before the whole problem is regenerated
const MAX_DECOY_ATTEMPTS: u32 = 100;

/// Arithmetic operation for a run, chosen before the run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Operation {
    Addition,
    Subtraction,
    #[default]
    Multiplication,
    Division,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "addition" | "add" => Some(Operation::Addition),
            "subtraction" | "sub" => Some(Operation::Subtraction),
            "multiplication" | "mul" => Some(Operation::Multiplication),
            "division" | "div" => Some(Operation::Division),
            _ => None,
        }
    }

    /// Display symbol for the operation
    pub fn symbol(&self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '-',
            Operation::Multiplication => '×',
            Operation::Division => '÷',
        }
    }

    /// Lowest value a decoy may take for this operation
    fn decoy_floor(&self) -> i64 {
        match self {
            Operation::Subtraction => 0,
            _ => 1,
        }
    }

    /// Symmetric decoy offset range
    fn decoy_spread(&self) -> i64 {
        match self {
            Operation::Division => DECOY_SPREAD_DIVISION,
            _ => DECOY_SPREAD,
        }
    }
}

/// A single arithmetic problem with its shuffled answer choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Full display text, e.g. "7 × 6"
    pub text: String,
    /// First operand (dividend for division)
    pub first: i64,
    /// Second operand (divisor for division)
    pub second: i64,
    pub operation: Operation,
    /// The correct result
    pub answer: i64,
    /// Exactly one choice equals `answer`; position is randomized
    pub choices: [i64; CHOICE_COUNT],
}

impl Problem {
    /// Generate a problem for `operation`, drawing operands from `rng`.
    ///
    /// Decoy generation is retried per candidate; if a draw sequence
    /// exhausts its attempts the whole problem is regenerated, so this
    /// always terminates with a valid problem.
    pub fn generate(operation: Operation, rng: &mut impl Rng) -> Self {
        loop {
            let (first, second) = match operation {
                Operation::Addition => (rng.random_range(1..=50), rng.random_range(1..=50)),
                Operation::Subtraction => {
                    let first: i64 = rng.random_range(1..=100);
                    // Second stays below first: result is never negative
                    (first, rng.random_range(0..first))
                }
                Operation::Multiplication => {
                    (rng.random_range(2..=9), rng.random_range(0..=12))
                }
                Operation::Division => {
                    let divisor: i64 = rng.random_range(2..=13);
                    let quotient: i64 = rng.random_range(2..=13);
                    // Dividend is built from the quotient: division is exact
                    (divisor * quotient, divisor)
                }
            };
            if let Some(problem) = Self::from_operands(operation, first, second, rng) {
                return problem;
            }
        }
    }

    /// Build a problem from fixed operands, drawing only decoys and the
    /// shuffle from `rng`. Returns `None` if decoy generation exhausts its
    /// retry budget.
    ///
    /// For division, `first` is the dividend and `second` the divisor.
    pub fn from_operands(
        operation: Operation,
        first: i64,
        second: i64,
        rng: &mut impl Rng,
    ) -> Option<Self> {
        let answer = match operation {
            Operation::Addition => first + second,
            Operation::Subtraction => first - second,
            Operation::Multiplication => first * second,
            Operation::Division => first / second,
        };
        let text = format!("{} {} {}", first, operation.symbol(), second);

        let mut choices = [answer; CHOICE_COUNT];
        let mut count = 1;
        let spread = operation.decoy_spread();
        let floor = operation.decoy_floor();
        let mut attempts = 0;
        while count < CHOICE_COUNT {
            let candidate = answer + rng.random_range(-spread..=spread);
            if candidate >= floor && !choices[..count].contains(&candidate) {
                choices[count] = candidate;
                count += 1;
            } else {
                attempts += 1;
                if attempts > MAX_DECOY_ATTEMPTS {
                    return None;
                }
            }
        }
        choices.shuffle(rng);

        Some(Self {
            text,
            first,
            second,
            operation,
            answer,
            choices,
        })
    }

    /// Two-line split of the problem for the reticle overlay
    pub fn display_lines(&self) -> (String, String) {
        (
            format!(" {}", self.first),
            format!("{}{}", self.operation.symbol(), self.second),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_valid(problem: &Problem) {
        // Exactly 4 distinct choices, one of them the answer
        assert_eq!(problem.choices.len(), CHOICE_COUNT);
        for (i, a) in problem.choices.iter().enumerate() {
            for b in &problem.choices[i + 1..] {
                assert_ne!(a, b, "duplicate choice in {:?}", problem.choices);
            }
        }
        assert!(problem.choices.contains(&problem.answer));
    }

    #[test]
    fn test_addition_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            let p = Problem::generate(Operation::Addition, &mut rng);
            assert!((1..=50).contains(&p.first));
            assert!((1..=50).contains(&p.second));
            assert_eq!(p.answer, p.first + p.second);
            assert_valid(&p);
        }
    }

    #[test]
    fn test_subtraction_never_negative() {
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..200 {
            let p = Problem::generate(Operation::Subtraction, &mut rng);
            assert!(p.second < p.first);
            assert!(p.answer >= 0);
            for c in &p.choices {
                assert!(*c >= 0, "negative subtraction choice {}", c);
            }
            assert_valid(&p);
        }
    }

    #[test]
    fn test_division_exact_and_positive() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let p = Problem::generate(Operation::Division, &mut rng);
            assert_eq!(p.first % p.second, 0);
            assert!((2..=13).contains(&p.second));
            assert!((2..=13).contains(&p.answer));
            for c in &p.choices {
                assert!(*c > 0, "non-positive division choice {}", c);
            }
            assert_valid(&p);
        }
    }

    #[test]
    fn test_multiplication_fixed_operands() {
        let mut rng = Pcg32::seed_from_u64(4);
        let p = Problem::from_operands(Operation::Multiplication, 7, 6, &mut rng)
            .expect("decoy generation should succeed");
        assert!(p.text.contains('7'));
        assert!(p.text.contains('6'));
        assert_eq!(p.answer, 42);
        assert_eq!(p.choices.len(), 4);
        assert!(p.choices.contains(&42));
        assert_eq!(p.display_lines(), (" 7".to_string(), "×6".to_string()));
    }

    #[test]
    fn test_operation_round_trip() {
        for op in [
            Operation::Addition,
            Operation::Subtraction,
            Operation::Multiplication,
            Operation::Division,
        ] {
            assert_eq!(Operation::from_str(op.as_str()), Some(op));
        }
        assert_eq!(Operation::from_str("calculus"), None);
    }

    proptest! {
        #[test]
        fn prop_choices_distinct_and_contain_answer(seed: u64, op_idx in 0usize..4) {
            let op = [
                Operation::Addition,
                Operation::Subtraction,
                Operation::Multiplication,
                Operation::Division,
            ][op_idx];
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = Problem::generate(op, &mut rng);
            assert_valid(&p);
            let floor = if op == Operation::Subtraction { 0 } else { 1 };
            for c in &p.choices {
                prop_assert!(*c >= floor || *c == p.answer);
            }
        }
    }
}
