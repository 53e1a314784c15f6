use serde::{Deserialize, Serialize};

use crate::feedback::{Effect, Sound};

pub fn percentage(score: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total) * 100.0
}

/// Quiz stars on a five-star scale.
pub fn quiz_stars(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(total) * 5.0).round() as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizTier {
    Perfect,
    Excellent,
    Good,
    NiceTry,
    KeepGoing,
}

impl QuizTier {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 100.0 {
            QuizTier::Perfect
        } else if pct >= 80.0 {
            QuizTier::Excellent
        } else if pct >= 60.0 {
            QuizTier::Good
        } else if pct >= 40.0 {
            QuizTier::NiceTry
        } else {
            QuizTier::KeepGoing
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            QuizTier::Perfect => "PERFECT SCORE! You're a math genius!",
            QuizTier::Excellent => "Excellent work! Almost perfect!",
            QuizTier::Good => "Good job! Keep practising!",
            QuizTier::NiceTry => "Nice try! More practice and you'll do great!",
            QuizTier::KeepGoing => "Keep going! Practice makes perfect!",
        }
    }

    pub fn effects(self) -> Vec<Effect> {
        match self {
            QuizTier::Perfect => vec![Effect::Sound(Sound::Perfect), Effect::Celebrate(120)],
            QuizTier::Excellent => vec![Effect::Sound(Sound::Correct), Effect::Celebrate(60)],
            QuizTier::Good => vec![Effect::Sound(Sound::Correct)],
            QuizTier::NiceTry | QuizTier::KeepGoing => vec![Effect::Sound(Sound::GameOver)],
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, QuizTier::Perfect | QuizTier::Excellent | QuizTier::Good)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableTier {
    Perfect,
    Great,
    Good,
    KeepTrying,
}

impl TableTier {
    /// `pct` is the whole-number percentage, already rounded.
    pub fn from_percentage(pct: u32) -> Self {
        if pct >= 100 {
            TableTier::Perfect
        } else if pct >= 80 {
            TableTier::Great
        } else if pct >= 50 {
            TableTier::Good
        } else {
            TableTier::KeepTrying
        }
    }

    /// Stars on a three-star scale.
    pub fn stars(self) -> u32 {
        match self {
            TableTier::Perfect => 3,
            TableTier::Great => 2,
            TableTier::Good => 1,
            TableTier::KeepTrying => 0,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            TableTier::Perfect => "Perfect! You know this table! \u{1f3c6}",
            TableTier::Great => "Great job! Almost perfect!",
            TableTier::Good => "Good effort! Keep practicing!",
            TableTier::KeepTrying => "Keep trying! Practice makes perfect!",
        }
    }

    pub fn effects(self) -> Vec<Effect> {
        match self {
            TableTier::Perfect => vec![Effect::Sound(Sound::Perfect), Effect::Celebrate(100)],
            TableTier::Great => vec![Effect::Sound(Sound::Correct), Effect::Celebrate(40)],
            TableTier::Good => vec![Effect::Sound(Sound::Correct)],
            TableTier::KeepTrying => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_stars_round_to_nearest() {
        assert_eq!(quiz_stars(5, 5), 5);
        assert_eq!(quiz_stars(0, 5), 0);
        assert_eq!(quiz_stars(7, 10), 4); // 3.5 rounds away from zero
        assert_eq!(quiz_stars(1, 3), 2); // 1.67
        assert_eq!(quiz_stars(0, 0), 0);
    }

    #[test]
    fn test_quiz_tier_thresholds() {
        assert_eq!(QuizTier::from_percentage(100.0), QuizTier::Perfect);
        assert_eq!(QuizTier::from_percentage(80.0), QuizTier::Excellent);
        assert_eq!(QuizTier::from_percentage(79.9), QuizTier::Good);
        assert_eq!(QuizTier::from_percentage(60.0), QuizTier::Good);
        assert_eq!(QuizTier::from_percentage(40.0), QuizTier::NiceTry);
        assert_eq!(QuizTier::from_percentage(39.0), QuizTier::KeepGoing);
    }

    #[test]
    fn test_quiz_tier_effects() {
        assert!(QuizTier::Perfect.effects().contains(&Effect::Celebrate(120)));
        assert_eq!(QuizTier::KeepGoing.effects(), vec![Effect::Sound(Sound::GameOver)]);
    }

    #[test]
    fn test_table_tier_uses_three_stars() {
        assert_eq!(TableTier::from_percentage(100).stars(), 3);
        assert_eq!(TableTier::from_percentage(80).stars(), 2);
        assert_eq!(TableTier::from_percentage(50).stars(), 1);
        assert_eq!(TableTier::from_percentage(49).stars(), 0);
    }

    #[test]
    fn test_percentage_of_empty_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 4), 75.0);
    }
}
