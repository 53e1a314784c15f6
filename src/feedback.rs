//! Feedback effects requested by the sessions. Sessions never play sounds or
//! draw anything themselves; every command returns a [`Reply`] whose effects a
//! front end forwards to its [`FeedbackSink`].

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sound {
    Correct,
    Wrong,
    Click,
    Streak,
    Perfect,
    GameOver,
}

impl Sound {
    pub fn as_str(self) -> &'static str {
        match self {
            Sound::Correct => "correct",
            Sound::Wrong => "wrong",
            Sound::Click => "click",
            Sound::Streak => "streak",
            Sound::Perfect => "perfect",
            Sound::GameOver => "game-over",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Sound(Sound),
    Emoji(String),
    /// Celebration burst; larger numbers mean a bigger burst.
    Celebrate(u32),
}

impl Effect {
    pub fn emoji(symbol: &str) -> Self {
        Effect::Emoji(symbol.to_string())
    }
}

pub trait FeedbackSink {
    fn play_sound(&mut self, sound: Sound);
    fn show_emoji(&mut self, symbol: &str);
    fn launch_celebration(&mut self, intensity: u32);

    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Sound(sound) => self.play_sound(*sound),
                Effect::Emoji(symbol) => self.show_emoji(symbol),
                Effect::Celebrate(intensity) => self.launch_celebration(*intensity),
            }
        }
    }
}

/// Colouring hint for a feedback line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Info,
    Correct,
    Wrong,
    Warn,
}

/// A line of feedback text for the front end to show next to the problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub tone: Tone,
}

impl Notice {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn correct(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Correct)
    }

    pub fn wrong(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Wrong)
    }
}

/// Outcome of a session command plus the effects it asks for, in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply<T> {
    pub outcome: T,
    pub effects: Vec<Effect>,
}

impl<T> Reply<T> {
    pub fn new(outcome: T, effects: Vec<Effect>) -> Self {
        Self { outcome, effects }
    }

    pub fn quiet(outcome: T) -> Self {
        Self {
            outcome,
            effects: Vec::new(),
        }
    }

    pub fn has_sound(&self, sound: Sound) -> bool {
        self.effects.contains(&Effect::Sound(sound))
    }
}

/// Sink that records every effect; useful for headless front ends.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
}

impl FeedbackSink for RecordingSink {
    fn play_sound(&mut self, sound: Sound) {
        self.effects.push(Effect::Sound(sound));
    }

    fn show_emoji(&mut self, symbol: &str) {
        self.effects.push(Effect::emoji(symbol));
    }

    fn launch_celebration(&mut self, intensity: u32) {
        self.effects.push(Effect::Celebrate(intensity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_preserves_order() {
        let mut sink = RecordingSink::default();
        let effects = vec![
            Effect::Sound(Sound::Correct),
            Effect::emoji("\u{1f389}"),
            Effect::Celebrate(30),
        ];
        sink.apply(&effects);
        assert_eq!(sink.effects, effects);
    }

    #[test]
    fn test_reply_has_sound() {
        let reply = Reply::new(2, vec![Effect::Sound(Sound::Click)]);
        assert_eq!(reply.outcome, 2);
        assert!(reply.has_sound(Sound::Click));
        assert!(!reply.has_sound(Sound::Wrong));
    }
}
