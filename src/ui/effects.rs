use std::time::{Duration, Instant};

use crate::feedback::{FeedbackSink, Sound};

pub const EMOJI_DURATION: Duration = Duration::from_millis(1200);
pub const BANNER_DURATION: Duration = Duration::from_millis(1500);

const SPARKLES: [char; 4] = ['*', '+', '\u{2726}', '\u{00b7}'];

/// Feedback sink for the terminal. Sounds become bells, emoji sit in the
/// header for a moment and celebrations draw a sparkle banner.
#[derive(Debug)]
pub struct TerminalFeedback {
    pub sound_on: bool,
    pub celebrations_on: bool,
    bells: u32,
    last_sound: Option<Sound>,
    emoji: Option<(String, Instant)>,
    banner: Option<(u32, Instant)>,
    frame: u64,
}

impl TerminalFeedback {
    pub fn new(sound_on: bool, celebrations_on: bool) -> Self {
        Self {
            sound_on,
            celebrations_on,
            bells: 0,
            last_sound: None,
            emoji: None,
            banner: None,
            frame: 0,
        }
    }

    /// Bells queued since the last call. The caller writes them to the
    /// terminal after drawing.
    pub fn take_bells(&mut self) -> u32 {
        std::mem::take(&mut self.bells)
    }

    pub fn last_sound(&self) -> Option<Sound> {
        self.last_sound
    }

    pub fn emoji(&self) -> Option<&str> {
        self.emoji.as_ref().map(|(s, _)| s.as_str())
    }

    pub fn banner_intensity(&self) -> Option<u32> {
        self.banner.map(|(i, _)| i)
    }

    /// Expires emoji and banners and advances the sparkle animation.
    pub fn tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);
        if self.emoji.as_ref().is_some_and(|(_, at)| now.duration_since(*at) >= EMOJI_DURATION) {
            self.emoji = None;
        }
        if self.banner.is_some_and(|(_, at)| now.duration_since(at) >= BANNER_DURATION) {
            self.banner = None;
        }
    }

    /// One row of sparkles `width` cells wide, or `None` with no banner up.
    pub fn sparkle_row(&self, width: usize, row: usize) -> Option<String> {
        let (intensity, _) = self.banner?;
        Some(sparkle_line(width, intensity, self.frame + row as u64 * 7))
    }
}

/// Higher intensity fills more cells. 120 and above is nearly solid.
pub fn sparkle_line(width: usize, intensity: u32, seed: u64) -> String {
    let density = u64::from(intensity.min(120));
    (0..width as u64)
        .map(|x| {
            let h = (x.wrapping_mul(2_654_435_761) ^ seed.wrapping_mul(40_503)) % 150;
            if h < density {
                SPARKLES[((h + seed) % SPARKLES.len() as u64) as usize]
            } else {
                ' '
            }
        })
        .collect()
}

impl FeedbackSink for TerminalFeedback {
    fn play_sound(&mut self, sound: Sound) {
        self.last_sound = Some(sound);
        if self.sound_on && sound != Sound::Click {
            self.bells += 1;
        }
    }

    fn show_emoji(&mut self, symbol: &str) {
        self.emoji = Some((symbol.to_string(), Instant::now()));
    }

    fn launch_celebration(&mut self, intensity: u32) {
        if self.celebrations_on {
            self.banner = Some((intensity, Instant::now()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Effect;

    #[test]
    fn test_click_is_silent() {
        let mut fx = TerminalFeedback::new(true, true);
        fx.apply(&[
            Effect::Sound(Sound::Click),
            Effect::Sound(Sound::Correct),
            Effect::Sound(Sound::Perfect),
        ]);
        assert_eq!(fx.take_bells(), 2);
        assert_eq!(fx.take_bells(), 0);
        assert_eq!(fx.last_sound(), Some(Sound::Perfect));
    }

    #[test]
    fn test_muted_still_records_sound() {
        let mut fx = TerminalFeedback::new(false, true);
        fx.play_sound(Sound::Wrong);
        assert_eq!(fx.take_bells(), 0);
        assert_eq!(fx.last_sound(), Some(Sound::Wrong));
    }

    #[test]
    fn test_emoji_and_banner_expire() {
        let mut fx = TerminalFeedback::new(true, true);
        fx.apply(&[Effect::emoji("\u{1f914}"), Effect::Celebrate(80)]);
        assert_eq!(fx.emoji(), Some("\u{1f914}"));
        assert_eq!(fx.banner_intensity(), Some(80));
        assert!(fx.sparkle_row(20, 0).is_some());

        let later = Instant::now() + Duration::from_secs(2);
        fx.tick(later);
        assert_eq!(fx.emoji(), None);
        assert_eq!(fx.banner_intensity(), None);
        assert!(fx.sparkle_row(20, 0).is_none());
    }

    #[test]
    fn test_celebrations_off() {
        let mut fx = TerminalFeedback::new(true, false);
        fx.launch_celebration(100);
        assert_eq!(fx.banner_intensity(), None);
    }

    #[test]
    fn test_sparkle_density_scales() {
        let count = |s: String| s.chars().filter(|c| *c != ' ').count();
        let light = count(sparkle_line(300, 20, 1));
        let heavy = count(sparkle_line(300, 120, 1));
        assert!(heavy > light);
        assert_eq!(sparkle_line(300, 0, 1).trim(), "");
        assert_eq!(sparkle_line(12, 60, 3).chars().count(), 12);
    }
}
