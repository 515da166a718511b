//! Reveal presets
//!
//! Named timing and endpoint bundles for common reveal styles. Applying a
//! preset keeps the text, split mode and once-only flag of the config.

use crate::config::SplitTextConfig;
use std::fmt;
use std::str::FromStr;
use unveil_animation::VisualState;

/// Pre-built reveal styles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealPreset {
    /// Fade in while rising 20px, elastic settle (the default reveal)
    #[default]
    FadeUp,
    /// Plain fade, no movement
    FadeIn,
    /// Fall from above with a bounce
    DropIn,
    /// Rise from further below with a slight overshoot
    Rise,
    /// Fragments appear one after another with no transition
    Typewriter,
}

impl RevealPreset {
    pub const ALL: [RevealPreset; 5] = [
        RevealPreset::FadeUp,
        RevealPreset::FadeIn,
        RevealPreset::DropIn,
        RevealPreset::Rise,
        RevealPreset::Typewriter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RevealPreset::FadeUp => "fade-up",
            RevealPreset::FadeIn => "fade-in",
            RevealPreset::DropIn => "drop-in",
            RevealPreset::Rise => "rise",
            RevealPreset::Typewriter => "typewriter",
        }
    }

    /// Overwrite the timing and endpoints of `config`
    pub fn apply(&self, config: SplitTextConfig) -> SplitTextConfig {
        let shown = VisualState::shown();
        let (delay, duration, ease, from) = match self {
            RevealPreset::FadeUp => (50.0, 2.0, "elastic.out(1, 0.3)", VisualState::hidden_below(20.0)),
            RevealPreset::FadeIn => (30.0, 0.6, "power2.out", VisualState::new(0.0, 0.0)),
            RevealPreset::DropIn => (60.0, 1.2, "bounce.out", VisualState::new(0.0, -24.0)),
            RevealPreset::Rise => (80.0, 1.0, "back.out(1.7)", VisualState::hidden_below(40.0)),
            RevealPreset::Typewriter => (40.0, 0.0, "none", VisualState::new(0.0, 0.0)),
        };

        config
            .delay_ms(delay)
            .duration_secs(duration)
            .ease(ease)
            .from_to(from, shown)
    }
}

impl FromStr for RevealPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset `{}` (expected one of: {})", s, names.join(", "))
            })
    }
}

impl fmt::Display for RevealPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
