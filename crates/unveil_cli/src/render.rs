//! Terminal rendering of fragment visual states
//!
//! Each grapheme is drawn as itself once its fragment is nearly opaque, and
//! as a shade block while it fades in. Whitespace is always kept so the
//! layout does not jump.

use unicode_segmentation::UnicodeSegmentation;
use unveil_split::{Fragment, Granularity, VisualState};

const SHADES: [char; 4] = [' ', '░', '▒', '▓'];

/// Glyph for one grapheme at the given opacity
pub fn shade(grapheme: &str, opacity: f32) -> String {
    if grapheme.chars().all(char::is_whitespace) {
        return grapheme.to_string();
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 0.95 {
        return grapheme.to_string();
    }
    let step = (opacity * SHADES.len() as f32) as usize;
    SHADES[step.min(SHADES.len() - 1)].to_string()
}

/// Draw one frame. Fragments without a value yet are drawn hidden. Lines
/// go on their own rows.
pub fn frame(fragments: &[(Fragment, Option<VisualState>)], mode: Granularity) -> String {
    let separator = if mode == Granularity::Lines { "\n" } else { "" };

    fragments
        .iter()
        .map(|(fragment, state)| {
            let opacity = state.map(|s| s.opacity).unwrap_or(0.0);
            fragment
                .text()
                .graphemes(true)
                .map(|g| shade(g, opacity))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Mean opacity across fragments, for the progress column
pub fn mean_opacity(fragments: &[(Fragment, Option<VisualState>)]) -> f32 {
    if fragments.is_empty() {
        return 0.0;
    }
    let total: f32 = fragments
        .iter()
        .map(|(_, state)| state.map(|s| s.opacity.clamp(0.0, 1.0)).unwrap_or(0.0))
        .sum();
    total / fragments.len() as f32
}
