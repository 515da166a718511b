//! Stagger timing
//!
//! Stagger steps are configured in milliseconds while transition durations
//! are in seconds. Every conversion between the two happens here.

/// Convert a millisecond quantity to seconds
pub fn ms_to_secs(ms: f32) -> f32 {
    ms / 1000.0
}

/// Forward stagger: fragment `i` starts `i * step` after the run begins
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    step_ms: f32,
}

impl Stagger {
    /// Negative or NaN steps become zero
    pub fn new(step_ms: f32) -> Self {
        Self {
            step_ms: step_ms.max(0.0),
        }
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Start offset of the fragment at `index`, in milliseconds
    pub fn offset_ms(&self, index: usize) -> f32 {
        index as f32 * self.step_ms
    }

    /// Start offset of the fragment at `index`, in seconds
    pub fn offset_secs(&self, index: usize) -> f32 {
        ms_to_secs(self.offset_ms(index))
    }

    /// Seconds until the last of `count` fragments finishes a
    /// `duration_secs` transition. Zero for an empty run.
    pub fn run_length_secs(&self, count: usize, duration_secs: f32) -> f32 {
        match count {
            0 => 0.0,
            n => self.offset_secs(n - 1) + duration_secs,
        }
    }
}
