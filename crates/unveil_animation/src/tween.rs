//! Tween capability
//!
//! The reveal controller never interpolates anything itself. It asks a
//! [`Tweener`] to pin a target to a state and to run timed transitions.

use crate::visual::VisualState;
use slotmap::new_key_type;
use unveil_core::TargetId;

new_key_type! {
    pub struct TweenId;
}

/// Invoked once when a tween reaches its end state
pub type CompletionCallback = Box<dyn FnOnce()>;

/// A timed transition request
///
/// Times are in seconds. Out-of-range values and unknown easing identifiers
/// are passed through as-is; interpreting them is the engine's job.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenRequest {
    pub from: VisualState,
    pub to: VisualState,
    pub duration_secs: f32,
    /// Time to wait before the transition starts
    pub delay_secs: f32,
    /// Easing identifier, e.g. `"elastic.out(1, 0.3)"`
    pub ease: String,
}

impl TweenRequest {
    pub fn new(from: VisualState, to: VisualState, duration_secs: f32) -> Self {
        Self {
            from,
            to,
            duration_secs,
            delay_secs: 0.0,
            ease: "none".to_string(),
        }
    }

    pub fn delay(mut self, delay_secs: f32) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    pub fn ease(mut self, ease: impl Into<String>) -> Self {
        self.ease = ease.into();
        self
    }
}

/// A tweening engine as seen by the reveal controller
///
/// Methods take `&self` so one engine can be shared between the controller
/// and the host frame loop. Implementations must not invoke a completion
/// callback from inside `animate`; callbacks fire later, from the engine's
/// own clock.
pub trait Tweener {
    /// Pin `target` to `state` immediately, without a transition
    fn set_immediate(&self, target: TargetId, state: VisualState);

    /// Start a transition on `target`
    fn animate(
        &self,
        target: TargetId,
        request: TweenRequest,
        on_complete: Option<CompletionCallback>,
    ) -> TweenId;

    /// Cancel every pending or running tween on `target`. Their completion
    /// callbacks are dropped without being called.
    fn kill_tweens_of(&self, target: TargetId);

    /// The target's element is gone: cancel its tweens and drop any state
    /// kept for it
    fn release(&self, target: TargetId) {
        self.kill_tweens_of(target);
    }
}
