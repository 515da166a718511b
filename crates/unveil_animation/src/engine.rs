//! Tween engine
//!
//! Frame-ticked reference [`Tweener`]. The host advances it with
//! [`TweenEngine::tick`] and reads per-target values back for rendering.

use crate::easing::Easing;
use crate::tween::{CompletionCallback, TweenId, TweenRequest, Tweener};
use crate::visual::VisualState;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use tracing::{trace, warn};
use unveil_core::TargetId;

struct Tween {
    from: VisualState,
    to: VisualState,
    easing: Easing,
    duration: f32,
    delay: f32,
    elapsed: f32,
    on_complete: Option<CompletionCallback>,
}

impl Tween {
    /// Advance by `dt` and return the sampled state once the delay has run out
    fn step(&mut self, dt: f32) -> Option<(VisualState, bool)> {
        self.elapsed += dt;
        let local = self.elapsed - self.delay;
        if local < 0.0 {
            return None;
        }

        if self.duration <= 0.0 || local >= self.duration {
            return Some((self.to, true));
        }

        let eased = self.easing.apply(local / self.duration);
        Some((self.from.lerp(&self.to, eased), false))
    }
}

#[derive(Default)]
struct EngineState {
    tweens: SlotMap<TweenId, Tween>,
    /// Tweens per target, in creation order. Later tweens win.
    by_target: FxHashMap<TargetId, SmallVec<[TweenId; 2]>>,
    values: FxHashMap<TargetId, VisualState>,
    clock: f32,
}

impl EngineState {
    fn advance(&mut self, dt: f32) -> Vec<CompletionCallback> {
        self.clock += dt;

        let EngineState {
            tweens,
            by_target,
            values,
            ..
        } = self;
        let mut callbacks = Vec::new();

        for (target, ids) in by_target.iter_mut() {
            ids.retain(|id| {
                let Some(tween) = tweens.get_mut(*id) else {
                    return false;
                };
                let Some((value, finished)) = tween.step(dt) else {
                    return true;
                };
                values.insert(*target, value);

                if finished {
                    if let Some(done) = tweens.remove(*id) {
                        callbacks.extend(done.on_complete);
                    }
                }
                !finished
            });
        }
        by_target.retain(|_, ids| !ids.is_empty());

        callbacks
    }
}

/// Reference tween engine driven by the host's frame loop
#[derive(Default)]
pub struct TweenEngine {
    state: RefCell<EngineState>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance all tweens by `dt_secs` and fire completion callbacks.
    ///
    /// Callbacks run after the engine state is released, so they may start
    /// or kill tweens. Returns the number of callbacks fired.
    pub fn tick(&self, dt_secs: f32) -> usize {
        let callbacks = self.state.borrow_mut().advance(dt_secs.max(0.0));
        let fired = callbacks.len();
        for callback in callbacks {
            callback();
        }
        fired
    }

    /// Current value of a target, if it has ever been set or animated
    pub fn value(&self, target: TargetId) -> Option<VisualState> {
        self.state.borrow().values.get(&target).copied()
    }

    /// Total engine time in seconds
    pub fn clock(&self) -> f32 {
        self.state.borrow().clock
    }

    /// Check if any tweens are pending or running
    pub fn has_active_tweens(&self) -> bool {
        !self.state.borrow().tweens.is_empty()
    }

    /// Get the number of pending or running tweens
    pub fn tween_count(&self) -> usize {
        self.state.borrow().tweens.len()
    }

    pub fn tweens_of(&self, target: TargetId) -> usize {
        self.state
            .borrow()
            .by_target
            .get(&target)
            .map_or(0, |ids| ids.len())
    }

    /// Number of targets with a stored value
    pub fn tracked_targets(&self) -> usize {
        self.state.borrow().values.len()
    }
}

impl Tweener for TweenEngine {
    fn set_immediate(&self, target: TargetId, state: VisualState) {
        self.state.borrow_mut().values.insert(target, state);
    }

    fn animate(
        &self,
        target: TargetId,
        request: TweenRequest,
        on_complete: Option<CompletionCallback>,
    ) -> TweenId {
        let easing = match request.ease.parse::<Easing>() {
            Ok(easing) => easing,
            Err(err) => {
                warn!(ease = %request.ease, %err, "unrecognized easing, falling back to linear");
                Easing::Linear
            }
        };

        trace!(
            %target,
            delay = request.delay_secs,
            duration = request.duration_secs,
            "tween scheduled"
        );

        let mut state = self.state.borrow_mut();
        let id = state.tweens.insert(Tween {
            from: request.from,
            to: request.to,
            easing,
            // NaN and negative times collapse to zero
            duration: request.duration_secs.max(0.0),
            delay: request.delay_secs.max(0.0),
            elapsed: 0.0,
            on_complete,
        });
        state.by_target.entry(target).or_default().push(id);
        id
    }

    fn kill_tweens_of(&self, target: TargetId) {
        let mut state = self.state.borrow_mut();
        if let Some(ids) = state.by_target.remove(&target) {
            for id in ids {
                state.tweens.remove(id);
            }
        }
    }

    /// Kill the target's tweens and drop its stored value
    fn release(&self, target: TargetId) {
        self.kill_tweens_of(target);
        self.state.borrow_mut().values.remove(&target);
    }
}
