//! Animation driver
//!
//! Issues the per-fragment tween requests for a reveal run and turns the last
//! fragment's completion into the component's completion event.
//!
//! Starting a run supersedes the previous one: its tweens are killed and its
//! completion, should a tween engine still deliver it, is ignored. A reset
//! supersedes the current run in the same way.

use crate::config::SplitTextConfig;
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};
use unveil_animation::{CompletionCallback, TweenRequest, Tweener};
use unveil_core::{Emitter, ListenerId, TargetId};

/// Identifies one animate-in run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Shared with tween completion callbacks
#[derive(Default)]
struct Completion {
    current: Cell<Option<RunId>>,
    completed: Cell<u64>,
    emitter: Emitter,
}

impl Completion {
    fn finish(&self, run: RunId) {
        if self.current.get() != Some(run) {
            trace!(%run, "ignoring completion of superseded run");
            return;
        }
        self.current.set(None);
        self.completed.set(self.completed.get() + 1);
        debug!(%run, "reveal run complete");
        self.emitter.emit(&());
    }
}

/// Drives reveal runs against an injected [`Tweener`]
pub struct AnimationDriver {
    completion: Rc<Completion>,
    runs_started: u64,
    animated_once: bool,
    /// Targets touched by the latest run
    live: Vec<TargetId>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self {
            completion: Rc::new(Completion::default()),
            runs_started: 0,
            animated_once: false,
            live: Vec::new(),
        }
    }

    /// True from the moment the first run starts
    pub fn has_animated_once(&self) -> bool {
        self.animated_once
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Runs that reached their completion event
    pub fn completed_runs(&self) -> u64 {
        self.completion.completed.get()
    }

    /// The run whose completion is still awaited
    pub fn current_run(&self) -> Option<RunId> {
        self.completion.current.get()
    }

    /// Register a completion listener
    pub fn on_complete<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        self.completion.emitter.subscribe(move |_| listener())
    }

    pub fn off_complete(&self, id: ListenerId) -> bool {
        self.completion.emitter.unsubscribe(id)
    }

    /// Animate every target from `config.from` to `config.to`, staggered by
    /// index. Returns `None` without touching anything when there are no
    /// targets.
    pub fn animate_in(
        &mut self,
        targets: &[TargetId],
        config: &SplitTextConfig,
        tweener: &dyn Tweener,
    ) -> Option<RunId> {
        let last = targets.len().checked_sub(1)?;

        self.animated_once = true;
        self.cancel(tweener);

        self.runs_started += 1;
        let run = RunId(self.runs_started);
        self.completion.current.set(Some(run));

        let stagger = config.stagger();
        for (index, &target) in targets.iter().enumerate() {
            tweener.set_immediate(target, config.from);

            let request = TweenRequest {
                from: config.from,
                to: config.to,
                duration_secs: config.duration,
                delay_secs: stagger.offset_secs(index),
                ease: config.ease.clone(),
            };
            let on_complete = (index == last).then(|| self.completion_callback(run));
            tweener.animate(target, request, on_complete);
        }
        self.live = targets.to_vec();

        debug!(
            %run,
            fragments = targets.len(),
            length_secs = config.run_length_secs(targets.len()),
            "reveal run started"
        );
        Some(run)
    }

    /// Pin every target to `config.from` without a transition. Returns false
    /// when there was nothing to reset.
    pub fn reset(
        &mut self,
        targets: &[TargetId],
        config: &SplitTextConfig,
        tweener: &dyn Tweener,
    ) -> bool {
        if targets.is_empty() {
            return false;
        }

        self.cancel(tweener);
        for &target in targets {
            tweener.kill_tweens_of(target);
            tweener.set_immediate(target, config.from);
        }

        debug!(fragments = targets.len(), "reveal reset");
        true
    }

    /// Kill the latest run's tweens and stop waiting for its completion
    pub fn cancel(&mut self, tweener: &dyn Tweener) {
        for target in self.live.drain(..) {
            tweener.kill_tweens_of(target);
        }
        if let Some(run) = self.completion.current.take() {
            trace!(%run, "run superseded");
        }
    }

    fn completion_callback(&self, run: RunId) -> CompletionCallback {
        let completion: Weak<Completion> = Rc::downgrade(&self.completion);
        Box::new(move || {
            if let Some(completion) = completion.upgrade() {
                completion.finish(run);
            }
        })
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}
