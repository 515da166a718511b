//! Split-text reveal controller
//!
//! `SplitText` ties the pieces together:
//!
//! - the segmenter turns `text` into fragments, each rendered as its own target
//! - a [`VisibilityObserver`] watches the container and feeds the tracker
//! - tracker edges drive the [`AnimationDriver`]: animate on enter, reset on
//!   exit (unless the reveal is once-only)
//! - re-rendered fragments re-animate immediately while on screen
//!
//! State is shared with the observer callback through a `Weak` handle, so a
//! dropped controller silently ignores late notifications.

use crate::config::SplitTextConfig;
use crate::driver::{AnimationDriver, RunId};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use unveil_animation::Tweener;
use unveil_core::{
    IntersectionCallback, IntersectionOptions, ListenerId, ObservationId, TargetId,
    VisibilityEdge, VisibilityObserver, VisibilityTracker,
};
use unveil_text::{segment, Fragment, Granularity};

struct Attachment {
    observer: Rc<dyn VisibilityObserver>,
    observation: ObservationId,
}

struct Shared {
    config: SplitTextConfig,
    fragments: Vec<Fragment>,
    /// One target per fragment, same order
    targets: Vec<TargetId>,
    root: TargetId,
    tracker: VisibilityTracker,
    driver: AnimationDriver,
    /// Visibility and re-render reactions are live
    observing: bool,
    attachment: Option<Attachment>,
}

impl Shared {
    fn animate_in(&mut self, tweener: &dyn Tweener) -> Option<RunId> {
        self.driver.animate_in(&self.targets, &self.config, tweener)
    }

    fn reset(&mut self, tweener: &dyn Tweener) -> bool {
        self.driver.reset(&self.targets, &self.config, tweener)
    }

    fn on_intersection(&mut self, tweener: &dyn Tweener, is_intersecting: bool) {
        if !self.observing {
            return;
        }

        match self.tracker.observe(is_intersecting) {
            Some(VisibilityEdge::Entered) => {
                debug!(root = %self.root, "split text entered view");
                if self.config.animate_only_once && self.driver.has_animated_once() {
                    debug!("already revealed once, skipping");
                } else {
                    self.animate_in(tweener);
                }
            }
            Some(VisibilityEdge::Exited) => {
                debug!(root = %self.root, "split text left view");
                if !self.config.animate_only_once {
                    self.reset(tweener);
                }
            }
            None => {}
        }
    }

    /// Re-segment after an input change. Returns true when the fragment
    /// collection changed.
    fn rerender(&mut self, tweener: &dyn Tweener) -> bool {
        let fragments = segment(&self.config.text, self.config.split);
        if fragments == self.fragments {
            return false;
        }

        // The old fragment elements are gone, along with their run
        self.driver.cancel(tweener);
        for target in self.targets.drain(..) {
            tweener.release(target);
        }
        self.targets = fragments.iter().map(|_| TargetId::next()).collect();
        self.fragments = fragments;
        debug!(fragments = self.fragments.len(), "split text re-rendered");

        if self.observing && self.tracker.is_visible() {
            self.animate_in(tweener);
        }
        true
    }
}

/// Visibility-triggered split-text reveal
pub struct SplitText {
    shared: Rc<RefCell<Shared>>,
    tweener: Rc<dyn Tweener>,
}

impl SplitText {
    /// Segment `config.text` and allocate one target per fragment. Nothing
    /// animates until [`SplitText::attach`] is called.
    pub fn new(config: SplitTextConfig, tweener: Rc<dyn Tweener>) -> Self {
        let fragments = segment(&config.text, config.split);
        let targets = fragments.iter().map(|_| TargetId::next()).collect();

        Self {
            shared: Rc::new(RefCell::new(Shared {
                config,
                fragments,
                targets,
                root: TargetId::next(),
                tracker: VisibilityTracker::new(),
                driver: AnimationDriver::new(),
                observing: false,
                attachment: None,
            })),
            tweener,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start observing the container. Returns false when the observer is
    /// unavailable in this environment (the reveal then never triggers) or
    /// the controller is already attached.
    pub fn attach(&self, observer: Rc<dyn VisibilityObserver>) -> bool {
        if !observer.is_supported() {
            debug!("visibility observation unavailable, reveal disabled");
            return false;
        }

        let root = {
            let mut shared = self.shared.borrow_mut();
            if shared.observing {
                return false;
            }
            shared.observing = true;
            shared.root
        };

        let weak = Rc::downgrade(&self.shared);
        let tweener = Rc::clone(&self.tweener);
        let callback: IntersectionCallback = Box::new(move |is_intersecting| {
            if let Some(shared) = weak.upgrade() {
                shared
                    .borrow_mut()
                    .on_intersection(tweener.as_ref(), is_intersecting);
            }
        });

        let observation = observer.observe(root, IntersectionOptions::default(), callback);

        let mut shared = self.shared.borrow_mut();
        match observation {
            Some(observation) if shared.observing => {
                shared.attachment = Some(Attachment {
                    observer,
                    observation,
                });
                debug!(%root, "split text attached");
                true
            }
            Some(observation) => {
                // Torn down while the observer delivered its first report
                drop(shared);
                observer.unobserve(observation);
                false
            }
            None => {
                shared.observing = false;
                false
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.shared.borrow().observing
    }

    /// Stop observing and stop reacting to re-renders. Tweens already handed
    /// to the engine keep running.
    pub fn teardown(&self) {
        let attachment = {
            let mut shared = self.shared.borrow_mut();
            shared.observing = false;
            // The next observation reports its own initial state
            shared.tracker.reset();
            shared.attachment.take()
        };

        if let Some(Attachment {
            observer,
            observation,
        }) = attachment
        {
            observer.unobserve(observation);
            debug!("split text detached");
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Replace the source text
    pub fn set_text(&self, text: impl Into<String>) -> bool {
        let mut shared = self.shared.borrow_mut();
        shared.config.text = text.into();
        shared.rerender(self.tweener.as_ref())
    }

    /// Change the split granularity
    pub fn set_split_mode(&self, split: Granularity) -> bool {
        let mut shared = self.shared.borrow_mut();
        shared.config.split = split;
        shared.rerender(self.tweener.as_ref())
    }

    /// Replace every input. Timing and endpoint changes apply to the next run.
    pub fn set_config(&self, config: SplitTextConfig) -> bool {
        let mut shared = self.shared.borrow_mut();
        shared.config = config;
        shared.rerender(self.tweener.as_ref())
    }

    // ========================================================================
    // Manual control
    // ========================================================================

    /// Start a reveal run now, regardless of visibility
    pub fn animate_in(&self) -> Option<RunId> {
        self.shared.borrow_mut().animate_in(self.tweener.as_ref())
    }

    /// Pin every fragment to its start state
    pub fn reset(&self) -> bool {
        self.shared.borrow_mut().reset(self.tweener.as_ref())
    }

    // ========================================================================
    // Completion event
    // ========================================================================

    /// Called once per reveal run that finishes without being superseded
    pub fn on_complete<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        self.shared.borrow().driver.on_complete(listener)
    }

    pub fn off_complete(&self, id: ListenerId) -> bool {
        self.shared.borrow().driver.off_complete(id)
    }

    pub fn completed_runs(&self) -> u64 {
        self.shared.borrow().driver.completed_runs()
    }

    pub fn runs_started(&self) -> u64 {
        self.shared.borrow().driver.runs_started()
    }

    // ========================================================================
    // Rendering accessors
    // ========================================================================

    /// The container target observed for visibility
    pub fn root_target(&self) -> TargetId {
        self.shared.borrow().root
    }

    pub fn fragments(&self) -> Vec<Fragment> {
        self.shared.borrow().fragments.clone()
    }

    pub fn targets(&self) -> Vec<TargetId> {
        self.shared.borrow().targets.clone()
    }

    /// Fragments paired with their targets, in source order
    pub fn rendered(&self) -> Vec<(TargetId, Fragment)> {
        let shared = self.shared.borrow();
        shared
            .targets
            .iter()
            .copied()
            .zip(shared.fragments.iter().cloned())
            .collect()
    }

    pub fn config(&self) -> SplitTextConfig {
        self.shared.borrow().config.clone()
    }

    pub fn style_class(&self) -> Option<String> {
        self.shared.borrow().config.style_class.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.borrow().tracker.is_visible()
    }

    pub fn has_animated_once(&self) -> bool {
        self.shared.borrow().driver.has_animated_once()
    }
}

impl Drop for SplitText {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_animation::TweenEngine;
    use unveil_core::NoopObserver;

    fn engine() -> Rc<TweenEngine> {
        Rc::new(TweenEngine::new())
    }

    #[test]
    fn test_targets_follow_fragments() {
        let split = SplitText::new(
            SplitTextConfig::new("Hi there").split(Granularity::Words),
            engine(),
        );

        let rendered = split.rendered();
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[2].1.text(), "there");
        assert!(!split.targets().contains(&split.root_target()));
    }

    #[test]
    fn test_unsupported_observer_disables_reveal() {
        let split = SplitText::new(SplitTextConfig::new("ab"), engine());

        assert!(!split.attach(Rc::new(NoopObserver)));
        assert!(!split.is_attached());
        assert!(!split.has_animated_once());
    }

    #[test]
    fn test_rerender_only_on_fragment_change() {
        let split = SplitText::new(SplitTextConfig::new("ab"), engine());
        let before = split.targets();

        assert!(!split.set_text("ab"));
        assert_eq!(split.targets(), before);

        assert!(split.set_text("abc"));
        assert_eq!(split.targets().len(), 3);
        assert!(split.targets().iter().all(|t| !before.contains(t)));

        // "abc" as a single word is a different collection
        assert!(split.set_split_mode(Granularity::Words));
        assert_eq!(split.fragments().len(), 1);
    }

    #[test]
    fn test_rerender_releases_old_targets() {
        let engine = engine();
        let split = SplitText::new(SplitTextConfig::new("ab"), engine.clone());
        split.animate_in();
        let old = split.targets();
        assert_eq!(engine.tracked_targets(), 2);

        split.set_text("xyz");

        for target in old {
            assert_eq!(engine.value(target), None);
            assert_eq!(engine.tweens_of(target), 0);
        }
        assert_eq!(engine.tracked_targets(), 0);
    }

    #[test]
    fn test_manual_animate_and_reset() {
        let engine = engine();
        let split = SplitText::new(SplitTextConfig::new("ab"), engine.clone());

        assert!(split.animate_in().is_some());
        assert!(split.has_animated_once());

        assert!(split.reset());
        for target in split.targets() {
            assert_eq!(engine.value(target), Some(split.config().from));
        }
    }

    #[test]
    fn test_empty_text_is_inert() {
        let engine = engine();
        let split = SplitText::new(SplitTextConfig::new(""), engine.clone());

        assert!(split.fragments().is_empty());
        assert_eq!(split.animate_in(), None);
        assert!(!split.reset());
        assert!(!engine.has_active_tweens());
    }
}
