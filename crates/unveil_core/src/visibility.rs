//! Visibility tracking
//!
//! Turns the raw "is this region intersecting the viewport" signal of an
//! observation primitive into edge-triggered `Entered` / `Exited` events.
//!
//! The observation primitive itself is a capability ([`VisibilityObserver`])
//! injected by the host. Environments without one (server rendering, plain
//! text output) use [`NoopObserver`], which reports itself as unsupported.

use crate::target::TargetId;
use slotmap::new_key_type;
use tracing::trace;

/// Extra overlap required at the bottom edge before a target counts as
/// visible, as a percentage of the root height.
pub const ROOT_MARGIN_BOTTOM_PERCENT: f32 = 5.0;

new_key_type! {
    /// Handle for one active observation
    pub struct ObservationId;
}

/// Callback receiving the raw `is_intersecting` flag for an observed target
pub type IntersectionCallback = Box<dyn FnMut(bool)>;

// ============================================================================
// Observer configuration
// ============================================================================

/// A margin length, either absolute or relative to the root size
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f32),
    /// Percentage of the root width (left/right) or height (top/bottom)
    Percent(f32),
}

impl Length {
    /// Resolve against the root extent along the margin's axis
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

/// Grows (positive) or shrinks (negative) the root bounds before
/// intersection is computed
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Shrink only the bottom edge by `percent` of the root height
    pub fn bottom_inset_percent(percent: f32) -> Self {
        Self {
            bottom: Length::Percent(-percent),
            ..Self::default()
        }
    }
}

/// Options passed to the observer for each observation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionOptions {
    /// Visible ratio above which a target counts as intersecting.
    /// `0.0` means any overlap at all.
    pub threshold: f32,
    pub root_margin: RootMargin,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::bottom_inset_percent(ROOT_MARGIN_BOTTOM_PERCENT),
        }
    }
}

// ============================================================================
// Observer capability
// ============================================================================

/// A viewport-intersection observation primitive
///
/// Implementations deliver intersection changes asynchronously through the
/// registered callback. They should report the initial state once after
/// `observe`, as browser observers do.
pub trait VisibilityObserver {
    /// Whether observation is available in this environment
    fn is_supported(&self) -> bool {
        true
    }

    /// Start observing `target`. Returns `None` when the observer declines.
    fn observe(
        &self,
        target: TargetId,
        options: IntersectionOptions,
        callback: IntersectionCallback,
    ) -> Option<ObservationId>;

    /// Stop delivering callbacks for an observation
    fn unobserve(&self, id: ObservationId);
}

/// Observer for environments without a viewport
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl VisibilityObserver for NoopObserver {
    fn is_supported(&self) -> bool {
        false
    }

    fn observe(
        &self,
        _target: TargetId,
        _options: IntersectionOptions,
        _callback: IntersectionCallback,
    ) -> Option<ObservationId> {
        None
    }

    fn unobserve(&self, _id: ObservationId) {}
}

// ============================================================================
// Tracker state machine
// ============================================================================

/// Whether the observed region is currently on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Visible,
}

/// A visibility transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityEdge {
    /// Hidden -> Visible
    Entered,
    /// Visible -> Hidden
    Exited,
}

/// Two-state machine fed with raw intersection samples
#[derive(Clone, Debug, Default)]
pub struct VisibilityTracker {
    state: VisibilityState,
    /// Number of transitions taken (for debugging)
    transitions: u64,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == VisibilityState::Visible
    }

    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Feed one intersection sample. Returns the edge taken, if any.
    pub fn observe(&mut self, is_intersecting: bool) -> Option<VisibilityEdge> {
        let (next, edge) = match (self.state, is_intersecting) {
            (VisibilityState::Hidden, true) => {
                (VisibilityState::Visible, Some(VisibilityEdge::Entered))
            }
            (VisibilityState::Visible, false) => {
                (VisibilityState::Hidden, Some(VisibilityEdge::Exited))
            }
            (state, _) => (state, None),
        };

        if let Some(edge) = edge {
            trace!(?edge, "visibility transition");
            self.state = next;
            self.transitions += 1;
        }

        edge
    }

    /// Return to the initial `Hidden` state without emitting an edge
    pub fn reset(&mut self) {
        self.state = VisibilityState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_hidden() {
        let tracker = VisibilityTracker::new();
        assert_eq!(tracker.state(), VisibilityState::Hidden);
        assert!(!tracker.is_visible());
    }

    #[test]
    fn test_edges() {
        let mut tracker = VisibilityTracker::new();

        // Hidden sample while hidden is not an edge
        assert_eq!(tracker.observe(false), None);

        assert_eq!(tracker.observe(true), Some(VisibilityEdge::Entered));
        assert!(tracker.is_visible());
        assert_eq!(tracker.observe(true), None);

        assert_eq!(tracker.observe(false), Some(VisibilityEdge::Exited));
        assert_eq!(tracker.observe(false), None);
        assert_eq!(tracker.observe(true), Some(VisibilityEdge::Entered));

        assert_eq!(tracker.transition_count(), 3);
    }

    #[test]
    fn test_default_options() {
        let options = IntersectionOptions::default();

        assert_eq!(options.threshold, 0.0);
        assert_eq!(options.root_margin.top, Length::Px(0.0));
        assert_eq!(
            options.root_margin.bottom,
            Length::Percent(-ROOT_MARGIN_BOTTOM_PERCENT)
        );
        // -5% of a 600px root pulls the bottom edge up by 30px
        assert_eq!(options.root_margin.bottom.resolve(600.0), -30.0);
    }

    #[test]
    fn test_noop_observer_is_unsupported() {
        let observer = NoopObserver;
        assert!(!observer.is_supported());
        assert!(observer
            .observe(TargetId::next(), IntersectionOptions::default(), Box::new(|_| {}))
            .is_none());
    }
}
