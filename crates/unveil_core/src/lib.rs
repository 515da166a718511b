//! Unveil Core Runtime
//!
//! Foundational primitives shared by the Unveil crates:
//!
//! - **Targets**: Opaque handles for rendered elements (fragments, containers)
//! - **Events**: Single-threaded emitters for lifecycle notifications
//! - **Visibility**: Edge-triggered tracking on top of a pluggable observer
//! - **Viewport**: A headless rectangle-overlap observer for tests and previews
//!
//! # Example
//!
//! ```rust
//! use unveil_core::visibility::{VisibilityEdge, VisibilityTracker};
//!
//! let mut tracker = VisibilityTracker::new();
//!
//! assert_eq!(tracker.observe(true), Some(VisibilityEdge::Entered));
//! assert_eq!(tracker.observe(true), None);
//! assert_eq!(tracker.observe(false), Some(VisibilityEdge::Exited));
//! ```

pub mod events;
pub mod target;
pub mod viewport;
pub mod visibility;

pub use events::{Emitter, ListenerId};
pub use target::TargetId;
pub use viewport::{Rect, ViewportObserver};
pub use visibility::{
    IntersectionCallback, IntersectionOptions, Length, NoopObserver, ObservationId, RootMargin,
    VisibilityEdge, VisibilityObserver, VisibilityState, VisibilityTracker,
    ROOT_MARGIN_BOTTOM_PERCENT,
};
