//! Unveil Animation System
//!
//! Easing curves, visual states, and the tween capability used by the reveal
//! controller.
//!
//! # Features
//!
//! - **Easing**: Power, sine, expo, circ, back, elastic and bounce curves plus
//!   CSS cubic beziers, parsed from GSAP-style identifiers (`"elastic.out(1, 0.3)"`)
//! - **Tweener**: The narrow interface the controller drives
//! - **TweenEngine**: A frame-ticked reference implementation with staggered
//!   delays and completion callbacks

pub mod easing;
pub mod engine;
pub mod tween;
pub mod visual;

pub use easing::{EaseMode, Easing, EasingError};
pub use engine::TweenEngine;
pub use tween::{CompletionCallback, TweenId, TweenRequest, Tweener};
pub use visual::VisualState;
