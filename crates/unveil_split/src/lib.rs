//! Unveil split-text reveal
//!
//! Splits text into characters, words or lines and animates each fragment
//! into view once the text container scrolls into the viewport.
//!
//! The controller owns the policy; rendering, visibility observation and
//! tweening are injected:
//!
//! ```rust
//! use std::rc::Rc;
//! use unveil_animation::TweenEngine;
//! use unveil_core::{Rect, ViewportObserver};
//! use unveil_split::{SplitText, SplitTextConfig};
//! use unveil_text::Granularity;
//!
//! let engine = Rc::new(TweenEngine::new());
//! let viewport = Rc::new(ViewportObserver::new(Rect::new(0.0, 0.0, 800.0, 600.0)));
//!
//! let split = SplitText::new(
//!     SplitTextConfig::new("Hello there").split(Granularity::Words),
//!     engine.clone(),
//! );
//! viewport.set_target_rect(split.root_target(), Rect::new(0.0, 100.0, 400.0, 40.0));
//! split.attach(viewport.clone());
//!
//! // Host frame loop
//! viewport.update();
//! engine.tick(1.0 / 60.0);
//!
//! assert!(split.is_visible());
//! assert_eq!(split.fragments().len(), 3);
//! ```

pub mod config;
pub mod controller;
pub mod driver;
pub mod presets;
pub mod stagger;

pub use config::{ConfigError, SplitTextConfig};
pub use controller::SplitText;
pub use driver::{AnimationDriver, RunId};
pub use presets::RevealPreset;
pub use stagger::Stagger;

pub use unveil_animation::VisualState;
pub use unveil_text::{Fragment, Granularity, WhiteSpace};
