//! Text segmentation for Unveil
//!
//! This crate provides:
//! - Granularity selection (characters, words, lines)
//! - Grapheme-aware splitting that preserves every byte of the input
//! - Per-fragment layout hints (pre-formatted whitespace vs. normal flow)

pub mod granularity;
pub mod segment;

pub use granularity::Granularity;
pub use segment::{join, segment, Fragment, WhiteSpace};

use thiserror::Error;

/// Text segmentation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("unknown split mode `{0}` (expected chars, words or lines)")]
    UnknownGranularity(String),
}
