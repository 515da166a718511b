//! Element targets
//!
//! Every rendered element the controller touches (the text container and each
//! fragment) is addressed by a `TargetId`. Observers and tween engines key
//! their state by it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TARGET: AtomicU64 = AtomicU64::new(1);

/// Opaque handle for a rendered element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    /// Allocate a process-unique target id
    pub fn next() -> Self {
        Self(NEXT_TARGET.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let a = TargetId::next();
        let b = TargetId::next();

        assert_ne!(a, b);
        assert!(b > a);
        assert_eq!(format!("{}", a), format!("#{}", a.as_u64()));
    }
}
