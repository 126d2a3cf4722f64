//! Counters kept by an option across calls.

use std::sync::atomic::{AtomicU64, Ordering};

/// Call and degeneracy counters.
///
/// Updated through `&self`, so corrections can run from shared references.
#[derive(Debug)]
pub struct Diagnostics {
    calls: AtomicU64,
    degenerate_faces: AtomicU64,
    skipped: AtomicU64,
}

/// Plain copy of the counters at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    /// Corrections applied.
    pub calls: u64,
    /// Faces where a zero volume fraction removed the convective flux.
    pub degenerate_faces: u64,
    /// Calls for fields the option does not correct.
    pub skipped: u64,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            degenerate_faces: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_degenerate(&self, faces: u64) {
        self.degenerate_faces.fetch_add(faces, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            degenerate_faces: self.degenerate_faces.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.degenerate_faces.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_reset() {
        let d = Diagnostics::new();
        d.record_call();
        d.record_call();
        d.record_degenerate(3);
        d.record_skip();
        assert_eq!(
            d.snapshot(),
            DiagnosticsSnapshot {
                calls: 2,
                degenerate_faces: 3,
                skipped: 1,
            }
        );
        d.reset();
        assert_eq!(d.snapshot(), DiagnosticsSnapshot::default());
    }
}
