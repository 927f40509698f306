//! src/gate.rs
//! Threshold state and the open/closed decision for tiered messages.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::tier::Tier;

/// Gate deciding whether a message at a given tier should be forwarded.
///
/// Holds the currently active threshold; a call at tier `t` passes the gate
/// iff `t <= threshold`. The threshold is stored atomically so concurrent
/// readers never observe a torn value, but [`scoped`](Self::scoped) changes
/// are restore-to-previous and therefore only meaningful within a single flow
/// of control; concurrent scopes on a shared gate race with each other.
///
/// # Examples
///
/// ```
/// use tiered_debug::{LevelGate, Tier};
///
/// let gate = LevelGate::new(Tier::Lv2);
/// assert!(gate.is_open(Tier::Lv1));
/// assert!(gate.is_open(Tier::Lv2));
/// assert!(!gate.is_open(Tier::Lv3));
///
/// {
///     let _raised = gate.scoped(Tier::Lv5);
///     assert!(gate.is_open(Tier::Lv5));
/// }
/// assert_eq!(gate.threshold(), Tier::Lv2);
/// ```
#[derive(Debug)]
pub struct LevelGate {
    threshold: AtomicU8,
}

impl LevelGate {
    /// Creates a gate with the given initial threshold.
    #[must_use]
    pub const fn new(threshold: Tier) -> Self {
        Self {
            threshold: AtomicU8::new(threshold.get()),
        }
    }

    /// Returns the currently active threshold.
    #[must_use]
    pub fn threshold(&self) -> Tier {
        Tier::from_raw(self.threshold.load(Ordering::Relaxed))
    }

    /// Replaces the threshold; subsequent gate checks use it immediately.
    ///
    /// Validation happens at [`Tier::new`]: a rejected value never reaches
    /// this method, so a failed set leaves the prior threshold untouched.
    pub fn set_threshold(&self, threshold: Tier) {
        self.threshold.store(threshold.get(), Ordering::Relaxed);
    }

    /// Returns true iff a message at `tier` should be forwarded.
    #[must_use]
    pub fn is_open(&self, tier: Tier) -> bool {
        tier <= self.threshold()
    }

    /// Temporarily replaces the threshold for the lifetime of the guard.
    ///
    /// The previous value is restored when the guard drops, on every exit
    /// path including unwinding. Nested guards restore to the immediately
    /// enclosing value. Intended for single-flow-of-control use.
    #[doc(alias = "change_level")]
    #[must_use = "the previous threshold is restored when the guard drops"]
    pub fn scoped(&self, threshold: Tier) -> ThresholdGuard<'_> {
        let previous = self.threshold();
        self.set_threshold(threshold);
        ThresholdGuard {
            gate: self,
            previous,
        }
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::new(Tier::Lv1)
    }
}

/// Guard restoring the enclosing threshold when dropped.
///
/// Returned by [`LevelGate::scoped`].
#[derive(Debug)]
pub struct ThresholdGuard<'gate> {
    gate: &'gate LevelGate,
    previous: Tier,
}

impl ThresholdGuard<'_> {
    /// Returns the threshold that will be restored on drop.
    #[must_use]
    pub const fn previous(&self) -> Tier {
        self.previous
    }
}

impl Drop for ThresholdGuard<'_> {
    fn drop(&mut self) {
        self.gate.set_threshold(self.previous);
    }
}
