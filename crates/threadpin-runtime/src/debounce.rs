#![forbid(unsafe_code)]

//! Settle debouncer for fold/unfold interactions.
//!
//! Collapsing or expanding a thread kicks off host-side layout work; the
//! rebuild waits out a short fixed delay so rows are measured after the
//! layout settles, not mid-flight. Latest-wins: another toggle inside the
//! window extends the deadline. Scroll and resize are never debounced —
//! each pass is linear in the visible row count and cheap enough to run
//! per event.

use std::time::{Duration, Instant};

/// Configuration for the settle debouncer.
#[derive(Debug, Clone, Copy)]
pub struct SettleConfig {
    /// Delay between the last fold/unfold interaction and the rebuild.
    pub settle_delay: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(300),
        }
    }
}

impl SettleConfig {
    /// Set the settle delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

/// Single-deadline debouncer: arm on interaction, fire once after the
/// delay elapses.
#[derive(Debug, Default)]
pub struct SettleDebouncer {
    config: SettleConfig,
    deadline: Option<Instant>,
}

impl SettleDebouncer {
    /// Create a debouncer with the given configuration.
    #[must_use]
    pub const fn new(config: SettleConfig) -> Self {
        Self {
            config,
            deadline: None,
        }
    }

    /// Record an interaction at `now`, arming (or extending) the deadline.
    pub fn note(&mut self, now: Instant) {
        self.deadline = Some(now + self.config.settle_delay);
    }

    /// Whether a rebuild is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once per arming, when the deadline has
    /// passed at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
