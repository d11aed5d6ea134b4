use cellguard_core::Timestamp;
use std::time::Duration;

/// Tracks how long it has been since an operator was last confirmed present.
///
/// A watchdog that has never seen a confirmation reports unbounded elapsed
/// time, so it is already expired for any finite threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Watchdog {
    last_presence: Option<Timestamp>,
}

impl Watchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A watchdog already reset at `now`.
    pub fn armed_at(now: Timestamp) -> Self {
        Self {
            last_presence: Some(now),
        }
    }

    /// A confirmed signal resets the timer; an unconfirmed one changes nothing.
    /// The reset point never moves backwards, so a late sample stamped before
    /// the last confirmation is absorbed.
    pub fn on_presence(&mut self, confirmed: bool, now: Timestamp) {
        if confirmed {
            self.last_presence = Some(self.last_presence.map_or(now, |last| last.max(now)));
        }
    }

    pub fn last_presence(&self) -> Option<Timestamp> {
        self.last_presence
    }

    /// Zero when `now` precedes the last confirmation; `Duration::MAX` if never confirmed.
    pub fn elapsed_since_presence(&self, now: Timestamp) -> Duration {
        match self.last_presence {
            Some(last) => now.saturating_since(last),
            None => Duration::MAX,
        }
    }

    /// Strictly greater than: a query exactly at the threshold is not expired.
    pub fn is_expired(&self, now: Timestamp, threshold: Duration) -> bool {
        self.elapsed_since_presence(now) > threshold
    }

    pub fn remaining(&self, now: Timestamp, threshold: Duration) -> Duration {
        threshold.saturating_sub(self.elapsed_since_presence(now))
    }

    /// Back to the never-confirmed sentinel.
    pub fn clear(&mut self) {
        self.last_presence = None;
    }
}
