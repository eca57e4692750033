//! Pure countdown model behind the per-question timer.
//!
//! The runtime timer in the services crate drives this once per elapsed second;
//! keeping the arithmetic here lets the expiry rules be tested without a clock.

/// What a single elapsed second produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Seconds still left after this tick; never zero.
    Tick(u32),
    /// The final second elapsed and the countdown reached zero.
    Expired,
    /// The countdown already expired or was cancelled.
    Inert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    finished: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
            finished: false,
        }
    }

    /// Account for one elapsed second.
    ///
    /// The second that brings `remaining` to zero yields `Expired` exactly once;
    /// every call after that is `Inert`.
    pub fn tick(&mut self) -> CountdownStep {
        if self.finished {
            return CountdownStep::Inert;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.finished = true;
            return CountdownStep::Expired;
        }
        CountdownStep::Tick(self.remaining)
    }

    /// Stop the countdown; later ticks are inert.
    pub fn cancel(&mut self) {
        self.finished = true;
    }
}
