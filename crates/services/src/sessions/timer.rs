use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use quiz_core::countdown::{Countdown, CountdownStep};
use quiz_core::model::PresentationId;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Something the per-question timer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed; carries the seconds left.
    Tick(u32),
    /// Time ran out. Sent once, right after `Tick(0)`.
    Expired,
}

/// A timer event stamped with the presentation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSignal {
    pub presentation: PresentationId,
    pub event: TimerEvent,
}

/// Countdown bound to a single question presentation.
///
/// Runs as a tokio task that pushes `TimerSignal`s into a channel once per
/// second. `cancel` is idempotent; dropping the timer cancels it too.
#[derive(Debug)]
pub struct QuestionTimer {
    presentation: PresentationId,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl QuestionTimer {
    /// Start counting down `duration_secs` for `presentation`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(
        presentation: PresentationId,
        duration_secs: u32,
        signals: UnboundedSender<TimerSignal>,
    ) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut countdown = Countdown::new(duration_secs);

            loop {
                interval.tick().await;
                if flag.load(Ordering::Acquire) {
                    countdown.cancel();
                }
                let send = |event| signals.send(TimerSignal { presentation, event });
                match countdown.tick() {
                    CountdownStep::Tick(remaining) => {
                        if send(TimerEvent::Tick(remaining)).is_err() {
                            break;
                        }
                    }
                    CountdownStep::Expired => {
                        // The task ends here either way; a dropped receiver
                        // only means nobody is waiting for the expiry.
                        if send(TimerEvent::Tick(0)).is_ok() {
                            send(TimerEvent::Expired).ok();
                        }
                        break;
                    }
                    CountdownStep::Inert => break,
                }
            }
        });

        Self {
            presentation,
            cancelled,
            handle: Some(handle),
        }
    }

    #[must_use]
    pub fn presentation(&self) -> PresentationId {
        self.presentation
    }

    /// True until the timer is cancelled or its task has finished.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the countdown. Safe to call any number of times.
    ///
    /// Aborting the task is not immediate on a multi-threaded runtime: a tick
    /// or expiry already being sent can still land in the channel after this
    /// returns. `SessionController` drops such signals because their
    /// `PresentationId` no longer matches the running timer.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
