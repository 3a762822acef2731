// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decorative countdown shown on the maintenance page.
//!
//! The countdown starts from a fixed seed on every page view and has no
//! relation to `estimatedTime` or to the gate. It only ever counts down to
//! zero and then stays there.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use utoipa::ToSchema;

/// Interval between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Countdown {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Countdown {
    pub const fn new(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Fixed starting value for every page view.
    pub const fn seed() -> Self {
        Self::new(2, 14, 30, 0)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::new(0, 0, 0, 0)
    }

    /// Advance by one second.
    ///
    /// A unit at zero borrows from the next larger non-zero unit; when all
    /// units are zero nothing changes.
    pub fn tick(&mut self) {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        } else if self.days > 0 {
            self.days -= 1;
            self.hours = 23;
            self.minutes = 59;
            self.seconds = 59;
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::seed()
    }
}

/// A running countdown, ticking once per second on the tokio runtime.
///
/// The background task is cancelled when the ticker is dropped.
pub struct CountdownTicker {
    rx: watch::Receiver<Countdown>,
    _cancel: DropGuard,
}

impl CountdownTicker {
    /// Start ticking from `from`. Must be called inside a tokio runtime.
    pub fn start(from: Countdown) -> Self {
        Self::start_with_interval(from, TICK_INTERVAL)
    }

    fn start_with_interval(from: Countdown, period: Duration) -> Self {
        let (tx, rx) = watch::channel(from);
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        tx.send_if_modified(|countdown| {
                            let before = *countdown;
                            countdown.tick();
                            *countdown != before
                        });
                    }
                    _ = cancelled.cancelled() => {
                        tracing::debug!("Countdown ticker stopped");
                        return;
                    }
                }
            }
        });

        Self {
            rx,
            _cancel: token.drop_guard(),
        }
    }

    #[cfg(test)]
    fn current(&self) -> Countdown {
        *self.rx.borrow()
    }

    /// Receiver notified on every change.
    pub fn watch(&self) -> watch::Receiver<Countdown> {
        self.rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_decrements_seconds() {
        let mut countdown = Countdown::new(1, 2, 3, 4);
        countdown.tick();
        assert_eq!(countdown, Countdown::new(1, 2, 3, 3));
    }

    #[test]
    fn seconds_borrow_from_minutes() {
        let mut countdown = Countdown::new(0, 0, 5, 0);
        countdown.tick();
        assert_eq!(countdown, Countdown::new(0, 0, 4, 59));
    }

    #[test]
    fn minutes_borrow_from_hours() {
        let mut countdown = Countdown::new(0, 3, 0, 0);
        countdown.tick();
        assert_eq!(countdown, Countdown::new(0, 2, 59, 59));
    }

    #[test]
    fn hours_borrow_from_days() {
        let mut countdown = Countdown::new(1, 0, 0, 0);
        countdown.tick();
        assert_eq!(countdown, Countdown::new(0, 23, 59, 59));
    }

    #[test]
    fn never_goes_below_zero() {
        let mut countdown = Countdown::new(0, 0, 0, 1);
        countdown.tick();
        countdown.tick();
        assert!(countdown.is_zero());

        for _ in 0..10 {
            countdown.tick();
        }
        assert_eq!(countdown, Countdown::new(0, 0, 0, 0));
    }

    #[test]
    fn seed_is_not_zero() {
        assert!(!Countdown::seed().is_zero());
        assert_eq!(Countdown::default(), Countdown::seed());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_counts_down_and_stops_at_zero() {
        let ticker = CountdownTicker::start(Countdown::new(0, 0, 0, 2));
        let mut rx = ticker.watch();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Countdown::new(0, 0, 0, 1));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Countdown::new(0, 0, 0, 0));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(ticker.current().is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_ticker_cancels_task() {
        let ticker = CountdownTicker::start(Countdown::seed());
        let mut rx = ticker.watch();

        drop(ticker);
        tokio::time::sleep(Duration::from_secs(3)).await;

        // The sender lives in the task, so a cancelled task closes the channel.
        assert!(rx.changed().await.is_err());
    }
}
