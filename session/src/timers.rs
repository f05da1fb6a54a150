//! Fixed-interval timer bookkeeping.

use std::{collections::BTreeMap, time::Duration};

use resort_tycoon_core::{TimerConfig, TimerKind};

/// Due times of every simulation timer, measured from the last reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerSchedule {
    intervals: BTreeMap<TimerKind, Duration>,
    due: BTreeMap<TimerKind, Duration>,
    elapsed: Duration,
}

impl TimerSchedule {
    /// Creates a schedule whose timers first fire one interval from now.
    #[must_use]
    pub fn new(config: &TimerConfig) -> Self {
        let intervals: BTreeMap<TimerKind, Duration> = TimerKind::ALL
            .into_iter()
            .map(|timer| (timer, config.interval(timer)))
            .collect();
        Self {
            due: intervals.clone(),
            intervals,
            elapsed: Duration::ZERO,
        }
    }

    /// Simulated time since the last reset.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Zeroes the clock and every pending due time.
    pub fn reset(&mut self) {
        self.due = self.intervals.clone();
        self.elapsed = Duration::ZERO;
    }

    /// Advances the clock by `dt` and returns every firing inside the window.
    ///
    /// Firings are ordered by due time, ties broken by [`TimerKind`] order.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerKind> {
        let target = self.elapsed.saturating_add(dt);
        let mut fired = Vec::new();
        while let Some((timer, due)) = self
            .due
            .iter()
            .filter(|(_, due)| **due <= target)
            .min_by_key(|(timer, due)| (**due, **timer))
            .map(|(timer, due)| (*timer, *due))
        {
            fired.push(timer);
            let interval = self.intervals.get(&timer).copied().unwrap_or(Duration::MAX);
            let _ = self.due.insert(timer, due.saturating_add(interval));
        }
        self.elapsed = target;
        fired
    }
}
