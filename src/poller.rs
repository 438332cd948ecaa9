//! Fixed-period price polling.
//!
//! Every tick refreshes the price of each active coin; every
//! `analysis_every`-th tick also refreshes the multi-timeframe analysis.

use crate::state::Action;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

/// Tick counter deciding when analysis is due.
#[derive(Debug, Clone)]
pub struct Poller {
    every: u64,
    tick: u64,
}

impl Poller {
    pub fn new(analysis_every: u64) -> Self {
        Self {
            every: analysis_every.max(1),
            tick: 0,
        }
    }

    /// Advance one tick. Returns true when analysis should refresh.
    pub fn advance(&mut self) -> bool {
        self.tick = (self.tick + 1) % self.every;
        self.tick == 0
    }

    /// Forget progress, e.g. after the coin set was cleared.
    pub fn reset(&mut self) {
        self.tick = 0;
    }
}

/// Spawn the poll timer. The first tick fires one period after start.
///
/// The task ends when the receiving side of `tx` is dropped.
pub fn spawn_timer(period: Duration, tx: mpsc::UnboundedSender<Action>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        while ticks.next().await.is_some() {
            if tx.send(Action::PollTick).is_err() {
                tracing::debug!("Poll timer stopped");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_every_third_tick() {
        let mut poller = Poller::new(3);
        let due: Vec<bool> = (0..6).map(|_| poller.advance()).collect();
        assert_eq!(due, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_every_tick_when_period_is_one() {
        let mut poller = Poller::new(1);
        assert!(poller.advance());
        assert!(poller.advance());
    }

    #[test]
    fn test_zero_period_is_treated_as_one() {
        let mut poller = Poller::new(0);
        assert!(poller.advance());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_each_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_timer(Duration::from_secs(5), tx);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(matches!(rx.try_recv(), Ok(Action::PollTick)));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(matches!(rx.try_recv(), Ok(Action::PollTick)));

        drop(rx);
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.await.unwrap();
    }
}
