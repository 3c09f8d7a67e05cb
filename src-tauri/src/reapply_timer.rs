use std::time::Duration;

use crate::task_slot::TaskSlot;

/// The single periodic re-application task of the main window.
#[derive(Debug, Default)]
pub(crate) struct ReapplyTimer {
    slot: TaskSlot,
}

impl ReapplyTimer {
    /// Replaces any running task with a fresh one calling `tick` every
    /// `period`. The first tick fires one full period after the restart.
    pub(crate) fn restart<F>(&self, period: Duration, tick: F)
    where
        F: Fn() + Send + 'static,
    {
        self.slot.replace(tauri::async_runtime::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tick();
            }
        }));
    }

    pub(crate) fn cancel(&self) {
        if self.slot.cancel() {
            log::debug!("reapply timer cancelled");
        }
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.slot.is_occupied()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
    };

    use super::*;

    fn counting_tick(count: &Arc<AtomicUsize>) -> impl Fn() + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn restart_stops_the_previous_timer() {
        let timer = ReapplyTimer::default();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        timer.restart(Duration::from_millis(60), counting_tick(&first));
        timer.restart(Duration::from_millis(60), counting_tick(&second));
        thread::sleep(Duration::from_millis(400));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert!(second.load(Ordering::SeqCst) >= 2);
        assert!(timer.is_running());
    }

    #[test]
    fn cancel_stops_ticking() {
        let timer = ReapplyTimer::default();
        let ticks = Arc::new(AtomicUsize::new(0));

        timer.restart(Duration::from_millis(30), counting_tick(&ticks));
        thread::sleep(Duration::from_millis(150));
        timer.cancel();
        assert!(!timer.is_running());
        thread::sleep(Duration::from_millis(50));
        let after_cancel = ticks.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(200));

        assert!(after_cancel >= 1);
        assert_eq!(ticks.load(Ordering::SeqCst), after_cancel);
    }
}
