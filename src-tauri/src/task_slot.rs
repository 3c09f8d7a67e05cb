use std::{fmt, sync::Mutex, time::Duration};

use tauri::async_runtime::JoinHandle;

/// Holds at most one background task; storing a new one aborts the old one.
#[derive(Default)]
pub(crate) struct TaskSlot {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for TaskSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSlot")
            .field("occupied", &self.is_occupied())
            .finish()
    }
}

impl TaskSlot {
    pub(crate) fn replace(&self, task: JoinHandle<()>) {
        if let Some(previous) = self.swap(Some(task)) {
            previous.abort();
        }
    }

    /// Runs `task` after `delay` unless another schedule or a cancel comes
    /// first.
    pub(crate) fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.replace(tauri::async_runtime::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
    }

    /// Returns whether a task was held.
    pub(crate) fn cancel(&self) -> bool {
        match self.swap(None) {
            Some(previous) => {
                previous.abort();
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_occupied(&self) -> bool {
        match self.task.lock() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    fn swap(&self, next: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        match self.task.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
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

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn bump(count: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn later_schedule_replaces_pending_task() {
        let slot = TaskSlot::default();
        let first = counter();
        let second = counter();

        slot.schedule(Duration::from_millis(80), bump(&first));
        slot.schedule(Duration::from_millis(80), bump(&second));
        thread::sleep(Duration::from_millis(300));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_drops_pending_task() {
        let slot = TaskSlot::default();
        let count = counter();

        slot.schedule(Duration::from_millis(80), bump(&count));
        assert!(slot.is_occupied());
        assert!(slot.cancel());
        assert!(!slot.is_occupied());
        assert!(!slot.cancel());
        thread::sleep(Duration::from_millis(200));

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
