//! Polled task queue for periodic and delayed UI work.
//!
//! Everything runs on the UI thread: the app polls [`Scheduler::pop_due`]
//! once per frame and dispatches whatever comes out. Cancelling through a
//! [`TaskHandle`] removes the task immediately, so a cancelled task can never
//! be returned by a later poll.

use std::time::{Duration, Instant};

/// Cancellation token for a scheduled task. Consumed by [`Scheduler::cancel`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle makes the task impossible to cancel"]
pub struct TaskHandle {
    id: u64,
}

struct ScheduledTask<T> {
    id: u64,
    task: T,
    due: Instant,
    period: Option<Duration>,
}

pub struct Scheduler<T> {
    next_id: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self { next_id: 0, tasks: Vec::new() }
    }

    /// Repeats `task` every `period`, first firing one period after `now`
    pub fn every(&mut self, now: Instant, period: Duration, task: T) -> TaskHandle {
        let period = period.max(Duration::from_millis(1));
        self.push(task, now + period, Some(period))
    }

    /// Fires `task` once, `delay` after `now`
    pub fn after(&mut self, now: Instant, delay: Duration, task: T) -> TaskHandle {
        self.push(task, now + delay, None)
    }

    /// Returns whether the task was still pending
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != handle.id);
        self.tasks.len() != before
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, handle: &TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.id == handle.id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Takes the earliest task due at `now`. Repeating tasks fire at most once
    /// per call and are rescheduled past `now`, skipping missed periods.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        let index = self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        match self.tasks[index].period {
            Some(period) => {
                let entry = &mut self.tasks[index];
                while entry.due <= now {
                    entry.due += period;
                }
                Some(entry.task.clone())
            },
            None => Some(self.tasks.swap_remove(index).task),
        }
    }

    fn push(&mut self, task: T, due: Instant, period: Option<Duration>) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(ScheduledTask { id, task, due, period });
        TaskHandle { id }
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
