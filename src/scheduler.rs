//! Cooperative timer scheduling
//!
//! The game needs three kinds of callbacks: repeating spawn intervals,
//! one-shot delays (slowdown revert, shield flash) and "next frame". They are
//! modelled as data ([`TimerTask`]) so the session decides what a fired timer
//! means and the queue stays a plain priority list.
//!
//! [`TimerQueue`] runs on a virtual clock: a host advances it with real
//! timestamps (`requestAnimationFrame` in the browser) and tests advance it
//! by hand.

/// Opaque handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Work the session runs when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Run one game loop tick
    Frame,
    SpawnObstacle,
    SpawnPowerUp,
    /// Undo a slowdown picked up during session `epoch`
    RevertSlowdown { epoch: u64 },
    /// Drop the shield-hit flash from session `epoch`
    ResetShipGlow { epoch: u64 },
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub task: TimerTask,
    /// Clock time the timer was due at (ms)
    pub at: f64,
}

/// Timer source for the game session
///
/// Implementations must fire timers in due order, and in scheduling order
/// for timers due at the same instant.
pub trait Scheduler {
    /// Current clock time (ms)
    fn now(&self) -> f64;

    /// Fire `task` every `interval_ms`, first after one interval
    fn schedule_repeating(&mut self, interval_ms: f64, task: TimerTask) -> TimerHandle;

    /// Fire `task` once after `delay_ms`
    fn schedule_once(&mut self, delay_ms: f64, task: TimerTask) -> TimerHandle;

    /// Ask for a [`TimerTask::Frame`] on the next frame
    fn request_frame(&mut self) -> TimerHandle;

    /// Cancel a timer or frame request; unknown handles are ignored
    fn cancel(&mut self, handle: TimerHandle);

    /// Configured interval of a live repeating timer
    fn interval_of(&self, handle: TimerHandle) -> Option<f64>;

    /// Pop the earliest timer due at or before `until`, moving the clock to it
    fn poll_due(&mut self, until: f64) -> Option<Fired>;

    /// Move the clock forward to `to` (never backwards)
    fn advance_clock(&mut self, to: f64);

    /// Take the pending frame request, if any
    fn take_frame(&mut self) -> Option<TimerHandle>;
}

#[derive(Debug, Clone)]
struct Entry {
    handle: TimerHandle,
    due: f64,
    /// Tie-breaker for equal due times; refreshed when a repeat is re-armed
    seq: u64,
    interval: Option<f64>,
    task: TimerTask,
}

/// In-memory timer queue on a virtual clock
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry>,
    frame: Option<TimerHandle>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue starting at clock time `now` (e.g. a page timestamp)
    pub fn starting_at(now: f64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Number of live timers (frame request excluded)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while a frame request is outstanding
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    fn alloc_handle(&mut self) -> TimerHandle {
        self.next_id += 1;
        TimerHandle(self.next_id)
    }

    fn alloc_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn push(&mut self, delay_ms: f64, interval: Option<f64>, task: TimerTask) -> TimerHandle {
        let handle = self.alloc_handle();
        let seq = self.alloc_seq();
        self.entries.push(Entry {
            handle,
            due: self.now + delay_ms.max(0.0),
            seq,
            interval,
            task,
        });
        handle
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> f64 {
        self.now
    }

    fn schedule_repeating(&mut self, interval_ms: f64, task: TimerTask) -> TimerHandle {
        // A zero interval would fire forever within one poll
        let interval_ms = interval_ms.max(1.0);
        self.push(interval_ms, Some(interval_ms), task)
    }

    fn schedule_once(&mut self, delay_ms: f64, task: TimerTask) -> TimerHandle {
        self.push(delay_ms, None, task)
    }

    fn request_frame(&mut self) -> TimerHandle {
        if let Some(handle) = self.frame {
            return handle;
        }
        let handle = self.alloc_handle();
        self.frame = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
            return;
        }
        self.entries.retain(|e| e.handle != handle);
    }

    fn interval_of(&self, handle: TimerHandle) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .and_then(|e| e.interval)
    }

    fn poll_due(&mut self, until: f64) -> Option<Fired> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;

        let due = self.entries[idx].due;
        if due > self.now {
            self.now = due;
        }
        let fired = Fired {
            handle: self.entries[idx].handle,
            task: self.entries[idx].task,
            at: due,
        };
        match self.entries[idx].interval {
            Some(interval) => {
                let seq = self.alloc_seq();
                let entry = &mut self.entries[idx];
                entry.due += interval;
                entry.seq = seq;
            }
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(fired)
    }

    fn advance_clock(&mut self, to: f64) {
        if to > self.now {
            self.now = to;
        }
    }

    fn take_frame(&mut self) -> Option<TimerHandle> {
        self.frame.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut TimerQueue, until: f64) -> Vec<(TimerTask, f64)> {
        let mut out = Vec::new();
        while let Some(f) = queue.poll_due(until) {
            out.push((f.task, f.at));
        }
        queue.advance_clock(until);
        out
    }

    #[test]
    fn test_repeating_fires_each_interval() {
        let mut queue = TimerQueue::new();
        queue.schedule_repeating(100.0, TimerTask::SpawnObstacle);
        let fired = drain(&mut queue, 350.0);
        assert_eq!(
            fired,
            vec![
                (TimerTask::SpawnObstacle, 100.0),
                (TimerTask::SpawnObstacle, 200.0),
                (TimerTask::SpawnObstacle, 300.0),
            ]
        );
        assert_eq!(queue.now(), 350.0);
    }

    #[test]
    fn test_once_fires_once_then_drops() {
        let mut queue = TimerQueue::new();
        queue.schedule_once(50.0, TimerTask::ResetShipGlow { epoch: 1 });
        assert_eq!(drain(&mut queue, 1000.0).len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_due_order_and_ties() {
        let mut queue = TimerQueue::new();
        queue.schedule_repeating(200.0, TimerTask::SpawnPowerUp);
        queue.schedule_repeating(100.0, TimerTask::SpawnObstacle);
        let fired = drain(&mut queue, 200.0);
        assert_eq!(
            fired,
            vec![
                (TimerTask::SpawnObstacle, 100.0),
                (TimerTask::SpawnPowerUp, 200.0),
                (TimerTask::SpawnObstacle, 200.0),
            ]
        );
    }

    #[test]
    fn test_cancel_and_interval_of() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_repeating(2000.0, TimerTask::SpawnObstacle);
        assert_eq!(queue.interval_of(handle), Some(2000.0));
        queue.cancel(handle);
        assert_eq!(queue.interval_of(handle), None);
        assert!(drain(&mut queue, 10_000.0).is_empty());
    }

    #[test]
    fn test_frame_request_is_single_and_cancellable() {
        let mut queue = TimerQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_eq!(a, b);
        queue.cancel(a);
        assert_eq!(queue.take_frame(), None);

        let c = queue.request_frame();
        assert_eq!(queue.take_frame(), Some(c));
        assert_eq!(queue.take_frame(), None);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut queue = TimerQueue::starting_at(500.0);
        queue.advance_clock(100.0);
        assert_eq!(queue.now(), 500.0);
    }
}
