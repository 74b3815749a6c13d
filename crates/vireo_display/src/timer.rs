/*
    Vireo
    https://github.com/vireo-emu/vireo

    Copyright 2025 Vireo Contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    vireo_display::timer.rs

    Monotonic clock trait and a one-shot, re-armable timer queue. Timers are
    tagged values, not closures; the scheduler interprets the tag when the
    timer fires during the tick's timer phase.
*/

use web_time::Instant;

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock based on `web_time::Instant`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Handle to a scheduled timer entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerHandle(u64);

struct TimerEntry<T> {
    handle:   TimerHandle,
    deadline: u64,
    event:    T,
}

/// One-shot timer queue. An armed entry can be re-armed (moving its deadline)
/// or cancelled, but firing always removes it; a caller that wants periodic
/// behavior re-arms explicitly.
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        TimerQueue {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Arm a new one-shot timer due `delay_ms` after `now_ms`.
    pub fn schedule_once(&mut self, now_ms: u64, delay_ms: u64, event: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            handle,
            deadline: now_ms + delay_ms,
            event,
        });
        handle
    }

    /// Move an armed timer's deadline. Returns false if the handle is no
    /// longer armed (already fired or cancelled).
    pub fn rearm(&mut self, handle: TimerHandle, now_ms: u64, delay_ms: u64) -> bool {
        for entry in self.entries.iter_mut() {
            if entry.handle == handle {
                entry.deadline = now_ms + delay_ms;
                return true;
            }
        }
        false
    }

    /// Cancel an armed timer, returning its event if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.handle == handle)?;
        Some(self.entries.remove(idx).event)
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Remove and return all entries due at or before `now_ms`, in the order
    /// they were scheduled.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline <= now_ms {
                due.push(self.entries.remove(i).event);
            }
            else {
                i += 1;
            }
        }
        due
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        TimerQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_at_deadline() {
        let mut q: TimerQueue<u32> = TimerQueue::new();
        q.schedule_once(0, 10, 1);
        q.schedule_once(0, 20, 2);

        assert!(q.take_due(9).is_empty());
        assert_eq!(q.take_due(10), vec![1]);
        assert_eq!(q.take_due(25), vec![2]);
        assert!(q.is_empty());
    }

    #[test]
    fn rearm_moves_deadline_without_duplicating() {
        let mut q: TimerQueue<&str> = TimerQueue::new();
        let h = q.schedule_once(0, 5, "t");

        assert!(q.rearm(h, 10, 0));
        assert!(q.take_due(6).is_empty());
        assert_eq!(q.take_due(10), vec!["t"]);

        // Fired timers cannot be re-armed.
        assert!(!q.rearm(h, 20, 0));
    }

    #[test]
    fn cancel_returns_pending_event() {
        let mut q: TimerQueue<u32> = TimerQueue::new();
        let h = q.schedule_once(0, 5, 7);
        assert!(q.is_armed(h));
        assert_eq!(q.cancel(h), Some(7));
        assert!(!q.is_armed(h));
        assert_eq!(q.cancel(h), None);
    }
}
