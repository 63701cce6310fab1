// timer.rs - Host timer facility
//
// Thunder is the only thing the simulation schedules off the frame loop.
// `Timers` abstracts `setTimeout`/`clearTimeout` so the browser binding and
// the headless/test clock can share the lightning code.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::StormError;

/// Opaque id handed back by the host when a timeout is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

pub type Task = Box<dyn FnOnce()>;

pub trait Timers {
    /// Run `task` once after `delay_ms`. Fire-and-forget: the caller never waits.
    fn set_timeout(&mut self, delay_ms: f64, task: Task) -> Result<TimerId, StormError>;
    /// Cancel a pending timeout. Cancelling one that already fired is a no-op.
    fn clear_timeout(&mut self, id: TimerId) -> Result<(), StormError>;
}

struct Pending {
    id: TimerId,
    due: f64,
    task: Task,
}

#[derive(Default)]
struct Clock {
    now: f64,
    next_id: i32,
    pending: Vec<Pending>,
}

/// Manually advanced clock. Clones share the same queue, so a test can keep
/// one handle while the scene owns another.
#[derive(Clone, Default)]
pub struct ManualTimers {
    inner: Rc<RefCell<Clock>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Move the clock forward, running every task that comes due in order.
    /// Returns how many tasks ran.
    pub fn advance(&self, ms: f64) -> usize {
        let target = self.inner.borrow().now + ms;
        let mut ran = 0;

        loop {
            // Pop the earliest due task, then release the borrow before running
            // it so the task may schedule more work.
            let next = {
                let mut clock = self.inner.borrow_mut();
                let earliest = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due))
                    .map(|(i, _)| i);
                match earliest {
                    Some(i) => {
                        let p = clock.pending.remove(i);
                        clock.now = p.due;
                        Some(p.task)
                    }
                    None => None,
                }
            };

            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }

        self.inner.borrow_mut().now = target;
        ran
    }
}

impl Timers for ManualTimers {
    fn set_timeout(&mut self, delay_ms: f64, task: Task) -> Result<TimerId, StormError> {
        let mut clock = self.inner.borrow_mut();
        clock.next_id += 1;
        let id = TimerId(clock.next_id);
        let due = clock.now + delay_ms.max(0.0);
        clock.pending.push(Pending { id, due, task });
        Ok(id)
    }

    fn clear_timeout(&mut self, id: TimerId) -> Result<(), StormError> {
        self.inner.borrow_mut().pending.retain(|p| p.id != id);
        Ok(())
    }
}
