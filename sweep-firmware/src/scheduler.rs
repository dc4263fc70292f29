//! Cooperative scheduler for timed callbacks.
//!
//! Nothing runs on its own; the owner calls [Scheduler::tick] with the current time (usually when
//! [Scheduler::next_deadline] has passed) and every due task is called back on that same thread.

use core::num::NonZeroU32;

use heapless::Vec;
use sweep_common::globals::MAX_DEFERRED_TASKS;

/// Called with the current time, the owner's context and the task's own state. Returns the delay
/// in milliseconds until it should run again; `0` retires the task.
pub type DeferredFn<C> = fn(now: u64, ctx: &mut C, state: u32) -> u32;

/// Handle to a scheduled task. Tokens are never reused so a stale token can not cancel someone
/// else's task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(NonZeroU32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    ZeroDelay,
    Full,
}

struct DeferredTask<C> {
    token: Token,
    fire_at: u64,
    callback: DeferredFn<C>,
    state: u32,
}

pub struct Scheduler<C, const N: usize = MAX_DEFERRED_TASKS> {
    tasks: Vec<DeferredTask<C>, N>,
    last_token: u32,
}

impl<C, const N: usize> Default for Scheduler<C, N> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            last_token: 0,
        }
    }
}

impl<C, const N: usize> Scheduler<C, N> {
    /// Run `callback` once `delay_ms` have passed since `now`.
    pub fn schedule(
        &mut self,
        now: u64,
        delay_ms: u32,
        callback: DeferredFn<C>,
        state: u32,
    ) -> Result<Token, ScheduleError> {
        if delay_ms == 0 {
            return Err(ScheduleError::ZeroDelay);
        }
        if self.tasks.is_full() {
            crate::warn!("no room for deferred task; {} running", N);
            return Err(ScheduleError::Full);
        }
        let token = self.next_token();
        let task = DeferredTask {
            token,
            fire_at: now + delay_ms as u64,
            callback,
            state,
        };
        if self.tasks.push(task).is_err() {
            return Err(ScheduleError::Full);
        }
        Ok(token)
    }

    /// Stop a task. Returns false if the task already retired or was cancelled.
    pub fn cancel(&mut self, token: Token) -> bool {
        match self.tasks.iter().position(|t| t.token == token) {
            Some(i) => {
                self.tasks.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, token: Token) -> bool {
        self.tasks.iter().any(|t| t.token == token)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_deadline(&self) -> u64 {
        self.tasks.iter().map(|t| t.fire_at).min().unwrap_or(u64::MAX)
    }

    /// Call every task that is due at `now`, in the order they were scheduled. A task is called at
    /// most once per tick.
    pub fn tick(&mut self, now: u64, ctx: &mut C) {
        let mut i = 0;
        while i < self.tasks.len() {
            let task = &self.tasks[i];
            if task.fire_at > now {
                i += 1;
                continue;
            }
            let (fire_at, callback, state) = (task.fire_at, task.callback, task.state);
            let delay = callback(now, ctx, state);
            if delay == 0 {
                self.tasks.remove(i);
                continue;
            }
            let next = fire_at + delay as u64;
            self.tasks[i].fire_at = if next > now {
                next
            } else {
                now + delay as u64
            };
            i += 1;
        }
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    fn next_token(&mut self) -> Token {
        loop {
            self.last_token = self.last_token.wrapping_add(1);
            if let Some(id) = NonZeroU32::new(self.last_token) {
                return Token(id);
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod test;
