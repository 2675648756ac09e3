//! Deferred flushing of rendered CSS into a target.
//!
//! Registrations do not write to the target directly. They schedule one
//! deferred task through a [`Scheduler`]; by the time it runs, any number of
//! further registrations may have happened, and a single write covers them
//! all. Every scheduled task carries a token, and only the task holding the
//! latest token writes. Earlier ones are no-ops.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks at some later point chosen by the host.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: Task);
}

/// Queues tasks until [`tick`](TickScheduler::tick) is called.
///
/// This plays the role of an animation-frame or event-loop turn: everything
/// registered before the tick is flushed in one go.
#[derive(Clone, Default)]
pub struct TickScheduler {
    queue: Arc<Mutex<VecDeque<Task>>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Runs every queued task. Tasks scheduled while ticking wait for the
    /// next tick. Returns how many tasks ran.
    pub fn tick(&self) -> usize {
        let tasks: Vec<Task> = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&self, task: Task) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(task);
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Runs each task as soon as it is scheduled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, task: Task) {
        task();
    }
}

/// Flush bookkeeping: what was last written and which callback is current.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChangeTracker {
    last_flushed_version: u64,
    pending_raw_change: bool,
    pending_token: u64,
}

impl ChangeTracker {
    /// Whether output differs from what the target last received.
    pub fn needs_flush(&self, version: u64) -> bool {
        self.pending_raw_change || version != self.last_flushed_version
    }

    pub fn mark_raw_change(&mut self) {
        self.pending_raw_change = true;
    }

    /// Supersedes any scheduled callback and returns the new current token.
    pub fn issue_token(&mut self) -> u64 {
        self.pending_token += 1;
        self.pending_token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.pending_token == token
    }

    /// Records a completed write of `version`.
    pub fn flushed(&mut self, version: u64) {
        self.last_flushed_version = version;
        self.pending_raw_change = false;
    }

    /// Forgets flush history. The token keeps counting so callbacks issued
    /// before the reset stay stale.
    pub fn reset(&mut self) {
        self.last_flushed_version = 0;
        self.pending_raw_change = false;
        self.pending_token += 1;
    }
}
