//! Throttle gate for mutation-triggered writes.
//!
//! The gate is a plain state machine driven by the sync loop: `offer` is
//! called for every eligible mutation, `expire` when `deadline` passes.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::ThrottleConfig;

#[derive(Debug)]
pub struct Throttle<T> {
    window: Duration,
    leading: bool,
    trailing: bool,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration, edges: ThrottleConfig) -> Self {
        Self {
            window,
            leading: edges.leading,
            trailing: edges.trailing,
            deadline: None,
            pending: None,
        }
    }

    /// Returns the item when it may run right away. Otherwise the item is
    /// held as the trailing candidate (replacing any earlier one) or dropped.
    ///
    /// A zero window lets every item through.
    pub fn offer(&mut self, item: T, now: Instant) -> Option<T> {
        if self.window.is_zero() {
            return Some(item);
        }
        if self.deadline.is_none() {
            self.deadline = Some(now + self.window);
            if self.leading {
                return Some(item);
            }
        }
        if self.trailing {
            self.pending = Some(item);
        }
        None
    }

    /// When the current window ends, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Closes the window once its deadline has passed and returns the
    /// trailing item, if any. Firing a trailing item opens a new window.
    pub fn expire(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {}
            _ => return None,
        }
        match self.pending.take() {
            Some(item) => {
                self.deadline = Some(now + self.window);
                Some(item)
            }
            None => {
                self.deadline = None;
                None
            }
        }
    }

    /// Drops any deferred item and closes the window.
    pub fn cancel(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
