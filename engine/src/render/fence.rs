//! Render Fence
//!
//! A monotonically increasing completion counter shared between the CPU
//! frame loop and the GPU queue. The CPU records a fence value against each
//! submitted frame; the queue's completion callback signals that value, and
//! the frame ring blocks in [`RenderFence::wait_until`] only when it is about
//! to reuse a slot whose submission has not finished.
//!
//! Values are strictly increasing and never reused. Waits are unbounded: a
//! hung device stalls the frame loop rather than rendering from buffers the
//! GPU may still read.

use std::sync::{Arc, Condvar, Mutex};

/// Shared monotonic fence. Cheap to clone; clones observe the same counter.
#[derive(Clone)]
pub struct RenderFence {
    inner: Arc<FenceInner>,
}

struct FenceInner {
    completed: Mutex<u64>,
    signaled: Condvar,
}

impl RenderFence {
    /// Create a fence with completed value 0 (no work submitted yet).
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FenceInner {
                completed: Mutex::new(0),
                signaled: Condvar::new(),
            }),
        }
    }

    /// Mark `value` as completed and wake any waiters.
    ///
    /// Signals may arrive out of order if the callback scheduling reorders
    /// them; the counter only ever moves forward.
    pub fn signal(&self, value: u64) {
        let mut completed = self
            .inner
            .completed
            .lock()
            .expect("render fence lock poisoned");
        if value > *completed {
            *completed = value;
            self.inner.signaled.notify_all();
        }
    }

    /// Last value the GPU has finished.
    pub fn completed_value(&self) -> u64 {
        *self
            .inner
            .completed
            .lock()
            .expect("render fence lock poisoned")
    }

    /// Block the calling thread until `value` has been signaled.
    pub fn wait_until(&self, value: u64) {
        let mut completed = self
            .inner
            .completed
            .lock()
            .expect("render fence lock poisoned");
        while *completed < value {
            completed = self
                .inner
                .signaled
                .wait(completed)
                .expect("render fence lock poisoned");
        }
    }
}

impl Default for RenderFence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_starts_at_zero() {
        let fence = RenderFence::new();
        assert_eq!(fence.completed_value(), 0);
    }

    #[test]
    fn test_signal_advances() {
        let fence = RenderFence::new();
        fence.signal(3);
        assert_eq!(fence.completed_value(), 3);
    }

    #[test]
    fn test_signal_never_regresses() {
        let fence = RenderFence::new();
        fence.signal(5);
        fence.signal(2); // Late out-of-order signal
        assert_eq!(fence.completed_value(), 5);
    }

    #[test]
    fn test_wait_until_already_signaled_returns() {
        let fence = RenderFence::new();
        fence.signal(1);
        // Must not block
        fence.wait_until(1);
    }

    #[test]
    fn test_wait_until_cross_thread() {
        let fence = RenderFence::new();
        let signaler = fence.clone();
        let handle = std::thread::spawn(move || {
            signaler.signal(7);
        });
        fence.wait_until(7);
        assert_eq!(fence.completed_value(), 7);
        handle.join().expect("signal thread panicked");
    }
}
