// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing frame requests.
//!
//! [`FrameRequests`] is the single piece of shared mutable state in a
//! driver: a "frame pending" flag and a "stopped" flag. It is a cheap `Rc`
//! handle so listeners (controller change, window resize) can request a frame
//! from inside another frame without re-borrowing the driver.
//!
//! At most one frame is pending at a time. Requesting while one is pending
//! is a no-op.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use crate::backend::Host;

/// Counters describing how requests were handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestStats {
    /// Requests that scheduled a host frame.
    pub scheduled: u64,
    /// Requests dropped because a frame was already pending.
    pub coalesced: u64,
}

/// Shared handle to a driver's pending-frame and stopped flags.
#[derive(Clone)]
pub struct FrameRequests {
    inner: Rc<Inner>,
}

struct Inner {
    host: Rc<dyn Host>,
    pending: Cell<bool>,
    stopped: Cell<bool>,
    scheduled: Cell<u64>,
    coalesced: Cell<u64>,
}

impl fmt::Debug for FrameRequests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRequests")
            .field("pending", &self.inner.pending.get())
            .field("stopped", &self.inner.stopped.get())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl FrameRequests {
    /// Creates a handle that schedules frames on `host`.
    #[must_use]
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                pending: Cell::new(false),
                stopped: Cell::new(false),
                scheduled: Cell::new(0),
                coalesced: Cell::new(0),
            }),
        }
    }

    /// Requests one future frame.
    ///
    /// Returns `true` if a host frame was scheduled, `false` if the request
    /// was coalesced into the pending one, the driver is stopped, or the
    /// host refused to schedule. A refused request leaves nothing pending.
    pub fn request(&self) -> bool {
        let inner = &self.inner;
        if inner.stopped.get() {
            return false;
        }
        if inner.pending.get() {
            inner.coalesced.set(inner.coalesced.get() + 1);
            return false;
        }
        inner.pending.set(true);
        if !inner.host.schedule_frame() {
            inner.pending.set(false);
            return false;
        }
        inner.scheduled.set(inner.scheduled.get() + 1);
        true
    }

    /// Clears the pending flag. Called first thing in every frame so that a
    /// request made while the frame runs is not lost.
    pub fn begin_frame(&self) {
        self.inner.pending.set(false);
    }

    /// Stops the handle: future requests are ignored and a pending host frame
    /// is cancelled. Idempotent.
    pub fn stop(&self) {
        let inner = &self.inner;
        if inner.stopped.replace(true) {
            return;
        }
        if inner.pending.replace(false) {
            inner.host.cancel_frame();
        }
    }

    /// Returns `true` while a requested frame has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get()
    }

    /// Returns `true` after [`stop`](Self::stop).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.get()
    }

    /// Returns request counters.
    #[must_use]
    pub fn stats(&self) -> RequestStats {
        RequestStats {
            scheduled: self.inner.scheduled.get(),
            coalesced: self.inner.coalesced.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    fn handle() -> (Rc<FakeHost>, FrameRequests) {
        let host = Rc::new(FakeHost::default());
        let requests = FrameRequests::new(host.clone());
        (host, requests)
    }

    #[test]
    fn requests_coalesce_while_pending() {
        let (host, requests) = handle();

        assert!(requests.request(), "first request schedules");
        for _ in 0..9 {
            assert!(!requests.request(), "later requests coalesce");
        }
        assert_eq!(host.scheduled(), 1);
        assert_eq!(
            requests.stats(),
            RequestStats {
                scheduled: 1,
                coalesced: 9
            }
        );
    }

    #[test]
    fn begin_frame_rearms() {
        let (host, requests) = handle();

        requests.request();
        requests.begin_frame();
        assert!(!requests.is_pending());
        assert!(requests.request(), "no permanent suppression");
        assert_eq!(host.scheduled(), 2);
    }

    #[test]
    fn refused_frame_does_not_stay_pending() {
        let (host, requests) = handle();

        host.set_accepting(false);
        assert!(!requests.request(), "host had nowhere to deliver the frame");
        assert!(!requests.is_pending());
        assert!(!requests.request(), "not coalesced into a frame that never comes");
        assert_eq!(requests.stats(), RequestStats::default());

        host.set_accepting(true);
        assert!(requests.request());
        assert_eq!(host.scheduled(), 1);
    }

    #[test]
    fn stop_cancels_pending_and_ignores_requests() {
        let (host, requests) = handle();
        let listener_copy = requests.clone();

        requests.request();
        requests.stop();
        assert_eq!(host.cancelled(), 1);
        assert!(!requests.is_pending());

        assert!(!listener_copy.request(), "clones observe the stop");
        assert_eq!(host.scheduled(), 1);

        requests.stop();
        assert_eq!(host.cancelled(), 1, "second stop is a no-op");
    }

    #[test]
    fn stop_without_pending_frame_cancels_nothing() {
        let (host, requests) = handle();
        requests.stop();
        assert_eq!(host.cancelled(), 0);
        assert!(requests.is_stopped());
    }
}
