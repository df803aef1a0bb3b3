// Typo-Suggest Cancellation Context
// Deadlines and cancellation signals threaded through every scan

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Why a context is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelReason {
    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline signal for one call
///
/// Cloning is cheap and clones observe the same cancellation. Polling with
/// [`Context::err`] never blocks, which is what the scan loops rely on.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Option<Arc<AtomicBool>>,
    parent: Option<Arc<Context>>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never done
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that is done once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that is done at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::default()
        }
    }

    /// A context that is done when the returned handle is cancelled
    pub fn with_cancel() -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Self {
            cancelled: Some(flag.clone()),
            ..Self::default()
        };
        (ctx, CancelHandle { flag })
    }

    /// Derive a context that also expires after `timeout`
    ///
    /// The child is done as soon as either itself or its parent is done.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        Self {
            cancelled: None,
            parent: Some(Arc::new(self.clone())),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// The earliest deadline in this context chain, if any
    pub fn deadline(&self) -> Option<Instant> {
        let parent = self.parent.as_ref().and_then(|p| p.deadline());
        match (self.deadline, parent) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Non-blocking poll: `Some(reason)` once the context is done
    pub fn err(&self) -> Option<CancelReason> {
        if let Some(flag) = &self.cancelled {
            if flag.load(Ordering::Acquire) {
                return Some(CancelReason::Cancelled);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Some(CancelReason::DeadlineExceeded);
            }
        }
        self.parent.as_ref().and_then(|p| p.err())
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }
}

/// Cancels the context it was created with
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
