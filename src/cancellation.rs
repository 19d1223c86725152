//! Cooperative cancellation for pipeline invocations.
//!
//! The pipeline polls the token at row and project-group boundaries and
//! aborts with [`EngineError::Cancelled`] once it fires. No partial result is
//! ever returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{EngineError, EngineResult};

/// Token for cooperative cancellation of a calculation.
///
/// Uses an AtomicBool internally. Clone is cheap and shares state.
///
/// # Example
///
/// ```
/// use overlap_engine::cancellation::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled).
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `Err(Cancelled)` if cancellation has been requested.
    pub fn checkpoint(&self) -> EngineResult<()> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Returns a guard that cancels this token when dropped unless disarmed.
    ///
    /// Used at request boundaries: if the request future is dropped before
    /// the calculation completes, the work in flight sees the cancellation.
    pub fn drop_guard(&self) -> CancelOnDrop {
        CancelOnDrop {
            token: Some(self.clone()),
        }
    }
}

/// Cancels its token on drop. See [`CancellationToken::drop_guard`].
#[derive(Debug)]
pub struct CancelOnDrop {
    token: Option<CancellationToken>,
}

impl CancelOnDrop {
    /// Consumes the guard without cancelling.
    pub fn disarm(mut self) {
        self.token = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}
