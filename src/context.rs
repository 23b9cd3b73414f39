//! Per-call cancellation and deadlines.
//!
//! A [`Context`] is attached to a [`LookerClient`](crate::LookerClient) with
//! [`with_context`](crate::LookerClient::with_context). Every network action the
//! client performs (credential exchange, page fetches, CRUD calls) races
//! against it and fails with [`LookerError::Cancelled`] once it fires.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{LookerError, Result};

/// Cancellation signal and optional deadline for client calls.
///
/// The default context never cancels.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that never cancels.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that cancels when `token` is cancelled.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: None,
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Add a cancellation token to this context.
    #[must_use]
    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set an absolute deadline, keeping the earlier one if already set.
    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Whether the context has already fired.
    pub fn is_done(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Drive `fut` to completion unless the context fires first.
    ///
    /// When the context wins, `fut` is dropped, which aborts any in-flight
    /// HTTP request it owns.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output> {
        if self.is_done() {
            return Err(LookerError::Cancelled);
        }

        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(LookerError::Cancelled),
            _ = expired => Err(LookerError::Cancelled),
            out = fut => Ok(out),
        }
    }
}
