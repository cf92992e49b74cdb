//! Request context: cancellation and deadlines.
//!
//! A [`Context`] travels with every operation. When it is canceled or its
//! deadline passes, the in-flight request is dropped and the operation
//! fails with a cancellation-classified transport error.

use crate::error::{ImageKitError, TransportKind};
use std::future::{Future, pending, poll_fn};
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};


/// Cancellation signal and optional deadline for one or more requests.
///
/// Contexts are cheap to clone; clones observe the same cancellation.
/// A context derived with [`Context::with_cancel`] is also canceled when
/// any context it was derived from is canceled.
///
/// # Examples
///
/// ```
/// use libimagekit::Context;
/// use std::time::Duration;
///
/// let ctx = Context::background().with_timeout(Duration::from_secs(5));
/// assert!(ctx.deadline().is_some());
/// assert!(ctx.err().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Vec<watch::Receiver<bool>>,
}

/// Cancels the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Cancels the associated context and every clone of it.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl Context {
    /// Returns a context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a copy of this context that expires after `timeout`.
    ///
    /// An existing earlier deadline is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a copy of this context that expires at `deadline`.
    ///
    /// An existing earlier deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Returns a cancelable copy of this context and its cancel handle.
    ///
    /// The handle cancels only the returned context and contexts derived
    /// from it; this context is unaffected.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::Context;
    ///
    /// let (ctx, handle) = Context::background().with_cancel();
    /// handle.cancel();
    /// assert!(ctx.err().unwrap().is_canceled());
    /// ```
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        self.cancel.push(receiver);
        (
            self,
            CancelHandle {
                sender: Arc::new(sender),
            },
        )
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the cancellation error if the context is already done.
    pub fn err(&self) -> Option<ImageKitError> {
        if self.cancel.iter().any(|rx| *rx.borrow()) {
            return Some(canceled());
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Some(deadline_exceeded());
        }
        None
    }

    /// Resolves once the context is canceled or its deadline passes.
    pub(crate) async fn done(&self) -> ImageKitError {
        tokio::select! {
            _ = self.canceled() => canceled(),
            _ = self.expired() => deadline_exceeded(),
        }
    }

    async fn canceled(&self) {
        let mut waits: Vec<_> = self
            .cancel
            .iter()
            .map(|rx| {
                let mut rx = rx.clone();
                Box::pin(async move { rx.wait_for(|canceled| *canceled).await.is_ok() })
            })
            .collect();

        // A wait that finishes with `false` lost its handle without canceling;
        // once every wait is gone this never resolves.
        poll_fn(|cx| {
            let mut signaled = false;
            waits.retain_mut(|wait| match wait.as_mut().poll(cx) {
                Poll::Ready(true) => {
                    signaled = true;
                    false
                }
                Poll::Ready(false) => false,
                Poll::Pending => true,
            });
            if signaled {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }

    async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => pending::<()>().await,
        }
    }
}

fn canceled() -> ImageKitError {
    ImageKitError::transport(TransportKind::Canceled, "context canceled")
}

fn deadline_exceeded() -> ImageKitError {
    ImageKitError::transport(TransportKind::DeadlineExceeded, "context deadline exceeded")
}
