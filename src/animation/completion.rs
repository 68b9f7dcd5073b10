//! Completion futures for multi-frame operations.
//!
//! Each animator operation returns a [`Completion`]. The matching
//! [`Settler`] travels with the scheduled work; finishing the work settles the
//! completion with [`Outcome::Finished`], dropping it (because newer work
//! cancelled it) settles it with [`Outcome::Superseded`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;

/// How a scheduled operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The operation ran to the end.
    Finished,
    /// A later call cancelled the operation before it ended.
    Superseded,
}

/// Sending half, owned by the scheduled work.
#[derive(Debug)]
pub struct Settler(oneshot::Sender<()>);

impl Settler {
    pub fn finish(self) {
        // The caller may have dropped its completion; nothing to report then.
        let _ = self.0.send(());
    }
}

/// Future resolved when an operation settles.
#[derive(Debug)]
#[must_use = "a Completion reports when the operation settles"]
pub struct Completion {
    rx: oneshot::Receiver<()>,
    settled: Option<Outcome>,
}

/// Creates a connected settler / completion pair.
pub fn pair() -> (Settler, Completion) {
    let (tx, rx) = oneshot::channel();
    (
        Settler(tx),
        Completion {
            rx,
            settled: None,
        },
    )
}

impl Completion {
    /// A completion that has already finished (no-op operations).
    pub fn ready() -> Self {
        let (settler, completion) = pair();
        settler.finish();
        completion
    }

    /// Non-blocking check; `None` while the operation is still running.
    pub fn outcome(&mut self) -> Option<Outcome> {
        if self.settled.is_none() {
            self.settled = match self.rx.try_recv() {
                Ok(Some(())) => Some(Outcome::Finished),
                Ok(None) => None,
                Err(oneshot::Canceled) => Some(Outcome::Superseded),
            };
        }
        self.settled
    }

    pub fn is_settled(&mut self) -> bool {
        self.outcome().is_some()
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.settled {
            return Poll::Ready(outcome);
        }
        let outcome = match this.rx.poll_unpin(cx) {
            Poll::Ready(Ok(())) => Outcome::Finished,
            Poll::Ready(Err(oneshot::Canceled)) => Outcome::Superseded,
            Poll::Pending => return Poll::Pending,
        };
        this.settled = Some(outcome);
        Poll::Ready(outcome)
    }
}
