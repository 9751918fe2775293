//! Background execution of enrichment lookups.
//!
//! A [`Deferred`] is handed back immediately while the lookup runs on its own
//! tokio task. It resolves exactly once: with the lookup's value, with the
//! lookup's error, or with `TaskFailed` if the task panicked or there was no
//! runtime to start it on. Nothing is retried, cached or shared between
//! callers, and a started lookup can't be cancelled; dropping the `Deferred`
//! only detaches it.

use crate::error::*;
use futures::ready;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Deferred<T> {
    task: Task<T>,
}

#[derive(Debug)]
enum Task<T> {
    Running(JoinHandle<Result<T>>),
    // Taken on first poll
    Rejected(Option<Error>),
}

impl<T> Deferred<T>
where
    T: Send + 'static,
{
    /// Starts `lookup` on the current tokio runtime. Outside a runtime the
    /// lookup is dropped unstarted and the `Deferred` rejects with `TaskFailed`.
    pub fn spawn<F>(lookup: F) -> Deferred<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let task = match Handle::try_current() {
            Ok(runtime) => Task::Running(runtime.spawn(lookup)),
            Err(e) => Task::Rejected(Some(ErrorKind::TaskFailed(format!("no runtime: {}", e)).into())),
        };

        Deferred { task }
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<T>> {
        match self.task {
            Task::Running(ref mut handle) => match ready!(Pin::new(handle).poll(cx)) {
                Ok(result) => Poll::Ready(result),
                Err(e) => Poll::Ready(Err(ErrorKind::TaskFailed(e.to_string()).into())),
            },
            Task::Rejected(ref mut error) => Poll::Ready(Err(error
                .take()
                .unwrap_or_else(|| ErrorKind::TaskFailed("polled after completion".into()).into()))),
        }
    }
}
