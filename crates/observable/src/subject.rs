use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::mpsc;

use crate::{Observable, Subscription};

/// Behavior-style multicast source: pushes each value to every live
/// subscriber and replays the most recent one to late subscribers.
///
/// This is the boundary type between the outside world (connection layer,
/// test harnesses) and the combinator graph; everything downstream of it is
/// a pure composition.
pub struct Subject<T, E> {
    inner: Arc<Mutex<Inner<T, E>>>,
}

struct Inner<T, E> {
    latest: Option<T>,
    failure: Option<E>,
    senders: Vec<mpsc::UnboundedSender<Result<T, E>>>,
    closed: bool,
}

impl<T, E> Subject<T, E> {
    pub fn new() -> Self {
        Subject {
            inner: Arc::new(Mutex::new(Inner {
                latest: None,
                failure: None,
                senders: Vec::new(),
                closed: false,
            })),
        }
    }
}

impl<T, E> Default for Subject<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Subject<T, E> {
    fn clone(&self) -> Self {
        Subject {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone, E: Clone> Subject<T, E> {
    /// Push a value to every subscriber. Ignored once the subject is closed.
    pub fn next(&self, value: T) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.latest = Some(value.clone());
        inner
            .senders
            .retain(|tx| tx.unbounded_send(Ok(value.clone())).is_ok());
    }

    /// Terminate every subscription with `err`; late subscribers receive the
    /// same failure.
    pub fn fail(&self, err: E) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.failure = Some(err.clone());
        for tx in inner.senders.drain(..) {
            let _ = tx.unbounded_send(Err(err.clone()));
        }
    }

    /// Complete the subject: live subscriptions end, late subscribers get an
    /// already-completed stream.
    pub fn complete(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.senders.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Observable<T, E> for Subject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn subscribe(&self) -> Subscription<T, E> {
        let (tx, rx) = mpsc::unbounded();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(err) = &inner.failure {
            let _ = tx.unbounded_send(Err(err.clone()));
        } else if !inner.closed {
            if let Some(latest) = &inner.latest {
                let _ = tx.unbounded_send(Ok(latest.clone()));
            }
            inner.senders.push(tx);
        }
        Box::pin(rx)
    }
}
