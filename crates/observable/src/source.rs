use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;

use crate::{Observable, SharedObservable, Subscription};

/// One-shot observable: each subscription runs `factory` afresh, emits its
/// result and completes. This is how a single asynchronous call is lifted
/// into the graph — the work happens per subscription, not at construction.
pub fn defer<T, E, F, Fut>(factory: F) -> SharedObservable<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    Arc::new(Defer { factory })
}

struct Defer<F> {
    factory: F,
}

impl<T, E, F, Fut> Observable<T, E> for Defer<F>
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    fn subscribe(&self) -> Subscription<T, E> {
        Box::pin((self.factory)().into_stream())
    }
}
