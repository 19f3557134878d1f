use std::sync::Arc;

use futures::{future, StreamExt};

use crate::{Observable, SharedObservable, Subscription};

/// Pure projection of every emission.
pub fn map<A, B, E, F>(source: SharedObservable<A, E>, f: F) -> SharedObservable<B, E>
where
    A: Send + 'static,
    B: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
{
    try_map(source, move |value| Ok(f(value)))
}

/// Projection that may fail. A failed projection is delivered as the
/// stream's terminating error, exactly like an upstream failure.
pub fn try_map<A, B, E, F>(source: SharedObservable<A, E>, f: F) -> SharedObservable<B, E>
where
    A: Send + 'static,
    B: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
{
    Arc::new(TryMap {
        source,
        f: Arc::new(f),
    })
}

struct TryMap<A, B, E> {
    source: SharedObservable<A, E>,
    #[allow(clippy::type_complexity)]
    f: Arc<dyn Fn(A) -> Result<B, E> + Send + Sync>,
}

impl<A, B, E> Observable<B, E> for TryMap<A, B, E>
where
    A: Send + 'static,
    B: Send + 'static,
    E: Send + 'static,
{
    fn subscribe(&self) -> Subscription<B, E> {
        let f = self.f.clone();
        let stream = self
            .source
            .subscribe()
            .map(move |result| result.and_then(|value| f(value)))
            .scan(false, |errored, item| {
                if *errored {
                    return future::ready(None);
                }
                *errored = item.is_err();
                future::ready(Some(item))
            });
        Box::pin(stream)
    }
}

/// Pass through only present values; an absent (`None`) emission is dropped,
/// leaving the downstream stream simply not emitting. Errors pass through.
pub fn filter_absent<T, E>(source: SharedObservable<Option<T>, E>) -> SharedObservable<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    Arc::new(FilterAbsent { source })
}

struct FilterAbsent<T, E> {
    source: SharedObservable<Option<T>, E>,
}

impl<T, E> Observable<T, E> for FilterAbsent<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn subscribe(&self) -> Subscription<T, E> {
        let stream = self.source.subscribe().filter_map(|result| {
            future::ready(match result {
                Ok(Some(value)) => Some(Ok(value)),
                Ok(None) => None,
                Err(err) => Some(Err(err)),
            })
        });
        Box::pin(stream)
    }
}
