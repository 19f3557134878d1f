use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;

use crate::{Observable, SharedObservable, Subscription};

/// For each emission of `source`, projects a new inner observable and
/// switches to it. The previous inner subscription is dropped at the moment
/// the new trigger is observed — before the new inner stream is ever polled
/// — so an emission from an abandoned inner stream can never be delivered.
///
/// A failure on either the trigger or the current inner stream terminates
/// the output with that failure. The output completes once the trigger has
/// completed and the final inner stream has completed.
pub fn switch_map<A, B, E, F>(source: SharedObservable<A, E>, project: F) -> SharedObservable<B, E>
where
    A: Send + 'static,
    B: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> SharedObservable<B, E> + Send + Sync + 'static,
{
    Arc::new(SwitchMap {
        source,
        project: Arc::new(project),
    })
}

struct SwitchMap<A, B, E> {
    source: SharedObservable<A, E>,
    project: Arc<dyn Fn(A) -> SharedObservable<B, E> + Send + Sync>,
}

impl<A, B, E> Observable<B, E> for SwitchMap<A, B, E>
where
    A: Send + 'static,
    B: Send + 'static,
    E: Send + 'static,
{
    fn subscribe(&self) -> Subscription<B, E> {
        Box::pin(SwitchStream {
            outer: self.source.subscribe(),
            project: self.project.clone(),
            inner: None,
            outer_done: false,
            terminated: false,
        })
    }
}

struct SwitchStream<A, B, E> {
    outer: Subscription<A, E>,
    project: Arc<dyn Fn(A) -> SharedObservable<B, E> + Send + Sync>,
    inner: Option<Subscription<B, E>>,
    outer_done: bool,
    terminated: bool,
}

impl<A, B, E> Unpin for SwitchStream<A, B, E> {}

impl<A, B, E> Stream for SwitchStream<A, B, E>
where
    A: Send + 'static,
    B: Send + 'static,
    E: Send + 'static,
{
    type Item = Result<B, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.terminated {
            return Poll::Ready(None);
        }

        // Drain the trigger first, down to its most recent emission. Each
        // trigger replaces the inner subscription; the replaced subscription
        // is dropped here, synchronously, before any inner poll below.
        if !this.outer_done {
            loop {
                match this.outer.as_mut().poll_next(cx) {
                    Poll::Ready(Some(Ok(trigger))) => {
                        this.inner = Some((this.project)(trigger).subscribe());
                    }
                    Poll::Ready(Some(Err(err))) => {
                        this.terminated = true;
                        return Poll::Ready(Some(Err(err)));
                    }
                    Poll::Ready(None) => {
                        this.outer_done = true;
                        break;
                    }
                    Poll::Pending => break,
                }
            }
        }

        match this.inner.as_mut() {
            Some(inner) => match inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(Ok(value))),
                Poll::Ready(Some(Err(err))) => {
                    this.terminated = true;
                    Poll::Ready(Some(Err(err)))
                }
                Poll::Ready(None) => {
                    this.inner = None;
                    if this.outer_done {
                        this.terminated = true;
                        Poll::Ready(None)
                    } else {
                        Poll::Pending
                    }
                }
                Poll::Pending => Poll::Pending,
            },
            None => {
                if this.outer_done {
                    this.terminated = true;
                    Poll::Ready(None)
                } else {
                    Poll::Pending
                }
            }
        }
    }
}
