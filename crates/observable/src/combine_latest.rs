use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;

use crate::{Observable, SharedObservable, Subscription};

/// The shared poll discipline for every arity:
///
/// * nothing is emitted until every input has emitted at least once;
/// * once primed, each upstream emission produces exactly one output tuple
///   carrying the latest value of every input, in the order the emissions
///   are observed — no reordering, coalescing or debouncing;
/// * an input that completes without ever emitting makes the combination
///   unsatisfiable, so the output completes;
/// * an input failure is forwarded once and terminates the output;
/// * the output completes when every input has completed.
macro_rules! combine_latest_impl {
    (
        $node:ident, $stream:ident, $func:ident,
        $( ($T:ident, $src:ident, $sub:ident, $latest:ident, $done:ident) ),+
    ) => {
        pub fn $func<$($T,)+ E>(
            $( $src: SharedObservable<$T, E>, )+
        ) -> SharedObservable<($($T,)+), E>
        where
            $( $T: Clone + Send + 'static, )+
            E: Send + 'static,
        {
            Arc::new($node { $( $src, )+ })
        }

        struct $node<$($T,)+ E> {
            $( $src: SharedObservable<$T, E>, )+
        }

        impl<$($T,)+ E> Observable<($($T,)+), E> for $node<$($T,)+ E>
        where
            $( $T: Clone + Send + 'static, )+
            E: Send + 'static,
        {
            fn subscribe(&self) -> Subscription<($($T,)+), E> {
                Box::pin($stream {
                    $(
                        $sub: self.$src.subscribe(),
                        $latest: None,
                        $done: false,
                    )+
                    terminated: false,
                })
            }
        }

        struct $stream<$($T,)+ E> {
            $(
                $sub: Subscription<$T, E>,
                $latest: Option<$T>,
                $done: bool,
            )+
            terminated: bool,
        }

        impl<$($T,)+ E> Unpin for $stream<$($T,)+ E> {}

        impl<$($T,)+ E> $stream<$($T,)+ E>
        where
            $( $T: Clone, )+
        {
            fn ready(&self) -> Option<($($T,)+)> {
                if let ( $( Some($src), )+ ) = ( $( self.$latest.clone(), )+ ) {
                    Some(( $( $src, )+ ))
                } else {
                    None
                }
            }
        }

        impl<$($T,)+ E> Stream for $stream<$($T,)+ E>
        where
            $( $T: Clone + Send + 'static, )+
            E: Send + 'static,
        {
            type Item = Result<($($T,)+), E>;

            fn poll_next(
                self: Pin<&mut Self>,
                cx: &mut Context<'_>,
            ) -> Poll<Option<Self::Item>> {
                let this = self.get_mut();
                if this.terminated {
                    return Poll::Ready(None);
                }
                loop {
                    let mut progressed = false;
                    $(
                        if !this.$done {
                            match this.$sub.as_mut().poll_next(cx) {
                                Poll::Ready(Some(Ok(value))) => {
                                    this.$latest = Some(value);
                                    if let Some(out) = this.ready() {
                                        return Poll::Ready(Some(Ok(out)));
                                    }
                                    progressed = true;
                                }
                                Poll::Ready(Some(Err(err))) => {
                                    this.terminated = true;
                                    return Poll::Ready(Some(Err(err)));
                                }
                                Poll::Ready(None) => {
                                    this.$done = true;
                                    if this.$latest.is_none() {
                                        this.terminated = true;
                                        return Poll::Ready(None);
                                    }
                                    progressed = true;
                                }
                                Poll::Pending => {}
                            }
                        }
                    )+
                    if true $( && this.$done )+ {
                        this.terminated = true;
                        return Poll::Ready(None);
                    }
                    if !progressed {
                        return Poll::Pending;
                    }
                }
            }
        }
    };
}

combine_latest_impl!(
    CombineLatest2, CombineLatestStream2, combine_latest2,
    (A, a, sub_a, latest_a, done_a),
    (B, b, sub_b, latest_b, done_b)
);

combine_latest_impl!(
    CombineLatest3, CombineLatestStream3, combine_latest3,
    (A, a, sub_a, latest_a, done_a),
    (B, b, sub_b, latest_b, done_b),
    (C, c, sub_c, latest_c, done_c)
);

combine_latest_impl!(
    CombineLatest4, CombineLatestStream4, combine_latest4,
    (A, a, sub_a, latest_a, done_a),
    (B, b, sub_b, latest_b, done_b),
    (C, c, sub_c, latest_c, done_c),
    (D, d, sub_d, latest_d, done_d)
);
