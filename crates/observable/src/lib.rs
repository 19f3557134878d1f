//! A small cold-observable layer for dependency-ordered stream graphs.
//!
//! Graph nodes are `Arc`-shared [`Observable`] values; subscribing one builds
//! a fresh emission stream on the spot, and dropping the returned
//! [`Subscription`] releases every nested upstream subscription with it.
//! Emissions carry `Result<T, E>`: an `Err` terminates the stream that
//! delivered it, and every combinator forwards upstream failures unchanged.
//!
//! The operators preserve arrival order. There is no internal buffering,
//! debouncing or coalescing beyond what the combinator semantics require
//! (`combine_latest` keeps only the latest value per input before it is
//! primed; `switch_map` keeps only the newest inner stream).

pub mod combine_latest;
pub mod ops;
pub mod source;
pub mod subject;
pub mod switch_map;

use std::sync::Arc;

use futures::stream::BoxStream;

/// A live emission sequence handed to one subscriber.
pub type Subscription<T, E> = BoxStream<'static, Result<T, E>>;

/// A cold, re-subscribable source of values.
pub trait Observable<T, E>: Send + Sync {
    fn subscribe(&self) -> Subscription<T, E>;
}

/// Shared handle to a graph node.
pub type SharedObservable<T, E> = Arc<dyn Observable<T, E>>;

pub use combine_latest::{combine_latest2, combine_latest3, combine_latest4};
pub use ops::{filter_absent, map, try_map};
pub use source::defer;
pub use subject::Subject;
pub use switch_map::switch_map;
