//! Wall-clock behavior of `combine_latest`: independent upstream calls
//! make progress concurrently within one subscription.

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use futures::StreamExt;
    use observable::{combine_latest2, defer, SharedObservable};
    use tokio::time::timeout;

    fn delayed(value: u32, delay: Duration) -> SharedObservable<u32, &'static str> {
        defer(move || async move {
            tokio::time::sleep(delay).await;
            Ok(value)
        })
    }

    /// Test: Should await both inputs in parallel, not sequentially
    #[tokio::test]
    async fn test_inputs_resolve_concurrently() {
        let combined = combine_latest2(
            delayed(1, Duration::from_millis(80)),
            delayed(2, Duration::from_millis(80)),
        );
        let mut sub = combined.subscribe();

        let started = Instant::now();
        let first = timeout(Duration::from_millis(500), sub.next())
            .await
            .expect("combination should emit");
        assert_eq!(first, Some(Ok((1, 2))));

        // Two 80ms calls back-to-back would take 160ms; in parallel they
        // finish in roughly one delay.
        assert!(started.elapsed() < Duration::from_millis(150));
    }

    /// Test: Should complete once both one-shot inputs complete
    #[tokio::test]
    async fn test_one_shot_combination_completes() {
        let combined = combine_latest2(
            delayed(1, Duration::from_millis(5)),
            delayed(2, Duration::from_millis(5)),
        );
        let mut sub = combined.subscribe();

        assert_eq!(sub.next().await, Some(Ok((1, 2))));
        assert_eq!(sub.next().await, None);
    }
}
