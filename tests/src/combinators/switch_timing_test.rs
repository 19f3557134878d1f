//! Wall-clock behavior of `switch_map`: a stale inner stream is abandoned
//! the moment a newer trigger arrives, no matter how its in-flight work
//! finishes.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::StreamExt;
    use observable::{defer, switch_map, SharedObservable, Subject};
    use tokio::time::timeout;

    /// Test: Should never deliver emissions from an abandoned slow inner
    #[tokio::test]
    async fn test_no_stale_inner_emissions() {
        let trigger: Subject<u32, &'static str> = Subject::new();
        let switched = switch_map(
            Arc::new(trigger.clone()) as SharedObservable<u32, &'static str>,
            |key| {
                // inner(1) is slow, inner(2) is fast.
                let delay = if key == 1 {
                    Duration::from_millis(200)
                } else {
                    Duration::from_millis(5)
                };
                defer(move || async move {
                    tokio::time::sleep(delay).await;
                    Ok(key)
                })
            },
        );
        let mut sub = switched.subscribe();

        // Let inner(1) start its slow call.
        trigger.next(1);
        assert!(timeout(Duration::from_millis(50), sub.next()).await.is_err());

        // A newer trigger abandons it; only inner(2)'s emission may arrive.
        trigger.next(2);
        let first = timeout(Duration::from_millis(100), sub.next())
            .await
            .expect("fast inner should emit");
        assert_eq!(first, Some(Ok(2)));

        // Well past inner(1)'s completion time: nothing else surfaces.
        assert!(timeout(Duration::from_millis(300), sub.next()).await.is_err());
    }

    /// Test: Should re-run the projected call for every trigger emission
    #[tokio::test]
    async fn test_each_trigger_runs_a_fresh_inner() {
        let trigger: Subject<u32, &'static str> = Subject::new();
        let switched = switch_map(
            Arc::new(trigger.clone()) as SharedObservable<u32, &'static str>,
            |key| defer(move || async move { Ok(key * 10) }),
        );
        let mut sub = switched.subscribe();

        trigger.next(1);
        assert_eq!(sub.next().await, Some(Ok(10)));

        trigger.next(2);
        assert_eq!(sub.next().await, Some(Ok(20)));
    }
}
