//! Subsystem facade integration tests

#[cfg(test)]
mod tests {
    use crate::common::{RecordingFetcher, SummaryAssertions, TicketFactory};
    use backoffice_rs::{
        BackofficeError, BatchCacheSubsystem, BatchConfig, BatchOptions, Config, FetcherRegistry,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::advance;

    fn config_with_ttl(ttl_ms: u64) -> Config {
        let mut config = Config::default();
        config.cache.default_ttl_ms = ttl_ms;
        config
    }

    /// Misses coalesce, hits skip the fetcher, expiry triggers a fresh fetch
    #[tokio::test(start_paused = true)]
    async fn test_read_through_lifecycle() {
        let fetcher = Arc::new(RecordingFetcher::new());
        let subsystem =
            BatchCacheSubsystem::<String>::new(&config_with_ttl(1_000), fetcher.clone()).unwrap();
        assert!(!subsystem.bootstrap());

        let (a, b, c) = tokio::join!(
            subsystem.get_or_fetch("open_tickets"),
            subsystem.get_or_fetch("open_tickets"),
            subsystem.get_or_fetch("open_tickets"),
        );
        assert_eq!(a.unwrap(), "open_tickets#1");
        assert_eq!(b.unwrap(), "open_tickets#1");
        assert_eq!(c.unwrap(), "open_tickets#1");

        advance(Duration::from_millis(500)).await;
        let value = subsystem.get_or_fetch("open_tickets").await.unwrap();
        assert_eq!(value, "open_tickets#1");
        assert_eq!(fetcher.calls("open_tickets"), 1);

        advance(Duration::from_millis(600)).await;
        let value = subsystem.get_or_fetch("open_tickets").await.unwrap();
        assert_eq!(value, "open_tickets#2");
        assert_eq!(fetcher.calls("open_tickets"), 2);
    }

    /// A failed fetch is reported and not cached
    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_not_cached() {
        let fetcher = Arc::new(RecordingFetcher::new().failing(&["reports"]));
        let subsystem =
            BatchCacheSubsystem::<String>::new(&Config::default(), fetcher.clone()).unwrap();

        assert!(subsystem.get_or_fetch("reports").await.is_err());
        assert!(subsystem.get_or_fetch("reports").await.is_err());
        assert_eq!(fetcher.calls("reports"), 2);
        assert!(subsystem.cache().is_empty());
    }

    /// Batch outcomes fold into one cache entry across runs
    #[tokio::test]
    async fn test_run_and_store_accumulates() {
        let registry: FetcherRegistry<u64> = FetcherRegistry::new();
        let subsystem = BatchCacheSubsystem::new(&Config::default(), Arc::new(registry)).unwrap();
        let options = || BatchOptions::new(BatchConfig::new().with_retry_attempts(0));
        let merge = |closed: u64, summary: &backoffice_rs::BatchSummary<u64, String>| {
            closed + summary.completed as u64
        };

        let first = subsystem
            .run_and_store(
                "closed_count",
                TicketFactory::ids(6),
                |id, _| TicketFactory::close(id, 3),
                options(),
                merge,
            )
            .await
            .unwrap();
        first.assert_all_settled();

        subsystem
            .run_and_store(
                "closed_count",
                TicketFactory::ids(4),
                |id, _| TicketFactory::close(id, 0),
                options(),
                merge,
            )
            .await
            .unwrap();

        assert_eq!(subsystem.cache().get("closed_count"), Some(8));
    }

    /// Batches can fetch through the coalescer while they run
    #[tokio::test(start_paused = true)]
    async fn test_batch_items_share_coalesced_fetch() {
        let lookups = Arc::new(AtomicU32::new(0));
        let mut registry = FetcherRegistry::new();
        registry.register_fn("agents", {
            let lookups = lookups.clone();
            move |_| {
                lookups.fetch_add(1, Ordering::SeqCst);
                async { Ok(vec!["ada".to_string(), "grace".to_string()]) }
            }
        });
        let subsystem =
            Arc::new(BatchCacheSubsystem::new(&Config::default(), Arc::new(registry)).unwrap());

        let summary = subsystem
            .executor()
            .run(
                TicketFactory::ids(5),
                |id, _| {
                    let subsystem = subsystem.clone();
                    async move {
                        let agents = subsystem.get_or_fetch("agents").await?;
                        let agent = &agents[id as usize % agents.len()];
                        Ok::<_, BackofficeError>(format!("{} -> {}", id, agent))
                    }
                },
                subsystem.executor().options(),
            )
            .await
            .unwrap();

        summary.assert_all_settled();
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(summary.results[0].value, "1 -> grace");
    }
}
