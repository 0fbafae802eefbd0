//! Batch executor integration tests

#[cfg(test)]
mod tests {
    use crate::assert_duration_within;
    use crate::common::{SummaryAssertions, TicketFactory, init_test_logging};
    use backoffice_rs::{
        BackofficeError, BatchConfig, BatchExecutor, BatchOptions, BatchProgress,
        OperationDispatcher,
    };
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn no_retry(concurrency: usize) -> BatchOptions<u64> {
        BatchOptions::new(
            BatchConfig::new()
                .with_concurrency(concurrency)
                .with_retry_attempts(0),
        )
    }

    // ==================== Execution ====================

    /// Every third ticket is locked; the rest close
    #[tokio::test]
    async fn test_bulk_close_with_locked_tickets() {
        init_test_logging();
        let executor = BatchExecutor::default();

        let summary = executor
            .run(
                TicketFactory::ids(12),
                |id, _| TicketFactory::close(id, 3),
                no_retry(4),
            )
            .await
            .unwrap();

        summary.assert_all_settled();
        summary.assert_ordered();
        assert_eq!(summary.completed, 8);
        assert_eq!(summary.failed, 4);

        let locked: Vec<u64> = summary.errors.iter().map(|e| e.item).collect();
        assert_eq!(locked, vec![3, 6, 9, 12]);
        assert!((summary.success_rate() - 8.0 / 12.0).abs() < 1e-9);
    }

    /// Groups run one after another, so wall time is one item per group
    #[tokio::test(start_paused = true)]
    async fn test_duration_scales_with_group_count() {
        let executor = BatchExecutor::default();
        let start = Instant::now();

        let summary = executor
            .run(
                TicketFactory::ids(10),
                |id, _| async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(id)
                },
                no_retry(4),
            )
            .await
            .unwrap();

        summary.assert_all_settled();
        // Three groups: 4, 4, 2
        assert_duration_within!(start.elapsed(), 300, 310);
    }

    // ==================== Retries ====================

    /// Retries back off linearly: 50ms, 100ms, 150ms
    #[tokio::test(start_paused = true)]
    async fn test_linear_backoff_between_attempts() {
        let executor = BatchExecutor::default();
        let attempts: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();

        let summary = executor
            .run(
                vec![1u64],
                |_, _| {
                    let attempts = attempts.clone();
                    async move {
                        attempts.lock().push(Instant::now());
                        Err::<u64, _>(BackofficeError::timeout("crm"))
                    }
                },
                BatchOptions::new(
                    BatchConfig::new()
                        .with_retry_attempts(3)
                        .with_retry_delay(Duration::from_millis(50)),
                ),
            )
            .await
            .unwrap();

        assert_eq!(summary.errors[0].attempts, 4);
        let offsets: Vec<u128> = attempts
            .lock()
            .iter()
            .map(|t| t.duration_since(start).as_millis())
            .collect();
        assert_eq!(offsets.len(), 4);
        assert!(offsets[1] >= 50 && offsets[2] >= 150 && offsets[3] >= 300);
    }

    // ==================== Observers ====================

    /// on_error sees each permanent failure once, with its item
    #[tokio::test]
    async fn test_on_error_reports_items() {
        let executor = BatchExecutor::default();
        let failed_items = Arc::new(Mutex::new(Vec::new()));
        let options = no_retry(5).on_error({
            let failed_items = failed_items.clone();
            move |failure| failed_items.lock().push(failure.item)
        });

        executor
            .run(TicketFactory::ids(10), |id, _| TicketFactory::close(id, 5), options)
            .await
            .unwrap();

        let mut items = failed_items.lock().clone();
        items.sort_unstable();
        assert_eq!(items, vec![5, 10]);
    }

    /// Status queried from a progress observer matches the snapshot it received
    #[tokio::test]
    async fn test_status_visible_from_progress_observer() {
        let executor = BatchExecutor::default();
        let observed: Arc<Mutex<Vec<(BatchProgress, Option<BatchProgress>)>>> =
            Arc::new(Mutex::new(Vec::new()));
        let options = no_retry(2).on_progress({
            let executor = executor.clone();
            let observed = observed.clone();
            move |progress| {
                let live = executor.get_status(&progress.id);
                observed.lock().push((progress.clone(), live));
            }
        });

        executor
            .run(TicketFactory::ids(4), |id, _| TicketFactory::close(id, 0), options)
            .await
            .unwrap();

        let observed = observed.lock();
        assert_eq!(observed.len(), 4);
        for (progress, live) in observed.iter() {
            let live = live.as_ref().unwrap();
            assert_eq!(live.completed, progress.completed);
            assert_eq!(live.total, 4);
        }
    }

    // ==================== Cancellation ====================

    /// Concurrent runs are tracked independently
    #[tokio::test(start_paused = true)]
    async fn test_cancel_one_of_two_runs() {
        let executor = BatchExecutor::default();
        let slow = |id: u64, _: usize| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(id)
        };

        let first = {
            let executor = executor.clone();
            tokio::spawn(
                async move { executor.run(TicketFactory::ids(6), slow, no_retry(2)).await },
            )
        };
        tokio::task::yield_now().await;
        let first_id = executor.active_operations()[0].clone();

        let second = {
            let executor = executor.clone();
            tokio::spawn(
                async move { executor.run(TicketFactory::ids(6), slow, no_retry(2)).await },
            )
        };
        tokio::task::yield_now().await;
        assert_eq!(executor.active_operations().len(), 2);

        assert!(executor.cancel(&first_id));

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert!(first.cancelled);
        assert_eq!(first.completed, 2);
        second.assert_all_settled();
        assert!(executor.active_operations().is_empty());
    }

    // ==================== Dispatch ====================

    /// Handlers registered by tag run through the shared executor
    #[tokio::test]
    async fn test_dispatcher_with_shared_executor() {
        let executor = BatchExecutor::new(BatchConfig::new().with_retry_attempts(0));
        let archived = Arc::new(AtomicU32::new(0));

        let mut dispatcher: OperationDispatcher<u64, String> =
            OperationDispatcher::new(executor.clone());
        dispatcher
            .register_fn("close", |id, _| TicketFactory::close(id, 0))
            .register_fn("archive", {
                let archived = archived.clone();
                move |id, _| {
                    archived.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(format!("archived-{}", id)) }
                }
            });

        let summary = dispatcher
            .run_tagged("archive", TicketFactory::ids(3), executor.options())
            .await
            .unwrap();

        summary.assert_all_settled();
        assert_eq!(archived.load(Ordering::SeqCst), 3);
        assert_eq!(summary.values(), vec!["archived-1", "archived-2", "archived-3"]);

        let err = dispatcher
            .run_tagged("purge", TicketFactory::ids(3), executor.options())
            .await
            .unwrap_err();
        assert!(matches!(err, BackofficeError::NotFound(_)));
    }
}
