//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use backoffice_rs::config::Validate;
    use backoffice_rs::{BackofficeError, BatchConfig, CacheConfig, CoalescerConfig, Config};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ==================== File loading ====================

    /// A full file maps onto every runtime config
    #[tokio::test]
    async fn test_from_file_full() {
        let file = write_yaml(
            r#"
cache:
  default_ttl_ms: 60000
  max_entries: 500
coalescer:
  debounce_ms: 20
  max_delay_ms: 200
  fetch_timeout_ms: 3000
batch:
  concurrency: 10
  retry_attempts: 3
  retry_delay_ms: 250
logging:
  level: "backoffice_rs=debug"
  json: true
"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();

        let cache: CacheConfig = (&config.cache).into();
        assert_eq!(cache.default_ttl, Duration::from_secs(60));
        assert_eq!(cache.max_entries, 500);

        let coalescer: CoalescerConfig = (&config.coalescer).into();
        assert_eq!(coalescer.debounce_window, Duration::from_millis(20));
        assert_eq!(coalescer.max_delay, Some(Duration::from_millis(200)));
        assert_eq!(coalescer.fetch_timeout, Some(Duration::from_secs(3)));

        let batch: BatchConfig = (&config.batch).into();
        assert_eq!(
            batch,
            BatchConfig::new()
                .with_concurrency(10)
                .with_retry_attempts(3)
                .with_retry_delay(Duration::from_millis(250))
        );

        assert!(config.logging.json);
    }

    /// An empty file yields the defaults
    #[tokio::test]
    async fn test_from_file_empty_uses_defaults() {
        let file = write_yaml("{}\n");
        let config = Config::from_file(file.path()).await.unwrap();

        let batch: BatchConfig = (&config.batch).into();
        assert_eq!(batch, BatchConfig::default());
        assert_eq!(config.coalescer.debounce_ms, 50);
    }

    /// Missing files are configuration errors
    #[tokio::test]
    async fn test_from_file_missing() {
        let err = Config::from_file("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, BackofficeError::Config(_)));
    }

    // ==================== Validation ====================

    /// max_delay shorter than the debounce window is rejected
    #[test]
    fn test_max_delay_below_debounce_rejected() {
        let err = Config::from_yaml_str("coalescer:\n  debounce_ms: 100\n  max_delay_ms: 10\n")
            .unwrap_err();
        assert!(matches!(err, BackofficeError::Config(msg) if msg.contains("Coalescer")));
    }

    /// Section validators are usable on their own
    #[test]
    fn test_section_validation() {
        let mut config = Config::default();
        assert!(config.cache.validate().is_ok());

        config.cache.max_entries = 0;
        assert!(config.cache.validate().is_err());
        assert!(config.validate().is_err());
    }
}
