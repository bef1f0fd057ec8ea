//! Run command: fetch, filter and transform, write, then optionally publish.

use crate::config::Config;
use crate::feed::{parse_feed, FeedClient, FeedSource, IncludedProduct, PublishStatus, RunSummary};
use crate::format::{render_feed, Formatter};
use crate::publish::{GitPublisher, Publisher};
use crate::transform::Transformer;
use crate::writer::write_atomic;
use anyhow::{Context, Result};
use tracing::info;

/// Executes the full feed pipeline.
pub struct RunCommand {
    config: Config,
}

impl RunCommand {
    /// Creates a new run command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the pipeline against the configured source URL and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let client = FeedClient::new(&self.config).context("Failed to create HTTP client")?;
        let publisher = self.config.publish.then(|| GitPublisher::new(&self.config));

        let summary = self
            .execute_with(&client, publisher.as_ref().map(|p| p as &dyn Publisher))
            .await?;

        Ok(Formatter::new(self.config.format).format_summary(&summary))
    }

    /// Runs the pipeline with a provided source and publisher (for testing).
    pub async fn execute_with(
        &self,
        source: &impl FeedSource,
        publisher: Option<&dyn Publisher>,
    ) -> Result<RunSummary> {
        let body = source.fetch().await?;
        let feed = parse_feed(&body)?;
        info!("Total items in source feed: {}", feed.count());

        let output = Transformer::from_config(&self.config).transform(&feed);

        let bytes = render_feed(&output).context("Failed to serialize output feed")?;
        write_atomic(&self.config.output_path, &bytes)?;

        let publish = match publisher {
            Some(publisher) => publisher.publish(&self.config.output_path).await,
            None => PublishStatus::Skipped,
        };

        Ok(RunSummary {
            total_items: feed.count(),
            included: output
                .items
                .iter()
                .map(|item| IncludedProduct { id: item.id.clone(), title: item.title.clone() })
                .collect(),
            output_path: self.config.output_path.clone(),
            publish,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Mock source returning a fixed body.
    struct MockSource {
        body: Result<String, String>,
    }

    #[async_trait]
    impl FeedSource for MockSource {
        async fn fetch(&self) -> Result<String> {
            self.body.clone().map_err(anyhow::Error::msg)
        }
    }

    /// Mock publisher recording the paths it was asked to publish.
    struct MockPublisher {
        status: PublishStatus,
        published: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl Publisher for MockPublisher {
        async fn publish(&self, path: &Path) -> PublishStatus {
            self.published.lock().unwrap().push(path.to_path_buf());
            self.status
        }
    }

    fn make_source(body: &str) -> MockSource {
        MockSource { body: Ok(body.to_string()) }
    }

    fn make_test_config(dir: &TempDir) -> Config {
        Config { output_path: dir.path().join("norsk-feed.xml"), ..Config::default() }
    }

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:g="http://base.google.com/ns/1.0">
  <channel>
    <title>Lampster</title>
    <item>
      <g:id>N-1</g:id>
      <g:title>Norsk taklampa</g:title>
      <g:product_type>Norsk</g:product_type>
      <g:price>100.00 SEK</g:price>
    </item>
    <item>
      <g:id>S-1</g:id>
      <g:title>Svensk taklampa</g:title>
      <g:product_type>Svensk</g:product_type>
      <g:price>100.00 SEK</g:price>
    </item>
  </channel>
</rss>"#;

    #[tokio::test]
    async fn test_run_writes_filtered_feed() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        let cmd = RunCommand::new(config.clone());

        let summary = cmd.execute_with(&make_source(FEED), None).await.unwrap();
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.included_count(), 1);
        assert_eq!(summary.included[0].id, "N-1");
        assert_eq!(summary.publish, PublishStatus::Skipped);

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert!(written.contains("<g:id>N-1</g:id>"));
        assert!(!written.contains("S-1"));
        assert!(written.contains("<g:price>133.75 NOK</g:price>"));
    }

    #[tokio::test]
    async fn test_run_publishes_written_file() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        let publisher =
            MockPublisher { status: PublishStatus::Failed, published: Mutex::new(Vec::new()) };

        let summary = RunCommand::new(config.clone())
            .execute_with(&make_source(FEED), Some(&publisher))
            .await
            .unwrap();

        // A failed publish does not fail the run
        assert_eq!(summary.publish, PublishStatus::Failed);
        assert_eq!(*publisher.published.lock().unwrap(), vec![config.output_path.clone()]);
        assert!(config.output_path.exists());
    }

    #[tokio::test]
    async fn test_run_is_byte_identical_across_runs() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        let cmd = RunCommand::new(config.clone());

        cmd.execute_with(&make_source(FEED), None).await.unwrap();
        let first = std::fs::read(&config.output_path).unwrap();
        cmd.execute_with(&make_source(FEED), None).await.unwrap();
        let second = std::fs::read(&config.output_path).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        let source = MockSource { body: Err("connection refused".to_string()) };

        let result = RunCommand::new(config.clone()).execute_with(&source, None).await;
        assert!(result.is_err());
        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn test_missing_channel_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);

        let err = RunCommand::new(config.clone())
            .execute_with(&make_source("<rss><item/></rss>"), None)
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<FeedError>(), Some(FeedError::MissingChannel)));
        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn test_malformed_xml_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        std::fs::write(&config.output_path, "previous").unwrap();

        let result = RunCommand::new(config.clone())
            .execute_with(&make_source("<rss><channel><item></channel>"), None)
            .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&config.output_path).unwrap(), "previous");
    }
}
