//! Convert command: run the pipeline on a local feed file.

use crate::commands::RunCommand;
use crate::config::Config;
use crate::feed::FileSource;
use crate::format::Formatter;
use anyhow::Result;
use std::path::Path;

/// Converts a feed file on disk without fetching or publishing.
pub struct ConvertCommand {
    config: Config,
}

impl ConvertCommand {
    /// Creates a new convert command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Converts `input` and returns formatted output.
    pub async fn execute(&self, input: &Path) -> Result<String> {
        let source = FileSource::new(input);
        let summary = RunCommand::new(self.config.clone()).execute_with(&source, None).await?;

        Ok(Formatter::new(self.config.format).format_summary(&summary))
    }
}
