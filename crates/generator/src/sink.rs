// Destinations for rendered pages

use async_trait::async_trait;
use std::path::PathBuf;

/// Somewhere rendered pages can be written by name
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, file_name: &str, contents: &str) -> std::io::Result<()>;
}

/// Writes pages into a directory on disk
#[derive(Debug, Clone)]
pub struct FsSink {
    dir: PathBuf,
}

impl FsSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl OutputSink for FsSink {
    async fn write(&self, file_name: &str, contents: &str) -> std::io::Result<()> {
        tokio::fs::write(self.dir.join(file_name), contents).await
    }
}
