//! Filesystem-backed run reporting
//!
//! Annotations go to the log; failure artifacts land in the configured
//! screenshot directory as `error_<timestamp>.png`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info};

use actionbook_engine::{ReportError, Reporter};

pub struct FsReporter {
    screenshot_dir: PathBuf,
}

impl FsReporter {
    pub fn new(screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            screenshot_dir: screenshot_dir.into(),
        }
    }
}

#[async_trait]
impl Reporter for FsReporter {
    async fn annotate_title(&self, title: &str) {
        info!(title, "running");
    }

    async fn annotate_description(&self, description: &str) {
        debug!(description, "action description");
    }

    async fn attach_artifact(&self, label: &str, bytes: &[u8]) -> Result<(), ReportError> {
        tokio::fs::create_dir_all(&self.screenshot_dir)
            .await
            .map_err(|err| {
                ReportError::new(format!(
                    "failed to create {}: {err}",
                    self.screenshot_dir.display()
                ))
            })?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.screenshot_dir.join(format!("error_{stamp}.png"));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| ReportError::new(format!("failed to write {}: {err}", path.display())))?;

        info!(label, path = %path.display(), "failure artifact saved");
        Ok(())
    }
}
