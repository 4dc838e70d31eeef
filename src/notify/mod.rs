//! Notification surface boundary.
//!
//! The chat platform that ultimately displays the summary and chart lives
//! outside this crate; delivery failures are reported to the user as text and
//! never retried.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, summary: &str, artifact: &Path) -> Result<()>;
}

/// Prints the summary and artifact location to the local console.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn deliver(&self, summary: &str, artifact: &Path) -> Result<()> {
        println!("{summary}Chart: {}", artifact.display());
        log::info!("Delivered summary with artifact {}", artifact.display());
        Ok(())
    }
}
