//! Service-wide operations: full reset and aggregate counts.

use domains::{Result, Status};
use tracing::{debug, warn};

use crate::ForumService;

impl ForumService {
    /// Drops all forum data.
    pub async fn clear(&self) -> Result<()> {
        warn!("clearing all forum data");
        self.service.clear().await
    }

    pub async fn status(&self) -> Result<Status> {
        let status = self.service.status().await?;
        debug!(?status, "status snapshot");
        Ok(status)
    }
}
