use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::events::models::{parse_events, RawEventRecord};
use crate::events::view::EventLogView;
use crate::fixtures::MatchSummary;

/// Where match metadata and event logs come from.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Metadata for every available match.
    async fn list_matches(&self) -> Result<Vec<MatchSummary>>;

    /// Validated event log for one match.
    async fn load_events(&self, match_id: u64) -> Result<EventLogView>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Match data exported to a local directory:
///
/// ```text
/// <root>/matches.json          array of MatchSummary
/// <root>/events/<match_id>.json array of flat event records
/// ```
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonDirectorySource { root: root.into() }
    }

    async fn read(&self, path: &Path, what: &str) -> Result<String> {
        debug!("Reading {} from {}", what, path.display());
        tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AnalyticsError::not_found(format!("{} ({})", what, path.display()))
            } else {
                AnalyticsError::Io(e)
            }
        })
    }
}

#[async_trait]
impl MatchSource for JsonDirectorySource {
    fn name(&self) -> &str {
        "json-directory"
    }

    async fn list_matches(&self) -> Result<Vec<MatchSummary>> {
        let raw = self
            .read(&self.root.join("matches.json"), "match list")
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn load_events(&self, match_id: u64) -> Result<EventLogView> {
        let path = self
            .root
            .join("events")
            .join(format!("{}.json", match_id));
        let raw = self
            .read(&path, &format!("events for match {}", match_id))
            .await?;
        let records: Vec<RawEventRecord> = serde_json::from_str(&raw)?;
        let events = parse_events(records)?;
        debug!("Loaded {} events for match {}", events.len(), match_id);
        Ok(EventLogView::new(events))
    }
}
