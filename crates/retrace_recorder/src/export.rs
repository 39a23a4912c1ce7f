//! Serializable view of a recording.

use serde::Serialize;

use crate::config::CacheConfig;
use crate::gradient::GradientHandle;
use crate::log::LogEntry;
use crate::scope::SaveStackEntry;

/// Everything a recording holds, flattened for dumping to JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogExport {
    pub config: CacheConfig,
    pub entries: Vec<LogEntry>,
    pub draw_indexes: Vec<u64>,
    pub checkpoints: Vec<u64>,
    pub gradients: Vec<GradientHandle>,
    /// Scopes still open when the export was taken.
    pub open_scopes: Vec<SaveStackEntry>,
}

impl LogExport {
    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
