//! Per-tag report lines.

use chrono::NaiveDateTime;
use std::fmt;


/// The outcome of reducing one tag's manifest history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    pub tag: String,
    /// Latest layer creation time, `None` if no history entry parsed.
    pub last_updated: Option<NaiveDateTime>,
}

impl TagReport {
    pub fn new(tag: impl Into<String>, last_updated: Option<NaiveDateTime>) -> Self {
        Self {
            tag: tag.into(),
            last_updated,
        }
    }
}

/// Renders `Tag: {tag} - Last Updated: {timestamp}`, with `None` for a
/// missing timestamp.
impl fmt::Display for TagReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag: {} - Last Updated: ", self.tag)?;
        match &self.last_updated {
            Some(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            None => f.write_str("None"),
        }
    }
}

/// Totals of a finished scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of tags for which a report was emitted.
    pub reported: usize,
    /// Tags skipped because of an error, in list order.
    pub skipped: Vec<SkippedTag>,
    /// The caller asked to stop before every tag was processed.
    pub stopped: bool,
}

impl ScanSummary {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && !self.stopped
    }
}

/// A tag that could not be processed.
#[derive(Debug)]
pub struct SkippedTag {
    pub tag: String,
    pub error: crate::error::TagstampError,
}
