use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored link: a short code, the URL it redirects to, and its click
/// counters.
///
/// Values of this type are snapshots. Only a store keeps the live record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The unique short code.
    pub code: ShortCode,
    /// The absolute http(s) URL visitors are redirected to.
    pub target_url: String,
    /// Number of redirects recorded for this code.
    pub clicks: u64,
    /// When the most recent redirect was recorded, if any.
    pub last_clicked: Option<Timestamp>,
    /// When the link was created.
    pub created_at: Timestamp,
}

impl Link {
    /// A freshly created link with no clicks.
    pub fn new(code: ShortCode, target_url: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            code,
            target_url: target_url.into(),
            clicks: 0,
            last_clicked: None,
            created_at,
        }
    }
}
