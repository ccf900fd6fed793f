use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user, per-item state attached to item responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserData {
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub playback_position_ticks: i64,
    #[serde(default)]
    pub play_count: u32,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played_date: Option<DateTime<Utc>>,
}

impl UserData {
    /// Started but not finished.
    pub fn is_in_progress(&self) -> bool {
        !self.played && self.playback_position_ticks > 0
    }
}
