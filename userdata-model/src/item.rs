use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, ItemKind, UserData};

/// An item as stored in the host's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
    /// Owning series for seasons and episodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index_number: Option<u32>,
    pub date_created: DateTime<Utc>,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
            parent_id: None,
            series_id: None,
            index_number: None,
            parent_index_number: None,
            date_created: Utc::now(),
        }
    }

    pub fn with_parent(mut self, parent_id: ItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_series(mut self, series_id: ItemId) -> Self {
        self.series_id = Some(series_id);
        self
    }

    pub fn with_episode_number(mut self, season: u32, episode: u32) -> Self {
        self.parent_index_number = Some(season);
        self.index_number = Some(episode);
        self
    }

    pub fn created_at(mut self, date_created: DateTime<Utc>) -> Self {
        self.date_created = date_created;
        self
    }
}

/// Item as returned to clients.
///
/// `user_data` is only present when the request asked for it and a user is
/// known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemDto {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index_number: Option<u32>,
    pub date_created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<UserData>,
}

impl ItemDto {
    pub fn from_item(item: &CatalogItem, user_data: Option<UserData>) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            kind: item.kind,
            parent_id: item.parent_id,
            series_id: item.series_id,
            index_number: item.index_number,
            parent_index_number: item.parent_index_number,
            date_created: item.date_created,
            user_data,
        }
    }
}

/// Paged listing envelope used by the host's item endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub total_record_count: usize,
}

impl<T> QueryResult<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total_record_count = items.len();
        Self {
            items,
            total_record_count,
        }
    }
}
