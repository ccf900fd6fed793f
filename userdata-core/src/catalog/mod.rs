mod memory;
mod seed;

pub use memory::InMemoryCatalog;
pub use seed::{CatalogSeed, UserDataSeed};

use async_trait::async_trait;
use userdata_model::{CatalogItem, ItemId, ItemKind};

use crate::error::Result;

/// Read-only item lookup against the host's catalog.
///
/// Implementations must be side-effect free; the suppression classifier may
/// call them concurrently from any number of requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn get_item(&self, id: ItemId) -> Result<Option<CatalogItem>>;

    /// Type tag of `id`, or `None` when the catalog has no such item.
    async fn item_kind(&self, id: ItemId) -> Result<Option<ItemKind>> {
        Ok(self.get_item(id).await?.map(|item| item.kind))
    }
}

/// Filters for item listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub parent_id: Option<ItemId>,
    /// Empty means every kind
    pub include_item_types: Vec<ItemKind>,
    pub exclude_item_types: Vec<ItemKind>,
    /// Walk the whole subtree under `parent_id` instead of direct children
    pub recursive: bool,
    pub start_index: usize,
    pub limit: Option<usize>,
}

impl ItemQuery {
    pub fn accepts_kind(&self, kind: ItemKind) -> bool {
        (self.include_item_types.is_empty()
            || self.include_item_types.contains(&kind))
            && !self.exclude_item_types.contains(&kind)
    }
}
