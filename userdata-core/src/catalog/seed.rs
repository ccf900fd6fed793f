use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use userdata_model::{CatalogItem, ItemId, UserData, UserId};

use crate::error::{CatalogError, Result};

/// JSON document used to populate an [`InMemoryCatalog`](super::InMemoryCatalog).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub user_data: Vec<UserDataSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDataSeed {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub data: UserData,
}

impl CatalogSeed {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|source| CatalogError::SeedIo {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&contents).map_err(|source| {
            CatalogError::SeedParse {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}
