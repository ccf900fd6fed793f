//! Core data model definitions shared across the UserData plugin crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod item;
pub mod item_kind;
pub mod user_data;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::{ItemId, UserId};
pub use item::{CatalogItem, ItemDto, QueryResult};
pub use item_kind::ItemKind;
pub use user_data::UserData;
