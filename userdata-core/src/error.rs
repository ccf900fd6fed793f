use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by item catalogs.
///
/// The suppression classifier never propagates these; a failed lookup is a
/// rule miss.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read catalog seed {path}")]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog seed {path}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("item {0} references an unknown parent")]
    UnknownParent(userdata_model::ItemId),
}

/// A plugin id from a request path that does not name a known plugin.
#[derive(Error, Debug)]
pub enum PluginIdError {
    #[error("malformed plugin id")]
    Malformed(#[from] uuid::Error),

    #[error("no plugin with id {0}")]
    Unknown(uuid::Uuid),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
