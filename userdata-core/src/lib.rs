//! # UserData Core
//!
//! Core library for the UserData suppression plugins. It decides, from the
//! path and query string of an item-listing request, whether the response
//! should leave out per-user watch state.
//!
//! ## Overview
//!
//! - **Suppression**: the classifier mapping a request to a [`Decision`]
//! - **Query parameters**: a case-insensitive multimap over the raw query
//! - **Item catalog**: the lookup port used to resolve a `parentId`, plus an
//!   in-memory implementation
//! - **Plugins**: configuration and metadata of the two plugins
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use userdata_core::{
//!     catalog::InMemoryCatalog,
//!     plugins::DisableUserDataConfig,
//!     query::QueryParams,
//!     suppression::{RequestDescriptor, SuppressionClassifier},
//! };
//!
//! async fn decide() -> bool {
//!     let classifier = SuppressionClassifier::new(Arc::new(InMemoryCatalog::new()));
//!     let config = DisableUserDataConfig {
//!         next_up: true,
//!         ..Default::default()
//!     };
//!     let query = QueryParams::parse("fields=Overview");
//!     let request = RequestDescriptor::new("/Shows/NextUp", &query);
//!     classifier.classify(&config, &request).await.suppresses()
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Item lookup port and the in-memory catalog
pub mod catalog;
/// Error types shared by the core modules
pub mod error;
/// Plugin metadata and configuration
pub mod plugins;
/// Query string multimap
pub mod query;
/// Request classification
pub mod suppression;

pub use catalog::{InMemoryCatalog, ItemCatalog, ItemQuery};
pub use error::{CatalogError, PluginIdError};
pub use plugins::{
    CollectionsAcceleratorConfig, DisableUserDataConfig, PluginInfo,
    PluginKind, PluginSettings,
};
pub use query::QueryParams;
pub use suppression::{
    Decision, RequestDescriptor, SuppressionClassifier, SuppressionRule,
};
