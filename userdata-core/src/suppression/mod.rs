//! Request classification for the Disable UserData plugin.
//!
//! A request is classified from its path and query string alone, plus one
//! catalog lookup for the `parentId` of collection listings. Rules are
//! evaluated in a fixed order and the first one that fires wins:
//!
//! 1. Collections: `includeItemTypes` names `BoxSet`, or `parentId` is a
//!    library root (`CollectionFolder`)
//! 2. Continue Watching: path ends with `/Resume`
//! 3. Next Up: path ends with `/NextUp`
//! 4. Recently Added: path ends with `/Latest`
//!
//! Nothing is evaluated while the plugin is globally disabled, and a rule
//! whose category is switched off never fires.

pub mod rules;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    catalog::ItemCatalog, plugins::DisableUserDataConfig, query::QueryParams,
};

/// Category of listing whose UserData can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuppressionRule {
    Collections,
    ContinueWatching,
    NextUp,
    RecentlyAdded,
}

impl SuppressionRule {
    /// Evaluation order.
    pub const ALL: [SuppressionRule; 4] = [
        SuppressionRule::Collections,
        SuppressionRule::ContinueWatching,
        SuppressionRule::NextUp,
        SuppressionRule::RecentlyAdded,
    ];

    /// Path suffix that identifies the view, for path-based rules.
    pub fn path_suffix(&self) -> Option<&'static str> {
        match self {
            SuppressionRule::Collections => None,
            SuppressionRule::ContinueWatching => Some(rules::RESUME_SUFFIX),
            SuppressionRule::NextUp => Some(rules::NEXT_UP_SUFFIX),
            SuppressionRule::RecentlyAdded => Some(rules::LATEST_SUFFIX),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuppressionRule::Collections => "collections",
            SuppressionRule::ContinueWatching => "continue_watching",
            SuppressionRule::NextUp => "next_up",
            SuppressionRule::RecentlyAdded => "recently_added",
        }
    }
}

impl fmt::Display for SuppressionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Leave the request untouched
    Passthrough,
    /// Force `enableUserData=false`; carries the rule that fired
    Suppress(SuppressionRule),
}

impl Decision {
    /// True when the request's UserData must be dropped.
    pub fn suppresses(&self) -> bool {
        matches!(self, Decision::Suppress(_))
    }

    pub fn rule(&self) -> Option<SuppressionRule> {
        match self {
            Decision::Suppress(rule) => Some(*rule),
            Decision::Passthrough => None,
        }
    }
}

/// The parts of an inbound request the classifier looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestDescriptor<'a> {
    pub path: &'a str,
    pub query: &'a QueryParams,
}

impl<'a> RequestDescriptor<'a> {
    pub fn new(path: &'a str, query: &'a QueryParams) -> Self {
        Self { path, query }
    }
}

/// Decides whether a request should have its UserData suppressed.
///
/// Holds no per-request state; share one instance behind an `Arc`.
#[derive(Clone)]
pub struct SuppressionClassifier {
    catalog: Arc<dyn ItemCatalog>,
}

impl fmt::Debug for SuppressionClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuppressionClassifier").finish_non_exhaustive()
    }
}

impl SuppressionClassifier {
    pub fn new(catalog: Arc<dyn ItemCatalog>) -> Self {
        Self { catalog }
    }

    /// Classify `request` under `config`.
    ///
    /// Never fails: a malformed `parentId`, an unknown item and a catalog
    /// error all count as "does not match".
    pub async fn classify(
        &self,
        config: &DisableUserDataConfig,
        request: &RequestDescriptor<'_>,
    ) -> Decision {
        if !config.enabled {
            return Decision::Passthrough;
        }

        debug!(path = request.path, "classifying request");

        for rule in SuppressionRule::ALL {
            if !config.is_rule_enabled(rule) {
                continue;
            }

            let matched = match rule.path_suffix() {
                Some(suffix) => rules::path_ends_with(request.path, suffix),
                None => self.targets_collections(request).await,
            };

            if matched {
                debug!(path = request.path, %rule, "suppressing user data");
                return Decision::Suppress(rule);
            }
        }

        Decision::Passthrough
    }

    /// Shorthand for `classify(..).await.suppresses()`.
    pub async fn should_suppress(
        &self,
        config: &DisableUserDataConfig,
        request: &RequestDescriptor<'_>,
    ) -> bool {
        self.classify(config, request).await.suppresses()
    }

    async fn targets_collections(&self, request: &RequestDescriptor<'_>) -> bool {
        // Covers listings that mix collections in, e.g. a movie library
        // browsed with the collections view selected.
        if rules::includes_box_sets(request.query) {
            return true;
        }

        // Covers browsing a library root directly, e.g. the collections
        // library opened from the home screen.
        let Some(parent_id) = rules::parent_id(request.query) else {
            return false;
        };

        match self.catalog.item_kind(parent_id).await {
            Ok(Some(kind)) => kind.is_collection_folder(),
            Ok(None) => {
                debug!(%parent_id, "parent item not found");
                false
            }
            Err(err) => {
                warn!(%parent_id, error = %err, "parent lookup failed; not suppressing");
                false
            }
        }
    }
}
