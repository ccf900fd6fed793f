use serde::{Deserialize, Serialize};

use crate::suppression::SuppressionRule;

/// Settings of the Disable UserData plugin.
///
/// Every category is opt-in; the global switch defaults to on so enabling a
/// category is enough to take effect on a fresh install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisableUserDataConfig {
    /// Global toggle: completely enable/disable the plugin
    #[serde(alias = "Enabled")]
    pub enabled: bool,
    /// Collections on the Items endpoints
    #[serde(alias = "DisableOnCollections")]
    pub collections: bool,
    /// Continue Watching (`.../Resume`)
    #[serde(alias = "DisableOnContinueWatching")]
    pub continue_watching: bool,
    /// Next Up (`.../NextUp`)
    #[serde(alias = "DisableOnNextUp")]
    pub next_up: bool,
    /// Recently Added (`.../Latest`)
    #[serde(alias = "DisableOnRecentlyAdded")]
    pub recently_added: bool,
}

impl Default for DisableUserDataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collections: false,
            continue_watching: false,
            next_up: false,
            recently_added: false,
        }
    }
}

impl DisableUserDataConfig {
    /// Everything on.
    pub fn all() -> Self {
        Self {
            enabled: true,
            collections: true,
            continue_watching: true,
            next_up: true,
            recently_added: true,
        }
    }

    pub fn is_rule_enabled(&self, rule: SuppressionRule) -> bool {
        match rule {
            SuppressionRule::Collections => self.collections,
            SuppressionRule::ContinueWatching => self.continue_watching,
            SuppressionRule::NextUp => self.next_up,
            SuppressionRule::RecentlyAdded => self.recently_added,
        }
    }

    pub fn with_rule(mut self, rule: SuppressionRule, enabled: bool) -> Self {
        match rule {
            SuppressionRule::Collections => self.collections = enabled,
            SuppressionRule::ContinueWatching => {
                self.continue_watching = enabled
            }
            SuppressionRule::NextUp => self.next_up = enabled,
            SuppressionRule::RecentlyAdded => self.recently_added = enabled,
        }
        self
    }

    /// True when at least one category would be evaluated.
    pub fn is_active(&self) -> bool {
        self.enabled
            && SuppressionRule::ALL
                .into_iter()
                .any(|rule| self.is_rule_enabled(rule))
    }
}
