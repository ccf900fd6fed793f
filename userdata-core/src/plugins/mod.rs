mod collections_accelerator;
mod disable_user_data;

pub use collections_accelerator::CollectionsAcceleratorConfig;
pub use disable_user_data::DisableUserDataConfig;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::{Uuid, uuid};

use crate::error::PluginIdError;

/// The plugins shipped by this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginKind {
    DisableUserData,
    CollectionsAccelerator,
}

impl PluginKind {
    pub const ALL: [PluginKind; 2] =
        [PluginKind::DisableUserData, PluginKind::CollectionsAccelerator];

    pub const fn id(&self) -> Uuid {
        match self {
            PluginKind::DisableUserData => {
                uuid!("21ba325d-6f1c-4441-9d69-cb4d7df9e45e")
            }
            PluginKind::CollectionsAccelerator => {
                uuid!("d830a1ae-1119-4cb8-8187-9553511b3764")
            }
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            PluginKind::DisableUserData => "Disable UserData",
            PluginKind::CollectionsAccelerator => "Collections Accelerator",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            PluginKind::DisableUserData => {
                "Drops per-user watch state from collection, continue watching, next up and recently added listings"
            }
            PluginKind::CollectionsAccelerator => {
                "On/off toggle reserved for collection browsing optimisations"
            }
        }
    }

    /// Whether administrators may change this plugin's settings.
    pub const fn is_configurable(&self) -> bool {
        matches!(self, PluginKind::DisableUserData)
    }

    pub fn from_id(id: Uuid) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PluginKind {
    type Err = PluginIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Uuid::parse_str(s.trim())?;
        Self::from_id(id).ok_or(PluginIdError::Unknown(id))
    }
}

/// Public description of a plugin, as listed by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginInfo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub version: String,
    pub enabled: bool,
    pub can_configure: bool,
}

/// Persisted settings of every plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PluginSettings {
    #[serde(default)]
    pub disable_user_data: DisableUserDataConfig,
    #[serde(default)]
    pub collections_accelerator: CollectionsAcceleratorConfig,
}

impl PluginSettings {
    pub fn is_enabled(&self, kind: PluginKind) -> bool {
        match kind {
            PluginKind::DisableUserData => self.disable_user_data.enabled,
            PluginKind::CollectionsAccelerator => {
                self.collections_accelerator.enabled()
            }
        }
    }

    pub fn describe(&self, kind: PluginKind) -> PluginInfo {
        PluginInfo {
            id: kind.id(),
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enabled: self.is_enabled(kind),
            can_configure: kind.is_configurable(),
        }
    }

    pub fn describe_all(&self) -> Vec<PluginInfo> {
        PluginKind::ALL
            .into_iter()
            .map(|kind| self.describe(kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_ids_are_stable_and_distinct() {
        assert_ne!(
            PluginKind::DisableUserData.id(),
            PluginKind::CollectionsAccelerator.id()
        );
        for kind in PluginKind::ALL {
            assert_eq!(PluginKind::from_id(kind.id()), Some(kind));
            assert_eq!(kind.id().to_string().parse::<PluginKind>().ok(), Some(kind));
        }
        assert!(PluginKind::from_id(Uuid::nil()).is_none());
        assert!(Uuid::nil().to_string().parse::<PluginKind>().is_err());
    }

    #[test]
    fn defaults_match_a_fresh_install() {
        let settings = PluginSettings::default();
        assert!(settings.is_enabled(PluginKind::DisableUserData));
        assert!(settings.is_enabled(PluginKind::CollectionsAccelerator));

        let infos = settings.describe_all();
        assert_eq!(infos.len(), 2);
        assert!(infos[0].can_configure);
        assert!(!infos[1].can_configure);
    }
}
