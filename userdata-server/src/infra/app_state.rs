use std::{fmt, sync::Arc};

use userdata_core::{InMemoryCatalog, SuppressionClassifier};

use crate::infra::{config::Config, settings_store::PluginSettingsStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<InMemoryCatalog>,
    pub settings: Arc<PluginSettingsStore>,
    pub classifier: Arc<SuppressionClassifier>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("catalog_items", &self.catalog.len())
            .field("settings", &self.settings.path())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the classifier to the same catalog the item routes read from.
    pub fn new(
        config: Arc<Config>,
        catalog: Arc<InMemoryCatalog>,
        settings: Arc<PluginSettingsStore>,
    ) -> Self {
        let classifier = Arc::new(SuppressionClassifier::new(catalog.clone()));
        Self {
            config,
            catalog,
            settings,
            classifier,
        }
    }
}
