use serde::{Deserialize, Serialize};

/// Settings of the Collections Accelerator plugin.
///
/// The plugin is a bare toggle. `enabled` is fixed at `true`; a persisted
/// value is ignored on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsAcceleratorConfig {
    #[serde(skip_deserializing, default = "always_enabled")]
    enabled: bool,
}

fn always_enabled() -> bool {
    true
}

impl Default for CollectionsAcceleratorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl CollectionsAcceleratorConfig {
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_value_cannot_turn_it_off() {
        let config: CollectionsAcceleratorConfig =
            serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(config.enabled());
    }
}
