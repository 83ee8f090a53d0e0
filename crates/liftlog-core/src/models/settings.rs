//! User settings model

use serde::{Deserialize, Serialize};

/// Weight display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

/// Local application settings, persisted in the settings collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Unit used when displaying exercise weights
    pub weight_unit: WeightUnit,
    /// Whether the connectivity observer triggers automatic sync passes
    pub auto_sync_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Kg,
            auto_sync_enabled: true,
        }
    }
}
