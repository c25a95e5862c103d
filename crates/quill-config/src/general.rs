//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default page size for entry listings.
const fn default_limit() -> u32 {
    100
}

/// Page size used by exports, large enough to return everything at once.
const fn default_export_limit() -> u32 {
    999_999_999
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Result limit for exports.
    #[serde(default = "default_export_limit")]
    pub export_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            export_limit: default_export_limit(),
        }
    }
}
