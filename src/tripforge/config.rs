//! Runtime configuration.

use std::path::PathBuf;

/// Settings for the HTTP shell and artifact persistence.
///
/// Construct directly or take [`Default`]; there is no config-file layer.
#[derive(Debug, Clone)]
pub struct TripforgeConfig {
    /// Root directory where per-run artifact folders are created.
    pub artifact_dir: PathBuf,
}

impl Default for TripforgeConfig {
    fn default() -> Self {
        TripforgeConfig {
            artifact_dir: PathBuf::from("travel_plans"),
        }
    }
}
