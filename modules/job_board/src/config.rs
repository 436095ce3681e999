use serde::{Deserialize, Serialize};

/// Configuration for the job_board module (`modules.job_board` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobBoardConfig {
    /// Remote job feed; when unset every sync goes straight to the snapshot.
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Fallback snapshot file, relative paths resolve against `server.home_dir`.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    #[serde(default = "default_true")]
    pub seed_users_from_snapshot: bool,
    #[serde(default = "default_apply_url_base")]
    pub apply_url_base: String,
    #[serde(default = "default_true")]
    pub sync_on_startup: bool,
}

impl Default for JobBoardConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            snapshot_path: default_snapshot_path(),
            seed_users_from_snapshot: true,
            apply_url_base: default_apply_url_base(),
            sync_on_startup: true,
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_snapshot_path() -> String {
    "fallback.json".to_string()
}

fn default_apply_url_base() -> String {
    "https://example.com/apply".to_string()
}

fn default_true() -> bool {
    true
}
