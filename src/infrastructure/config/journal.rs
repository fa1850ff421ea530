//! Signal journal configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::adapter::outbound::journal::DEFAULT_JOURNAL_PATH;

const fn default_true() -> bool {
    true
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_JOURNAL_PATH)
}

/// Where notified alerts are appended.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_path(),
        }
    }
}
