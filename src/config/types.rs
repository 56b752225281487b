use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for replaying recorded event logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Log and skip lines that fail to parse instead of aborting.
    #[serde(default)]
    pub skip_invalid: bool,
    /// Row limit to apply before the first recorded event.
    #[serde(default)]
    pub sql_limit: Option<u32>,
}

/// How the final snapshot is printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON (default: true).
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}
