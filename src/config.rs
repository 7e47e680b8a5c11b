use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use url::Url;

use crate::error::ConfigError;

/// Tunables for session splitting, chunk packing and report naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Gap (minutes) at or above which a new session starts
    pub group_gap_minutes: i64,
    /// Upper bound (Unicode scalar values) on one generation request payload
    pub chunk_chars: usize,
    /// Append a time suffix to the report filename
    pub add_timestamp: bool,
    pub timestamp_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            group_gap_minutes: 10,
            chunk_chars: 12000,
            add_timestamp: false,
            timestamp_format: "%H-%M-%S".into(),
        }
    }
}

/// Generation backend settings (OpenAI-compatible chat completion endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Wall-clock bound per request; exceeding it counts as a transient failure
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Chunks generated concurrently. 1 = sequential, the safe default for
    /// locally-hosted backends that serialize requests anyway.
    pub parallelism: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:1234/v1/chat/completions".into(),
            model: "llama3.2".into(),
            max_tokens: 2000,
            temperature: 0.7,
            timeout_secs: 60,
            max_retries: 3,
            retry_initial_delay_ms: 1000,
            retry_max_delay_ms: 30_000,
            parallelism: 1,
        }
    }
}

/// Where the activity log collaborator writes and where reports land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub base_dir: String,
    pub log_subdir: String,
    pub report_subdir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: "~/Documents/daybrief".into(),
            log_subdir: "logs".into(),
            report_subdir: "reports".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Load from a JSON file. A missing file yields the defaults; an
    /// existing but unreadable or malformed file is a hard error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Config::default()
        };

        config.expand_paths();
        config.validate()?;
        Ok(config)
    }

    /// Expand a leading `~` in the base directory.
    fn expand_paths(&mut self) {
        if let Some(rest) = self.storage.base_dir.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                self.storage.base_dir = Path::new(&home).join(rest).display().to_string();
            }
        }
    }

    /// Fail fast on bad values, before any record is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.group_gap_minutes <= 0 {
            return Err(ConfigError::NonPositive {
                field: "report.group_gap_minutes",
                value: self.report.group_gap_minutes,
            });
        }
        if self.report.chunk_chars == 0 {
            return Err(ConfigError::NonPositive {
                field: "report.chunk_chars",
                value: 0,
            });
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::NonPositive {
                field: "llm.max_tokens",
                value: 0,
            });
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::NonPositive {
                field: "llm.timeout_secs",
                value: 0,
            });
        }
        if self.llm.max_retries == 0 {
            return Err(ConfigError::NonPositive {
                field: "llm.max_retries",
                value: 0,
            });
        }
        if self.llm.parallelism == 0 {
            return Err(ConfigError::NonPositive {
                field: "llm.parallelism",
                value: 0,
            });
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        let url = Url::parse(&self.llm.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.llm.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.llm.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs)
    }
}
