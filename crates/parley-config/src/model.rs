// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parley chat backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder written in place of secrets when a config is displayed.
pub const REDACTED: &str = "[redacted]";

/// Top-level Parley configuration.
///
/// Every section is optional and falls back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Assistant identity, prompt, and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Completion provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Bearer token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl ParleyConfig {
    /// Returns a copy with every secret replaced by [`REDACTED`].
    ///
    /// Used when printing the effective configuration.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.openai.api_key.is_some() {
            copy.openai.api_key = Some(REDACTED.to_string());
        }
        if copy.auth.jwt_secret.is_some() {
            copy.auth.jwt_secret = Some(REDACTED.to_string());
        }
        copy
    }
}

/// Assistant behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name reported by the health endpoint.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system instruction. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the system instruction.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Reply returned to the user when the provider fails.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            fallback_message: default_fallback_message(),
        }
    }
}

fn default_agent_name() -> String {
    "parley".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fallback_message() -> String {
    "I'm sorry, I encountered an error while processing your request.".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed by CORS.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("parley").join("parley.db"))
        .unwrap_or_else(|| "parley.db".into())
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// OpenAI-compatible provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for every completion.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

/// Bearer token verification configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HS256 signing secret. Required by `parley serve`.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Clock skew tolerated when checking `exp`, in seconds.
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            leeway_secs: default_leeway_secs(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| REDACTED))
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

fn default_leeway_secs() -> u64 {
    30
}
