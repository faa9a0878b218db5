// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/parley/parley.toml`, then `~/.config/parley/parley.toml`,
//! then `./parley.toml`, with `PARLEY_*` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ParleyConfig;

/// Config file name searched for in every location.
pub const CONFIG_FILE_NAME: &str = "parley.toml";

/// Sections that `PARLEY_<SECTION>_<KEY>` variables may address.
const ENV_SECTIONS: &[&str] = &["agent", "server", "storage", "openai", "auth"];

/// Candidate config files, lowest priority first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/parley").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("parley").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

/// Builds the full layered Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(ParleyConfig::default()));
    for path in config_file_candidates() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Loads configuration from the standard hierarchy with env overrides.
pub fn load_config() -> Result<ParleyConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from one explicit file, with env overrides.
pub fn load_config_from_path(path: &Path) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Loads configuration from a TOML string over the defaults. Env is ignored.
pub fn load_config_from_str(toml_content: &str) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Maps `PARLEY_<SECTION>_<KEY>` to `section.key`.
///
/// The section prefix is replaced once, so keys with underscores survive:
/// `PARLEY_OPENAI_MAX_TOKENS` becomes `openai.max_tokens`. The bare
/// `PARLEY_JWT_SECRET` is accepted as `auth.jwt_secret`. Variables outside
/// these sections are ignored rather than rejected.
fn env_provider() -> Env {
    Env::prefixed("PARLEY_")
        .filter(|key| map_env_key(&key.as_str().to_ascii_lowercase()).is_some())
        .map(|key| {
            let lowered = key.as_str().to_ascii_lowercase();
            map_env_key(&lowered).unwrap_or(lowered).into()
        })
}

/// Returns the dotted config path for a lowercased, prefix-stripped env key.
pub fn map_env_key(key: &str) -> Option<String> {
    if key == "jwt_secret" {
        return Some("auth.jwt_secret".to_string());
    }
    ENV_SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| format!("{section}.{rest}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_by_section_prefix() {
        assert_eq!(map_env_key("agent_name").as_deref(), Some("agent.name"));
        assert_eq!(
            map_env_key("openai_max_tokens").as_deref(),
            Some("openai.max_tokens")
        );
        assert_eq!(
            map_env_key("server_cors_origins").as_deref(),
            Some("server.cors_origins")
        );
        assert_eq!(map_env_key("jwt_secret").as_deref(), Some("auth.jwt_secret"));
    }

    #[test]
    fn unrelated_env_keys_are_skipped() {
        assert_eq!(map_env_key("home"), None);
        assert_eq!(map_env_key("agent"), None);
        assert_eq!(map_env_key("agentname"), None);
    }

    #[test]
    fn candidates_end_with_local_file() {
        let candidates = config_file_candidates();
        assert_eq!(
            candidates.first(),
            Some(&PathBuf::from("/etc/parley/parley.toml"))
        );
        assert_eq!(candidates.last(), Some(&PathBuf::from("parley.toml")));
    }
}
