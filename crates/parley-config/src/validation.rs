// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after deserialization.
//!
//! Every problem is collected so one run reports them all.

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

/// Validates a deserialized configuration.
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err() && !is_hostname(host) {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    for origin in &config.server.cors_origins {
        if !is_origin(origin) {
            errors.push(ConfigError::validation(format!(
                "server.cors_origins entry `{origin}` must look like scheme://host[:port]"
            )));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    let openai = &config.openai;
    if !(0.0..=2.0).contains(&openai.temperature) {
        errors.push(ConfigError::validation(format!(
            "openai.temperature must be between 0 and 2, got {}",
            openai.temperature
        )));
    }
    if openai.max_tokens == 0 {
        errors.push(ConfigError::validation(
            "openai.max_tokens must be greater than 0",
        ));
    }
    if openai.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "openai.timeout_secs must be greater than 0",
        ));
    }
    if openai.model.trim().is_empty() {
        errors.push(ConfigError::validation("openai.model must not be empty"));
    }
    if !is_http_url(&openai.base_url) {
        errors.push(ConfigError::validation(format!(
            "openai.base_url `{}` must start with http:// or https://",
            openai.base_url
        )));
    }

    if config.agent.fallback_message.trim().is_empty() {
        errors.push(ConfigError::validation(
            "agent.fallback_message must not be empty",
        ));
    }

    if let Some(secret) = &config.auth.jwt_secret
        && secret.is_empty()
    {
        errors.push(ConfigError::validation(
            "auth.jwt_secret must not be empty when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_hostname(host: &str) -> bool {
    host.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

fn is_http_url(url: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

/// Browser origins carry no path, so a trailing slash or path segment is rejected.
fn is_origin(origin: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        origin.strip_prefix(scheme).is_some_and(|authority| {
            !authority.is_empty()
                && !authority.contains('/')
                && !authority.chars().any(char::is_whitespace)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ParleyConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ParleyConfig::default();
        config.openai.temperature = 3.5;
        config.openai.max_tokens = 0;
        config.agent.fallback_message = "   ".into();
        config.storage.database_path = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn origin_shapes() {
        assert!(is_origin("http://localhost:3000"));
        assert!(is_origin("https://chat.example.com"));
        assert!(!is_origin("localhost:3000"));
        assert!(!is_origin("http://localhost:3000/"));
        assert!(!is_origin("https://"));
    }

    #[test]
    fn host_shapes() {
        let mut config = ParleyConfig::default();
        config.server.host = "0.0.0.0".into();
        assert!(validate_config(&config).is_ok());
        config.server.host = "::1".into();
        assert!(validate_config(&config).is_ok());
        config.server.host = "my host!".into();
        assert!(validate_config(&config).is_err());
    }
}
