// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley config` command implementation.

use parley_config::ParleyConfig;

/// Renders the effective configuration as TOML with secrets redacted.
pub fn render(config: &ParleyConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&config.redacted())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_never_printed() {
        let mut config = ParleyConfig::default();
        config.openai.api_key = Some("sk-live-abc123".into());
        config.auth.jwt_secret = Some("hunter2".into());

        let rendered = render(&config).unwrap();
        assert!(!rendered.contains("sk-live-abc123"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn output_parses_back() {
        let rendered = render(&ParleyConfig::default()).unwrap();
        let reparsed = parley_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reparsed.server.port, 8000);
        assert_eq!(reparsed.openai.model, "gpt-4.1-mini");
    }
}
