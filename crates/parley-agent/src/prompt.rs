// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System instruction resolution.

use tracing::{info, warn};

/// Resolves the system instruction: file, then inline text, then a default.
///
/// An unreadable or blank file is logged and skipped.
pub async fn load_system_prompt(
    agent_name: &str,
    inline_prompt: Option<&str>,
    prompt_file: Option<&str>,
) -> String {
    if let Some(path) = prompt_file {
        match tokio::fs::read_to_string(path).await {
            Ok(content) if !content.trim().is_empty() => {
                info!(path, "loaded system prompt from file");
                return content.trim().to_string();
            }
            Ok(_) => warn!(path, "system prompt file is empty, falling back"),
            Err(e) => warn!(path, error = %e, "failed to read system prompt file, falling back"),
        }
    }

    if let Some(prompt) = inline_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.to_string();
    }

    format!(
        "You are {agent_name}, a helpful assistant chatbot.\n\
         Write equations in LaTeX, wrapped in $$ delimiters."
    )
}
