// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAPI document served at `/openapi.json`.

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::error::ErrorResponse;
use crate::handlers::{
    self, ChatRequest, ChatResponse, CreatedConversation, DeleteResponse, HealthResponse,
    MessageView,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_health,
        handlers::post_chat,
        handlers::list_conversations,
        handlers::create_conversation,
        handlers::get_conversation_full,
        handlers::get_conversation_messages,
        handlers::delete_conversation,
    ),
    components(schemas(
        ChatRequest,
        ChatResponse,
        CreatedConversation,
        DeleteResponse,
        HealthResponse,
        MessageView,
        ErrorResponse,
        parley_core::Conversation,
        parley_core::ConversationDetail,
        parley_core::ConversationSummary,
        parley_core::Message,
        parley_core::Role,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "chat", description = "Chat turns"),
        (name = "conversations", description = "Conversation history"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` JWT security scheme referenced by protected paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/chat",
            "/conversations",
            "/conversations/{id}/full",
            "/conversations/{id}/messages",
            "/conversations/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
