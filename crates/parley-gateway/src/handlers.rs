// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chat and conversation routes.
//!
//! Handlers act on behalf of the [`AuthIdentity`] inserted by the auth
//! middleware. A conversation owned by another user is reported exactly
//! like a missing one.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use parley_core::{
    AuthIdentity, Conversation, ConversationDetail, ConversationSummary, ParleyError, Role,
    StorageAdapter,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorResponse};
use crate::server::GatewayState;

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user's message text.
    pub message: String,
    /// Conversation to continue. A new one is created when absent.
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    /// Assistant reply, or the fallback text when the provider failed.
    pub response: String,
    pub conversation_id: i64,
}

/// Response body for `POST /conversations`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedConversation {
    pub id: i64,
    pub user_id: String,
}

/// One entry of `GET /conversations/{id}/messages`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
}

/// Response body for `DELETE /conversations/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub conversation_id: i64,
}

/// Response body for the unauthenticated health routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// Loads conversation `id` if it belongs to the caller.
async fn owned_conversation(
    state: &GatewayState,
    identity: &AuthIdentity,
    id: i64,
) -> Result<Conversation, ParleyError> {
    match state.storage.get_conversation(id).await? {
        Some(conversation) if conversation.user_id == identity.user_id => Ok(conversation),
        _ => Err(ParleyError::conversation_not_found(id)),
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: format!("{} API is running", state.agent_name),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
    })
}

/// Runs one chat turn.
#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply (fallback text on provider failure)", body = ChatResponse),
        (status = 400, description = "Empty message or malformed body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown conversation", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn post_chat(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let outcome = state
        .orchestrator
        .handle_turn(&identity.user_id, &request.message, request.conversation_id)
        .await?;
    let (response, conversation_id) = outcome.reply_or(&state.fallback_message);
    Ok(Json(ChatResponse {
        response,
        conversation_id,
    }))
}

/// Lists the caller's conversations, most recently active first.
#[utoipa::path(
    get,
    path = "/conversations",
    tag = "conversations",
    responses(
        (status = 200, description = "Conversation summaries", body = [ConversationSummary]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn list_conversations(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let summaries = state.storage.list_conversations(&identity.user_id).await?;
    Ok(Json(summaries))
}

/// Creates an empty conversation for the caller.
#[utoipa::path(
    post,
    path = "/conversations",
    tag = "conversations",
    responses(
        (status = 200, description = "Conversation created", body = CreatedConversation),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create_conversation(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<CreatedConversation>, ApiError> {
    let conversation = state
        .storage
        .create_conversation(&identity.user_id)
        .await?;
    tracing::info!(
        conversation_id = conversation.id,
        user_id = %conversation.user_id,
        "conversation created"
    );
    Ok(Json(CreatedConversation {
        id: conversation.id,
        user_id: conversation.user_id,
    }))
}

/// Returns conversation metadata with its full history.
#[utoipa::path(
    get,
    path = "/conversations/{id}/full",
    tag = "conversations",
    params(("id" = i64, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Conversation with messages", body = ConversationDetail),
        (status = 400, description = "Malformed conversation id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown conversation", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn get_conversation_full(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ConversationDetail>, ApiError> {
    let Path(id) = path?;
    let conversation = owned_conversation(&state, &identity, id).await?;
    let messages = state.storage.get_history(id).await?;
    Ok(Json(ConversationDetail {
        conversation,
        messages,
    }))
}

/// Returns the role/content pairs of a conversation.
#[utoipa::path(
    get,
    path = "/conversations/{id}/messages",
    tag = "conversations",
    params(("id" = i64, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Ordered messages", body = [MessageView]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown conversation", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn get_conversation_messages(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let Path(id) = path?;
    owned_conversation(&state, &identity, id).await?;
    let messages = state
        .storage
        .get_history(id)
        .await?
        .into_iter()
        .map(|m| MessageView {
            role: m.role,
            content: m.content,
        })
        .collect();
    Ok(Json(messages))
}

/// Deletes a conversation and all of its messages.
#[utoipa::path(
    delete,
    path = "/conversations/{id}",
    tag = "conversations",
    params(("id" = i64, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Conversation deleted", body = DeleteResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown conversation", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn delete_conversation(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = path?;
    owned_conversation(&state, &identity, id).await?;
    state.storage.delete_conversation(id).await?;
    tracing::info!(conversation_id = id, user_id = %identity.user_id, "conversation deleted");
    Ok(Json(DeleteResponse {
        message: "Conversation deleted successfully".to_string(),
        conversation_id: id,
    }))
}
