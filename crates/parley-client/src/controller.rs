// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state controller.
//!
//! Holds what a chat UI renders: the visible messages, the active
//! conversation, the in-flight flag, and the last fetched conversation list.
//! State changes happen under a [`tokio::sync::Mutex`] that is released
//! before every backend call, so concurrent callers observe `pending` while a
//! send is in flight.

use std::sync::Arc;

use parley_core::{ConversationSummary, Message, Role};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::backend::ChatBackend;
use crate::error::ClientError;

/// Reply shown in place of the assistant's answer when a send fails.
pub const DEFAULT_FALLBACK: &str = "Sorry, something went wrong. Please try again.";

/// Controller settings supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Assistant text appended when the backend call fails.
    pub fallback_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK.to_string(),
        }
    }
}

/// One rendered chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
}

impl ChatEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<Message> for ChatEntry {
    fn from(message: Message) -> Self {
        Self {
            role: message.role,
            content: message.content,
        }
    }
}

/// Snapshot of the controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub messages: Vec<ChatEntry>,
    pub active_conversation_id: Option<i64>,
    pub pending: bool,
    pub conversations: Vec<ConversationSummary>,
    /// Bumped whenever the visible thread is replaced, so a reply that
    /// arrives for a thread the user already left is dropped.
    view: u64,
}

impl ControllerState {
    fn reset_view(&mut self, active: Option<i64>, messages: Vec<ChatEntry>) {
        self.messages = messages;
        self.active_conversation_id = active;
        self.view = self.view.wrapping_add(1);
    }
}

/// Drives a chat UI against a [`ChatBackend`].
pub struct ConversationController<B: ChatBackend> {
    backend: Arc<B>,
    config: ClientConfig,
    state: Mutex<ControllerState>,
}

impl<B: ChatBackend> ConversationController<B> {
    pub fn new(backend: Arc<B>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    /// Sends `text` in the active conversation.
    ///
    /// The user entry is shown immediately. On success the reply is appended
    /// and the returned conversation id becomes active. On failure the
    /// fallback reply is appended and the backend error is returned.
    pub async fn send_message(&self, text: &str) -> Result<(), ClientError> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let (conversation_id, view) = {
            let mut state = self.state.lock().await;
            if state.pending {
                return Err(ClientError::Busy);
            }
            state.pending = true;
            state.messages.push(ChatEntry::user(text));
            (state.active_conversation_id, state.view)
        };

        let result = self.backend.send_message(text, conversation_id).await;

        let mut state = self.state.lock().await;
        state.pending = false;
        let same_view = state.view == view;

        match result {
            Ok(reply) => {
                if same_view {
                    state.messages.push(ChatEntry::assistant(reply.response));
                    if state.active_conversation_id != Some(reply.conversation_id) {
                        tracing::debug!(
                            conversation_id = reply.conversation_id,
                            "adopting conversation id"
                        );
                        state.active_conversation_id = Some(reply.conversation_id);
                    }
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "send failed, showing fallback reply");
                if same_view {
                    state
                        .messages
                        .push(ChatEntry::assistant(self.config.fallback_message.clone()));
                }
                Err(e)
            }
        }
    }

    /// Loads `summary`'s full history and makes it the active conversation.
    pub async fn select_conversation(
        &self,
        summary: &ConversationSummary,
    ) -> Result<(), ClientError> {
        let detail = self.backend.fetch_conversation(summary.id).await?;
        let messages = detail.messages.into_iter().map(ChatEntry::from).collect();
        self.state
            .lock()
            .await
            .reset_view(Some(detail.conversation.id), messages);
        Ok(())
    }

    /// Deletes conversation `id` on the server, then forgets it locally.
    pub async fn delete_conversation(&self, id: i64) -> Result<(), ClientError> {
        self.backend.delete_conversation(id).await?;
        let mut state = self.state.lock().await;
        if state.active_conversation_id == Some(id) {
            state.reset_view(None, Vec::new());
        }
        state.conversations.retain(|c| c.id != id);
        Ok(())
    }

    /// Clears the visible thread so the next send starts a new conversation.
    pub async fn start_new(&self) {
        self.state.lock().await.reset_view(None, Vec::new());
    }

    /// Fetches the conversation list and caches it.
    pub async fn refresh_conversations(&self) -> Result<Vec<ConversationSummary>, ClientError> {
        let conversations = self.backend.list_conversations().await?;
        self.state.lock().await.conversations = conversations.clone();
        Ok(conversations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ChatReply;
    use async_trait::async_trait;
    use parley_core::{Conversation, ConversationDetail};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// In-memory backend. Conversation ids start at 1.
    #[derive(Default)]
    struct FakeBackend {
        conversations: std::sync::Mutex<Vec<(i64, Vec<Message>)>>,
        fail_sends: std::sync::atomic::AtomicBool,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }

        fn message(conversation_id: i64, id: i64, role: Role, content: &str) -> Message {
            Message {
                id,
                conversation_id,
                role,
                content: content.to_string(),
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
            }
        }

        fn summary(id: i64) -> ConversationSummary {
            ConversationSummary {
                id,
                user_id: "alice".into(),
                created_at: "2026-01-01T00:00:00.000Z".into(),
                message_count: 0,
                last_message_at: None,
                preview: String::new(),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn send_message(
            &self,
            message: &str,
            conversation_id: Option<i64>,
        ) -> Result<ChatReply, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_sends.load(Ordering::SeqCst) {
                return Err(ClientError::Backend("connection refused".into()));
            }
            let mut conversations = self.conversations.lock().unwrap();
            let id = match conversation_id {
                Some(id) => id,
                None => {
                    let id = conversations.len() as i64 + 1;
                    conversations.push((id, Vec::new()));
                    id
                }
            };
            let reply = format!("echo: {message}");
            let Some((_, messages)) = conversations.iter_mut().find(|(cid, _)| *cid == id) else {
                return Err(ClientError::Rejected {
                    status: 404,
                    message: format!("conversation {id} not found"),
                });
            };
            let next = messages.len() as i64;
            messages.push(Self::message(id, next + 1, Role::User, message));
            messages.push(Self::message(id, next + 2, Role::Assistant, &reply));
            Ok(ChatReply {
                response: reply,
                conversation_id: id,
            })
        }

        async fn fetch_conversation(&self, id: i64) -> Result<ConversationDetail, ClientError> {
            let conversations = self.conversations.lock().unwrap();
            let (_, messages) = conversations
                .iter()
                .find(|(cid, _)| *cid == id)
                .ok_or(ClientError::Rejected {
                    status: 404,
                    message: "not found".into(),
                })?;
            Ok(ConversationDetail {
                conversation: Conversation {
                    id,
                    user_id: "alice".into(),
                    created_at: "2026-01-01T00:00:00.000Z".into(),
                },
                messages: messages.clone(),
            })
        }

        async fn delete_conversation(&self, id: i64) -> Result<(), ClientError> {
            let mut conversations = self.conversations.lock().unwrap();
            let before = conversations.len();
            conversations.retain(|(cid, _)| *cid != id);
            if conversations.len() == before {
                return Err(ClientError::Rejected {
                    status: 404,
                    message: "not found".into(),
                });
            }
            Ok(())
        }

        async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ClientError> {
            Ok(self
                .conversations
                .lock()
                .unwrap()
                .iter()
                .map(|(id, _)| Self::summary(*id))
                .collect())
        }
    }

    fn controller(backend: FakeBackend) -> ConversationController<FakeBackend> {
        ConversationController::new(Arc::new(backend), ClientConfig::default())
    }

    #[tokio::test]
    async fn empty_message_is_rejected_without_backend_call() {
        let ctl = controller(FakeBackend::default());
        assert!(matches!(
            ctl.send_message("  \n").await,
            Err(ClientError::EmptyMessage)
        ));
        assert_eq!(ctl.backend.calls.load(Ordering::SeqCst), 0);
        assert!(ctl.snapshot().await.messages.is_empty());
    }

    #[tokio::test]
    async fn send_appends_both_entries_and_adopts_id() {
        let ctl = controller(FakeBackend::default());
        ctl.send_message("hi").await.unwrap();

        let state = ctl.snapshot().await;
        assert_eq!(
            state.messages,
            vec![ChatEntry::user("hi"), ChatEntry::assistant("echo: hi")]
        );
        assert_eq!(state.active_conversation_id, Some(1));
        assert!(!state.pending);

        ctl.send_message("again").await.unwrap();
        let state = ctl.snapshot().await;
        assert_eq!(state.messages.len(), 4);
        assert_eq!(state.active_conversation_id, Some(1));
    }

    #[tokio::test]
    async fn failure_appends_fallback_and_clears_pending() {
        let backend = FakeBackend::default();
        backend.fail_sends.store(true, Ordering::SeqCst);
        let ctl = controller(backend);

        let err = ctl.send_message("hi").await.unwrap_err();
        assert!(matches!(err, ClientError::Backend(_)));

        let state = ctl.snapshot().await;
        assert_eq!(
            state.messages,
            vec![ChatEntry::user("hi"), ChatEntry::assistant(DEFAULT_FALLBACK)]
        );
        assert!(!state.pending);
        assert_eq!(state.active_conversation_id, None);
    }

    #[tokio::test]
    async fn custom_fallback_is_used() {
        let backend = FakeBackend::default();
        backend.fail_sends.store(true, Ordering::SeqCst);
        let ctl = ConversationController::new(
            Arc::new(backend),
            ClientConfig {
                fallback_message: "offline".into(),
            },
        );
        let _ = ctl.send_message("hi").await;
        assert_eq!(
            ctl.snapshot().await.messages.last(),
            Some(&ChatEntry::assistant("offline"))
        );
    }

    #[tokio::test]
    async fn second_send_while_pending_is_busy() {
        let gate = Arc::new(Notify::new());
        let ctl = Arc::new(controller(FakeBackend::gated(gate.clone())));

        let first = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.send_message("first").await }
        });

        // Wait until the first send is parked inside the backend.
        while ctl.backend.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(ctl.snapshot().await.pending);
        assert!(matches!(
            ctl.send_message("second").await,
            Err(ClientError::Busy)
        ));

        gate.notify_one();
        first.await.unwrap().unwrap();

        let state = ctl.snapshot().await;
        assert!(!state.pending);
        assert_eq!(
            state.messages,
            vec![ChatEntry::user("first"), ChatEntry::assistant("echo: first")]
        );
    }

    #[tokio::test]
    async fn reply_for_abandoned_thread_is_dropped() {
        let gate = Arc::new(Notify::new());
        let ctl = Arc::new(controller(FakeBackend::gated(gate.clone())));

        let send = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.send_message("hi").await }
        });
        while ctl.backend.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        ctl.start_new().await;
        gate.notify_one();
        send.await.unwrap().unwrap();

        let state = ctl.snapshot().await;
        assert!(state.messages.is_empty());
        assert_eq!(state.active_conversation_id, None);
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn select_replaces_messages_wholesale() {
        let ctl = controller(FakeBackend::default());
        ctl.send_message("one").await.unwrap();
        ctl.start_new().await;
        ctl.send_message("two").await.unwrap();
        assert_eq!(ctl.snapshot().await.active_conversation_id, Some(2));

        ctl.select_conversation(&FakeBackend::summary(1))
            .await
            .unwrap();
        let state = ctl.snapshot().await;
        assert_eq!(state.active_conversation_id, Some(1));
        assert_eq!(
            state.messages,
            vec![ChatEntry::user("one"), ChatEntry::assistant("echo: one")]
        );
    }

    #[tokio::test]
    async fn failed_select_keeps_current_view() {
        let ctl = controller(FakeBackend::default());
        ctl.send_message("hi").await.unwrap();
        let before = ctl.snapshot().await;

        let err = ctl
            .select_conversation(&FakeBackend::summary(42))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ctl.snapshot().await, before);
    }

    #[tokio::test]
    async fn start_new_clears_without_backend_call() {
        let ctl = controller(FakeBackend::default());
        ctl.send_message("hi").await.unwrap();
        let calls = ctl.backend.calls.load(Ordering::SeqCst);

        ctl.start_new().await;
        let state = ctl.snapshot().await;
        assert!(state.messages.is_empty());
        assert_eq!(state.active_conversation_id, None);
        assert_eq!(ctl.backend.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn deleting_active_conversation_clears_view_and_list() {
        let ctl = controller(FakeBackend::default());
        ctl.send_message("hi").await.unwrap();
        assert_eq!(ctl.refresh_conversations().await.unwrap().len(), 1);

        ctl.delete_conversation(1).await.unwrap();
        let state = ctl.snapshot().await;
        assert!(state.messages.is_empty());
        assert_eq!(state.active_conversation_id, None);
        assert!(state.conversations.is_empty());
    }

    #[tokio::test]
    async fn deleting_other_conversation_keeps_view() {
        let ctl = controller(FakeBackend::default());
        ctl.send_message("one").await.unwrap();
        ctl.start_new().await;
        ctl.send_message("two").await.unwrap();
        ctl.refresh_conversations().await.unwrap();

        ctl.delete_conversation(1).await.unwrap();
        let state = ctl.snapshot().await;
        assert_eq!(state.active_conversation_id, Some(2));
        assert_eq!(state.messages.len(), 2);
        assert_eq!(
            state.conversations.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[tokio::test]
    async fn failed_delete_changes_nothing() {
        let ctl = controller(FakeBackend::default());
        ctl.send_message("hi").await.unwrap();
        ctl.refresh_conversations().await.unwrap();
        let before = ctl.snapshot().await;

        assert!(ctl.delete_conversation(99).await.is_err());
        assert_eq!(ctl.snapshot().await, before);
    }
}
