//! Handle Message Use Case
//!
//! Entry point for one trainee turn: resolves (or creates) the session,
//! runs it through the conversation coordinator, and returns the tagged
//! messages produced. Sessions are kept in an in-memory registry; each one
//! is guarded by its own lock so turns on the same session serialize while
//! independent sessions proceed concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::coaching::{ConversationCoordinator, OutboundMessage, Session};
use crate::domain::foundation::SessionId;

/// Command to process one trainee utterance.
#[derive(Debug, Clone)]
pub struct HandleMessageCommand {
    /// Target session; `None` starts a new one.
    pub session_id: Option<SessionId>,
    /// The trainee utterance.
    pub content: String,
}

impl HandleMessageCommand {
    /// Creates a command for an existing session.
    pub fn new(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id),
            content: content.into(),
        }
    }

    /// Creates a command that opens a new session.
    pub fn new_session(content: impl Into<String>) -> Self {
        Self {
            session_id: None,
            content: content.into(),
        }
    }
}

/// Result of processing one trainee utterance.
#[derive(Debug, Clone)]
pub struct HandleMessageResponse {
    /// The session the turn ran against (newly created if none was given).
    pub session_id: SessionId,
    /// Tagged messages, in emission order.
    pub messages: Vec<OutboundMessage>,
}

/// Errors from the handle-message use case.
#[derive(Debug, thiserror::Error)]
pub enum HandleMessageError {
    /// The utterance was empty or whitespace-only.
    #[error("message content cannot be empty")]
    EmptyContent,
}

/// Handler for the handle-message use case.
pub struct HandleMessageHandler {
    coordinator: Arc<ConversationCoordinator>,
    sessions: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<Session>>>>,
}

impl HandleMessageHandler {
    /// Creates a handler with an empty session registry.
    pub fn new(coordinator: Arc<ConversationCoordinator>) -> Self {
        Self {
            coordinator,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Processes one trainee utterance.
    ///
    /// # Errors
    ///
    /// - `EmptyContent` if the utterance is empty or whitespace-only
    pub async fn handle(
        &self,
        command: HandleMessageCommand,
    ) -> Result<HandleMessageResponse, HandleMessageError> {
        if command.content.trim().is_empty() {
            return Err(HandleMessageError::EmptyContent);
        }

        let (session_id, session) = self.resolve_session(command.session_id);

        // Per-session lock: turns on one session serialize, other sessions
        // are untouched.
        let mut session = session.lock().await;
        let messages = self
            .coordinator
            .handle_message(&mut session, &command.content)
            .await;
        drop(session);

        tracing::info!(
            session_id = %session_id,
            messages = messages.len(),
            "trainee turn processed"
        );

        Ok(HandleMessageResponse {
            session_id,
            messages,
        })
    }

    /// Resets a session to its initial state, keeping its id.
    ///
    /// Unknown ids are a no-op; returns whether a session was reset.
    pub async fn reset_session(&self, session_id: SessionId) -> bool {
        let Some(session) = self.lookup(session_id) else {
            return false;
        };
        session.lock().await.reset();
        tracing::info!(session_id = %session_id, "session reset");
        true
    }

    /// Returns the number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .expect("session registry lock poisoned")
            .len()
    }

    fn resolve_session(
        &self,
        session_id: Option<SessionId>,
    ) -> (SessionId, Arc<tokio::sync::Mutex<Session>>) {
        let mut registry = self
            .sessions
            .lock()
            .expect("session registry lock poisoned");

        match session_id {
            Some(id) => {
                let session = registry
                    .entry(id)
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Session::new())))
                    .clone();
                (id, session)
            }
            None => {
                let session = Session::new();
                let id = session.id();
                let session = Arc::new(tokio::sync::Mutex::new(session));
                registry.insert(id, session.clone());
                (id, session)
            }
        }
    }

    fn lookup(&self, session_id: SessionId) -> Option<Arc<tokio::sync::Mutex<Session>>> {
        self.sessions
            .lock()
            .expect("session registry lock poisoned")
            .get(&session_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockEngine;
    use crate::domain::coaching::Speaker;

    fn handler() -> HandleMessageHandler {
        let engine = MockEngine::new();
        HandleMessageHandler::new(Arc::new(ConversationCoordinator::new(Arc::new(engine))))
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let handler = handler();
        let err = handler
            .handle(HandleMessageCommand::new_session("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, HandleMessageError::EmptyContent));
        assert_eq!(handler.session_count(), 0);
    }

    #[tokio::test]
    async fn new_session_is_created_and_reused() {
        let handler = handler();

        let first = handler
            .handle(HandleMessageCommand::new_session("你好"))
            .await
            .unwrap();
        assert_eq!(handler.session_count(), 1);
        assert_eq!(first.messages.len(), 1);
        assert_eq!(first.messages[0].speaker, Speaker::System);

        let second = handler
            .handle(HandleMessageCommand::new(first.session_id, "你好"))
            .await
            .unwrap();
        assert_eq!(second.session_id, first.session_id);
        assert_eq!(handler.session_count(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let handler = handler();

        let a = handler
            .handle(HandleMessageCommand::new_session("你好"))
            .await
            .unwrap();
        let b = handler
            .handle(HandleMessageCommand::new_session("你好"))
            .await
            .unwrap();

        assert_ne!(a.session_id, b.session_id);
        assert_eq!(handler.session_count(), 2);
    }

    #[tokio::test]
    async fn reset_known_session_succeeds() {
        let handler = handler();
        let response = handler
            .handle(HandleMessageCommand::new_session("你好"))
            .await
            .unwrap();

        assert!(handler.reset_session(response.session_id).await);
        assert!(!handler.reset_session(SessionId::new()).await);
    }
}
