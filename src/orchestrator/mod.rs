//! Chat session: ties the conversation store to a responder and keeps the
//! small amount of UI state (loading flag, header label) explicit.

pub mod input;

use std::sync::Arc;

use crate::auth;
use crate::models::internal::{Conversation, ConversationId, Turn};
use crate::services::responder::{Responder, ResponderError};
use crate::services::response_generator::Mode;
use crate::services::variant::{IdentityMode, VariantProfile};
use crate::storage::local::StorageError;
use crate::storage::repository::ConversationStore;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Message has {length} characters, limit is {limit}")]
    MessageTooLong { length: usize, limit: usize },
    #[error("A reply is still pending")]
    Busy,
    #[error("History cannot be deleted in this variant")]
    DeleteNotAllowed,
    #[error("Conversation not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// UI state that is not part of the conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub loading: bool,
    pub user_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    pub conversation_id: ConversationId,
    pub reply: String,
    /// True when the reply is the static failure message.
    pub failed: bool,
}

/// A sent message whose reply has not been stored yet.
///
/// Holding one keeps the orchestrator in its loading state; hand it back to
/// [`ChatOrchestrator::complete_send`] with the responder's result.
pub struct PendingReply {
    conversation_id: ConversationId,
    text: String,
    mode: Mode,
    responder: Arc<dyn Responder>,
}

impl PendingReply {
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Waits for the responder. Does not touch the orchestrator.
    pub async fn reply(&self) -> Result<String, ResponderError> {
        self.responder.respond(&self.text, self.mode).await
    }
}

pub struct ChatOrchestrator {
    store: ConversationStore,
    responder: Arc<dyn Responder>,
    profile: VariantProfile,
    max_message_length: usize,
    state: AppState,
}

impl ChatOrchestrator {
    pub fn new(
        store: ConversationStore,
        responder: Arc<dyn Responder>,
        profile: VariantProfile,
        max_message_length: usize,
    ) -> Self {
        Self {
            store,
            responder,
            profile,
            max_message_length,
            state: AppState::default(),
        }
    }

    pub fn with_user_label(mut self, label: impl Into<String>) -> Self {
        self.state.user_label = label.into();
        self
    }

    /// Sends one message and waits for the reply.
    pub async fn send(&mut self, text: &str, mode: Mode) -> Result<SendOutcome, ChatError> {
        let pending = self.begin_send(text, mode)?;
        let result = pending.reply().await;
        self.complete_send(pending, result)
    }

    /// Validates and stores the user turn, then enters the loading state.
    ///
    /// The reply will be appended to the conversation that is current now,
    /// even if another one is opened before [`Self::complete_send`].
    pub fn begin_send(&mut self, text: &str, mode: Mode) -> Result<PendingReply, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.state.loading {
            return Err(ChatError::Busy);
        }
        let length = input::char_count(text);
        if length > self.max_message_length {
            return Err(ChatError::MessageTooLong {
                length,
                limit: self.max_message_length,
            });
        }

        let target = self.store.current_id().clone();
        self.store
            .append_turn(&target, Turn::user(text, mode.is_evaluation()))?;
        self.state.loading = true;
        tracing::debug!("Awaiting {:?} reply for {}", mode, target);

        Ok(PendingReply {
            conversation_id: target,
            text: text.to_string(),
            mode,
            responder: Arc::clone(&self.responder),
        })
    }

    /// Leaves the loading state and stores the reply, or the variant's static
    /// failure message when the responder failed.
    pub fn complete_send(
        &mut self,
        pending: PendingReply,
        result: Result<String, ResponderError>,
    ) -> Result<SendOutcome, ChatError> {
        self.state.loading = false;
        let PendingReply {
            conversation_id: target,
            mode,
            ..
        } = pending;

        match result {
            Ok(reply) => {
                self.store
                    .append_turn(&target, Turn::assistant(reply.clone(), mode.is_evaluation()))?;
                tracing::info!("Reply stored for {} ({:?})", target, mode);
                Ok(SendOutcome {
                    conversation_id: target,
                    reply,
                    failed: false,
                })
            }
            Err(e) => {
                tracing::error!("Reply generation failed for {}: {}", target, e);
                let message = match mode {
                    Mode::Evaluation => self.profile.evaluation_failure,
                    Mode::Plain => self.profile.generic_failure,
                };
                self.store
                    .append_turn(&target, Turn::assistant(message, false))?;
                Ok(SendOutcome {
                    conversation_id: target,
                    reply: message.to_string(),
                    failed: true,
                })
            }
        }
    }

    pub fn new_chat(&mut self) -> &Conversation {
        self.store.create_conversation()
    }

    pub fn open(&mut self, id: &ConversationId) -> Result<&Conversation, ChatError> {
        if self.store.index().get(id).is_none() {
            tracing::warn!("Cannot open unknown conversation {}", id);
            return Err(ChatError::NotFound(id.to_string()));
        }
        self.store
            .open_conversation(id)
            .ok_or_else(|| ChatError::NotFound(id.to_string()))
    }

    /// Returns `false` when the id was not in the history.
    pub fn delete(&mut self, id: &ConversationId) -> Result<bool, ChatError> {
        if !self.profile.deletable_history {
            return Err(ChatError::DeleteNotAllowed);
        }
        Ok(self.store.delete(id)?)
    }

    pub fn clear_all(&mut self) -> Result<(), ChatError> {
        Ok(self.store.clear()?)
    }

    /// Forgets the user and the history. The header falls back to the
    /// anonymous label, or to nothing when the variant signs users in.
    pub fn logout(&mut self) -> Result<(), ChatError> {
        auth::logout(self.store.get_storage(), &self.profile)?;
        self.store.load_all();
        self.store.create_conversation();
        self.state.user_label = match self.profile.identity {
            IdentityMode::Anonymous => auth::ANONYMOUS_LABEL.to_string(),
            IdentityMode::MockStudent => String::new(),
        };
        Ok(())
    }

    /// Whether the send buttons should be enabled for `draft`.
    pub fn can_send(&self, draft: &str) -> bool {
        input::has_text(draft) && !self.state.loading
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn profile(&self) -> &VariantProfile {
        &self.profile
    }
}
