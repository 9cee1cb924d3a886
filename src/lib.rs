//! R-AI - competency evaluation chat mockup

pub mod admin;
pub mod auth;
pub mod config;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod storage;

// Re-export main types for convenience
pub use crate::admin::AdminPanel;
pub use crate::config::Config;
pub use crate::models::internal::{Conversation, ConversationId, ConversationIndex, Sender, Turn};
pub use crate::orchestrator::{AppState, ChatError, ChatOrchestrator, PendingReply, SendOutcome};
pub use crate::services::{MockResponder, Mode, Responder, ResponseGenerator, Variant};
pub use crate::storage::{ConversationStore, FileStorage, LocalStorage, MemoryStorage};
