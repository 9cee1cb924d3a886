pub mod internal;

pub use internal::{Conversation, ConversationId, ConversationIndex, Sender, Turn};
