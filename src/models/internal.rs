use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters kept in a conversation title.
pub const TITLE_MAX_CHARS: usize = 30;
/// Maximum number of characters kept in the last-message preview.
pub const PREVIEW_MAX_CHARS: usize = 50;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

/// One message in a conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub text: String,
    pub sender: Sender,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "isCompetencyEvaluation", default)]
    pub is_evaluation: bool,
}

impl Turn {
    pub fn new(sender: Sender, text: impl Into<String>, is_evaluation: bool) -> Self {
        Self {
            text: text.into(),
            sender,
            created_at: Utc::now(),
            is_evaluation,
        }
    }

    pub fn user(text: impl Into<String>, is_evaluation: bool) -> Self {
        Self::new(Sender::User, text, is_evaluation)
    }

    pub fn assistant(text: impl Into<String>, is_evaluation: bool) -> Self {
        Self::new(Sender::Assistant, text, is_evaluation)
    }
}

/// Opaque conversation identifier: `<prefix><unix-millis>_<9 base36 chars>`.
///
/// Uniqueness is best-effort only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate<R: Rng + ?Sized>(prefix: &str, now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{}{}_{}", prefix, now.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    #[serde(rename = "lastMessage")]
    pub last_message_preview: String,
    #[serde(rename = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "messages")]
    pub turns: Vec<Turn>,
    #[serde(rename = "hasCompetencyEvaluation", default)]
    pub has_evaluation: bool,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            title: String::new(),
            last_message_preview: String::new(),
            updated_at: Utc::now(),
            turns: Vec::new(),
            has_evaluation: false,
        }
    }

    /// Appends a turn and re-derives title, preview, timestamp and the
    /// evaluation flag in one step.
    pub fn push_turn(&mut self, turn: Turn) {
        self.updated_at = turn.created_at;
        self.turns.push(turn);
        self.refresh_metadata();
    }

    fn refresh_metadata(&mut self) {
        if let Some(first_user) = self.turns.iter().find(|t| t.sender == Sender::User) {
            self.title = truncate_with_ellipsis(&first_user.text, TITLE_MAX_CHARS);
        }
        if let Some(last) = self.turns.last() {
            self.last_message_preview = truncate_with_ellipsis(&last.text, PREVIEW_MAX_CHARS);
        }
        self.has_evaluation = self.turns.iter().any(|t| t.is_evaluation);
    }
}

/// Newest-first list of conversations; the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationIndex(Vec<Conversation>);

impl ConversationIndex {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self(conversations)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.0.iter().find(|c| &c.id == id)
    }

    pub fn get_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.0.iter_mut().find(|c| &c.id == id)
    }

    pub fn push_front(&mut self, conversation: Conversation) {
        self.0.insert(0, conversation);
    }

    /// Removes the conversation with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: &ConversationId) -> Option<Conversation> {
        let pos = self.0.iter().position(|c| &c.id == id)?;
        Some(self.0.remove(pos))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Keeps the first `max` characters, appending `...` when anything was cut.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
