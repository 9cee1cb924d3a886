use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::models::internal::{Conversation, ConversationId, ConversationIndex, Turn};
use crate::storage::local::{LocalStorage, StorageError};

// ============================================
// SNAPSHOT I/O
// ============================================

/// Reads the persisted index under `key`.
///
/// Nothing stored and a malformed payload both yield an empty index.
pub fn load_index(storage: &dyn LocalStorage, key: &str) -> ConversationIndex {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return ConversationIndex::default(),
        Err(e) => {
            tracing::warn!("Could not read history '{}': {}", key, e);
            return ConversationIndex::default();
        }
    };

    match serde_json::from_str::<ConversationIndex>(&raw) {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!("Discarding malformed history '{}': {}", key, e);
            ConversationIndex::default()
        }
    }
}

pub fn save_index(
    storage: &mut dyn LocalStorage,
    key: &str,
    index: &ConversationIndex,
) -> Result<(), StorageError> {
    let payload = serde_json::to_string(index)?;
    storage.set_item(key, &payload)
}

// ============================================
// CONVERSATION STORE
// ============================================

/// Ordered conversation history plus the one "current" conversation.
///
/// Every mutation writes the full index back to storage. The current
/// conversation joins the index with its first turn.
pub struct ConversationStore {
    storage: Box<dyn LocalStorage>,
    key: String,
    id_prefix: String,
    index: ConversationIndex,
    current: Conversation,
    rng: StdRng,
}

impl ConversationStore {
    pub fn open(storage: Box<dyn LocalStorage>, key: &str, id_prefix: &str) -> Self {
        Self::with_rng(storage, key, id_prefix, StdRng::from_entropy())
    }

    pub fn with_rng(
        storage: Box<dyn LocalStorage>,
        key: &str,
        id_prefix: &str,
        mut rng: StdRng,
    ) -> Self {
        let index = load_index(storage.as_ref(), key);
        let current = Conversation::new(ConversationId::generate(id_prefix, Utc::now(), &mut rng));
        tracing::info!("Loaded {} conversations from '{}'", index.len(), key);

        Self {
            storage,
            key: key.to_string(),
            id_prefix: id_prefix.to_string(),
            index,
            current,
            rng,
        }
    }

    /// Starts a fresh conversation and makes it current.
    pub fn create_conversation(&mut self) -> &Conversation {
        let id = ConversationId::generate(&self.id_prefix, Utc::now(), &mut self.rng);
        tracing::debug!("New conversation {}", id);
        self.current = Conversation::new(id);
        &self.current
    }

    /// Appends `turn` to the conversation `id`.
    ///
    /// A conversation seen for the first time is inserted at the front of the
    /// index; a known one is replaced in place. Returns `false` and changes
    /// nothing when `id` resolves to neither the current conversation nor an
    /// indexed one.
    pub fn append_turn(&mut self, id: &ConversationId, turn: Turn) -> Result<bool, StorageError> {
        if &self.current.id == id {
            self.current.push_turn(turn);
            match self.index.get_mut(id) {
                Some(entry) => *entry = self.current.clone(),
                None => self.index.push_front(self.current.clone()),
            }
        } else if let Some(entry) = self.index.get_mut(id) {
            entry.push_turn(turn);
        } else {
            tracing::warn!("Dropping turn for unknown conversation {}", id);
            return Ok(false);
        }

        self.persist()?;
        Ok(true)
    }

    /// Re-reads the persisted index, replacing the in-memory copy.
    pub fn load_all(&mut self) -> &ConversationIndex {
        self.index = load_index(self.storage.as_ref(), &self.key);
        if let Some(stored) = self.index.get(&self.current.id) {
            self.current = stored.clone();
        }
        &self.index
    }

    /// Makes an indexed conversation current.
    pub fn open_conversation(&mut self, id: &ConversationId) -> Option<&Conversation> {
        let stored = self.index.get(id)?.clone();
        self.current = stored;
        Some(&self.current)
    }

    /// Removes one conversation. Deleting the current conversation starts a
    /// new one; deleting an unknown id changes nothing.
    pub fn delete(&mut self, id: &ConversationId) -> Result<bool, StorageError> {
        if self.index.remove(id).is_none() {
            return Ok(false);
        }
        self.persist()?;
        tracing::info!("Deleted conversation {}", id);

        if &self.current.id == id {
            self.create_conversation();
        }
        Ok(true)
    }

    /// Drops the whole history and starts a new conversation.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.index.clear();
        self.storage.remove_item(&self.key)?;
        self.create_conversation();
        tracing::info!("Cleared history '{}'", self.key);
        Ok(())
    }

    pub fn current(&self) -> &Conversation {
        &self.current
    }

    pub fn current_id(&self) -> &ConversationId {
        &self.current.id
    }

    pub fn index(&self) -> &ConversationIndex {
        &self.index
    }

    pub fn get_storage(&mut self) -> &mut dyn LocalStorage {
        self.storage.as_mut()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        save_index(self.storage.as_mut(), &self.key, &self.index)
    }
}
