pub mod local;
pub mod repository;

pub use local::{FileStorage, LocalStorage, MemoryStorage, StorageError};
pub use repository::{load_index, save_index, ConversationStore};
