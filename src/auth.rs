//! Identity stub. Nothing here verifies anyone: a stored identity is trusted
//! as-is and a missing one is replaced by a fixed mock user.

use serde::{Deserialize, Serialize};

use crate::services::variant::{IdentityMode, VariantProfile};
use crate::storage::local::{LocalStorage, StorageError};

pub const USER_KEY: &str = "rai_user";
pub const ADMIN_TOKEN_KEY: &str = "admin_token";
pub const MOCK_FACULTY_TOKEN: &str = "mock-faculty-token";
pub const ANONYMOUS_LABEL: &str = "スタンドアロンユーザー";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn mock_student() -> Self {
        Self {
            id: "student001".to_string(),
            name: "田中 太郎".to_string(),
            email: "tanaka@st.ritsumei.ac.jp".to_string(),
            role: Role::Student,
        }
    }

    pub fn mock_faculty() -> Self {
        Self {
            id: "professor001".to_string(),
            name: "中島 教授".to_string(),
            email: "professor@fc.ritsumei.ac.jp".to_string(),
            role: Role::Faculty,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}さん", self.name)
    }
}

/// Returns the stored student, storing the mock student when none (or an
/// unreadable one) is present.
pub fn resolve_student(storage: &mut dyn LocalStorage) -> Result<Identity, StorageError> {
    if let Some(raw) = storage.get_item(USER_KEY)? {
        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => return Ok(identity),
            Err(e) => tracing::warn!("Ignoring unreadable stored identity: {}", e),
        }
    }

    let identity = Identity::mock_student();
    storage.set_item(USER_KEY, &serde_json::to_string(&identity)?)?;
    tracing::info!("Signed in mock user {}", identity.id);
    Ok(identity)
}

/// The faculty panel only checks that a token exists; the mock token is
/// issued on first use.
pub fn resolve_faculty(storage: &mut dyn LocalStorage) -> Result<Identity, StorageError> {
    if storage.get_item(ADMIN_TOKEN_KEY)?.is_none() {
        tracing::info!("No faculty token present, issuing mock token");
        storage.set_item(ADMIN_TOKEN_KEY, MOCK_FACULTY_TOKEN)?;
    }
    Ok(Identity::mock_faculty())
}

/// Header label for the chat screen.
pub fn header_label(
    storage: &mut dyn LocalStorage,
    profile: &VariantProfile,
) -> Result<String, StorageError> {
    match profile.identity {
        IdentityMode::MockStudent => Ok(resolve_student(storage)?.display_name()),
        IdentityMode::Anonymous => Ok(ANONYMOUS_LABEL.to_string()),
    }
}

/// Forgets the signed-in student along with the variant's chat history.
pub fn logout(
    storage: &mut dyn LocalStorage,
    profile: &VariantProfile,
) -> Result<(), StorageError> {
    if profile.identity == IdentityMode::MockStudent {
        storage.remove_item(USER_KEY)?;
    }
    storage.remove_item(profile.storage_key)?;
    tracing::info!("Logged out ({})", profile.variant);
    Ok(())
}

pub fn logout_faculty(storage: &mut dyn LocalStorage) -> Result<(), StorageError> {
    storage.remove_item(ADMIN_TOKEN_KEY)
}
