use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== EXPORT ====================

/// One exported exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub timestamp: String,
    #[serde(rename = "user_id")]
    pub subject_id: String,
    #[serde(rename = "chat_id")]
    pub conversation_id: String,
    #[serde(rename = "user_message")]
    pub input_text: String,
    #[serde(rename = "ai_response")]
    pub output_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub timestamp: String,
    pub subject_id: String,
    pub conversation_id: String,
    pub input_excerpt: String,
    pub output_excerpt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// ==================== DASHBOARD ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStatistics {
    pub total_messages: u64,
    pub competency_evaluations: u64,
    pub active_users: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub avg_evaluation_time: String,
    pub top_competency: String,
    pub avg_message_length: String,
}
