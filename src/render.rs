//! Stateless projection of chat state into something a terminal can show.
//!
//! Re-running [`project`] from scratch is always safe; nothing here is cached.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;

use crate::models::internal::{Conversation, ConversationIndex, Sender};
use crate::orchestrator::input::{char_count, counter_level, has_text, CounterLevel};
use crate::orchestrator::AppState;
use crate::services::variant::VariantProfile;

pub const UNTITLED: &str = "新しいチャット";
pub const EMPTY_HISTORY: &str = "チャット履歴がありません";
pub const USER_EVALUATION_BADGE: &str = "コンピテンシー評価";
pub const ASSISTANT_EVALUATION_BADGE: &str = "コンピテンシー評価結果";
pub const WELCOME: &str = "こんにちは！R-AIです。\n授業の感想や学んだことを入力して、コンピテンシー評価を受けることができます。\n何でもお気軽にお話しください。";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub sender: Sender,
    pub text: String,
    pub time: String,
    pub badge: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntryView {
    pub id: String,
    pub title: String,
    pub timestamp: String,
    pub has_evaluation: bool,
    pub active: bool,
    pub deletable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterView {
    pub count: usize,
    pub level: CounterLevel,
    pub send_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub header: String,
    pub title: String,
    /// Shown instead of messages when the conversation has no turns.
    pub welcome: Option<String>,
    pub messages: Vec<MessageView>,
    pub history: Vec<HistoryEntryView>,
    pub counter: CounterView,
    pub loading: bool,
}

pub fn project(
    state: &AppState,
    index: &ConversationIndex,
    current: &Conversation,
    profile: &VariantProfile,
    draft: &str,
) -> ChatView {
    project_in(&Local, state, index, current, profile, draft)
}

/// Same as [`project`] with an explicit time zone for the displayed times.
pub fn project_in<Tz: TimeZone>(
    tz: &Tz,
    state: &AppState,
    index: &ConversationIndex,
    current: &Conversation,
    profile: &VariantProfile,
    draft: &str,
) -> ChatView
where
    Tz::Offset: fmt::Display,
{
    let title = if current.title.is_empty() {
        UNTITLED.to_string()
    } else {
        current.title.clone()
    };

    let welcome = current.turns.is_empty().then(|| match profile.welcome_note {
        Some(note) => format!("{}\n\n{}", WELCOME, note),
        None => WELCOME.to_string(),
    });

    let messages = current
        .turns
        .iter()
        .map(|turn| MessageView {
            sender: turn.sender,
            text: turn.text.clone(),
            time: clock(tz, &turn.created_at),
            badge: turn.is_evaluation.then_some(match turn.sender {
                Sender::User => USER_EVALUATION_BADGE,
                Sender::Assistant => ASSISTANT_EVALUATION_BADGE,
            }),
        })
        .collect();

    let history = index
        .iter()
        .map(|conv| HistoryEntryView {
            id: conv.id.to_string(),
            title: conv.title.clone(),
            timestamp: format!(
                "{} {}",
                conv.updated_at.with_timezone(tz).format("%Y/%-m/%-d"),
                clock(tz, &conv.updated_at)
            ),
            has_evaluation: conv.has_evaluation,
            active: conv.id == current.id,
            deletable: profile.deletable_history,
        })
        .collect();

    let count = char_count(draft);
    ChatView {
        header: state.user_label.clone(),
        title,
        welcome,
        messages,
        history,
        counter: CounterView {
            count,
            level: counter_level(count),
            send_enabled: has_text(draft) && !state.loading,
        },
        loading: state.loading,
    }
}

fn clock<Tz: TimeZone>(tz: &Tz, at: &DateTime<Utc>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.with_timezone(tz).format("%H:%M").to_string()
}

impl fmt::Display for ChatView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==  [{}]", self.title, self.header)?;

        writeln!(f, "-- 履歴 --")?;
        if self.history.is_empty() {
            writeln!(f, "  {}", EMPTY_HISTORY)?;
        }
        for entry in &self.history {
            writeln!(
                f,
                "{} {}{}  {}  ({}){}",
                if entry.active { ">" } else { " " },
                if entry.has_evaluation { "[評価] " } else { "" },
                entry.title,
                entry.timestamp,
                entry.id,
                if entry.deletable { "  [x]" } else { "" }
            )?;
        }

        writeln!(f, "-- チャット --")?;
        if let Some(ref welcome) = self.welcome {
            writeln!(f, "R-AI: {}", welcome)?;
        }
        for message in &self.messages {
            let who = match message.sender {
                Sender::User => "あなた",
                Sender::Assistant => "R-AI",
            };
            if let Some(badge) = message.badge {
                writeln!(f, "[{}]", badge)?;
            }
            writeln!(f, "{} ({}): {}", who, message.time, message.text)?;
        }

        if self.loading {
            writeln!(f, "...")?;
        }
        Ok(())
    }
}
