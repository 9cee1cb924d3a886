//! Faculty panel: dashboard figures, record preview and CSV export. All
//! figures and records are fixed mock data.

pub mod dto;
pub mod export;

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Identity;
use crate::models::internal::{truncate_with_ellipsis, ConversationIndex, Sender};
use dto::{Analytics, DateRange, ExportRecord, PreviewRow, UsageStatistics};

pub const EXCERPT_MAX_CHARS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("開始日時と終了日時を選択してください")]
    MissingRange,
    #[error("Start {start} is after end {end}")]
    InvertedRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct AdminPanel {
    user: Identity,
    delay: Duration,
}

impl AdminPanel {
    pub fn new(user: Identity, delay: Duration) -> Self {
        Self { user, delay }
    }

    pub fn user(&self) -> &Identity {
        &self.user
    }

    pub async fn usage_statistics(&self) -> UsageStatistics {
        self.simulate_latency(self.delay.mul_f32(2.0 / 3.0)).await;
        UsageStatistics {
            total_messages: 234,
            competency_evaluations: 87,
            active_users: 42,
            updated_at: Utc::now(),
        }
    }

    pub async fn analytics(&self) -> Analytics {
        self.simulate_latency(self.delay.mul_f32(2.0 / 3.0)).await;
        Analytics {
            avg_evaluation_time: "2分15秒".to_string(),
            top_competency: "共感力".to_string(),
            avg_message_length: "186文字".to_string(),
        }
    }

    /// The mock record set; the range is validated but does not filter.
    pub async fn fetch_records(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<ExportRecord>, ExportError> {
        let range = validate_range(start, end)?;
        tracing::debug!("Fetching records {} .. {}", range.start, range.end);
        self.simulate_latency(self.delay).await;
        Ok(mock_records())
    }

    pub async fn export(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        dir: &Path,
        today: NaiveDate,
    ) -> Result<PathBuf, ExportError> {
        let records = self.fetch_records(start, end).await?;
        Ok(export::write_csv(dir, &records, today)?)
    }

    async fn simulate_latency(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Last seven days up to `now`.
pub fn default_range(now: DateTime<Utc>) -> DateRange {
    DateRange {
        start: now - ChronoDuration::days(7),
        end: now,
    }
}

pub fn validate_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<DateRange, ExportError> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ExportError::MissingRange),
    };
    if start > end {
        return Err(ExportError::InvertedRange { start, end });
    }
    Ok(DateRange { start, end })
}

/// One record per evaluation exchange in the local history: an evaluation
/// user turn followed by the assistant's evaluation. Failure turns are not
/// evaluations and are skipped.
pub fn records_from_history(index: &ConversationIndex, subject_id: &str) -> Vec<ExportRecord> {
    let mut records = Vec::new();
    for conversation in index.iter() {
        for pair in conversation.turns.windows(2) {
            let (question, answer) = (&pair[0], &pair[1]);
            if question.sender == Sender::User
                && question.is_evaluation
                && answer.sender == Sender::Assistant
                && answer.is_evaluation
            {
                records.push(ExportRecord {
                    timestamp: question.created_at.to_rfc3339(),
                    subject_id: subject_id.to_string(),
                    conversation_id: conversation.id.to_string(),
                    input_text: question.text.clone(),
                    output_text: answer.text.clone(),
                });
            }
        }
    }
    records
}

pub fn preview(records: &[ExportRecord]) -> Vec<PreviewRow> {
    records
        .iter()
        .map(|r| PreviewRow {
            timestamp: r.timestamp.clone(),
            subject_id: r.subject_id.clone(),
            conversation_id: r.conversation_id.clone(),
            input_excerpt: truncate_with_ellipsis(&r.input_text, EXCERPT_MAX_CHARS),
            output_excerpt: truncate_with_ellipsis(&r.output_text, EXCERPT_MAX_CHARS),
        })
        .collect()
}

pub fn mock_records() -> Vec<ExportRecord> {
    vec![
        ExportRecord {
            timestamp: "2024-01-15T10:30:00Z".to_string(),
            subject_id: "student001".to_string(),
            conversation_id: "chat_001_abc123".to_string(),
            input_text: "ピアサポートの授業でグループワークを通じて、相手の話をじっくり聞くことの大切さを学びました。特に、相手の気持ちに寄り添うことで、より良いコミュニケーションができることを実感しました。".to_string(),
            output_text: "【コンピテンシー評価結果】\n\n◆ 共感力 ★★★★☆ (4/5)\n◆ チームワーク ★★★★☆ (4/5)\n\n【総評】\nグループワークでの傾聴体験から、相手理解の重要性を深く学ばれています。共感力とチームワークが特に高く評価されます。".to_string(),
        },
        ExportRecord {
            timestamp: "2024-01-14T14:20:00Z".to_string(),
            subject_id: "student002".to_string(),
            conversation_id: "chat_002_def456".to_string(),
            input_text: "今日のロールプレイで初めて相談者役をやってみて、話すことの難しさを感じました。でも、それと同時に話を聞いてもらえることの安心感も理解できました。".to_string(),
            output_text: "【コンピテンシー評価結果】\n\n◆ 自己効力感 ★★★☆☆ (3/5)\n◆ 理解力 ★★★★☆ (4/5)\n◆ しなやかさ ★★★★☆ (4/5)\n\n【総評】\n新しい体験から多角的な学びを得られており、特に理解力としなやかさが発揮されています。".to_string(),
        },
        ExportRecord {
            timestamp: "2024-01-13T16:45:00Z".to_string(),
            subject_id: "student003".to_string(),
            conversation_id: "chat_003_ghi789".to_string(),
            input_text: "グループディスカッションで他の人の異なる意見を聞いて、自分の考え方が狭かったことに気づきました。多様な視点を受け入れることの重要性を学びました。".to_string(),
            output_text: "【コンピテンシー評価結果】\n\n◆ 変革力 ★★★★★ (5/5)\n◆ 共感力 ★★★★☆ (4/5)\n\n【総評】\n多様な視点への開放性と自己省察力が優秀です。変革力が特に高く評価され、継続的な成長が期待されます。".to_string(),
        },
    ]
}
