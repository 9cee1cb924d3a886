use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use rai_advising::admin::{
    self, default_range, export::BOM, records_from_history, AdminPanel, ExportError,
};
use rai_advising::auth::Identity;
use rai_advising::models::internal::{Conversation, ConversationId, ConversationIndex, Turn};
use rai_advising::services::variant::EVALUATION_FAILURE;
use std::time::Duration;

fn panel() -> AdminPanel {
    AdminPanel::new(Identity::mock_faculty(), Duration::ZERO)
}

#[tokio::test]
async fn test_dashboard_figures() {
    let panel = panel();
    let stats = panel.usage_statistics().await;
    assert_eq!(stats.total_messages, 234);
    assert_eq!(stats.competency_evaluations, 87);
    assert_eq!(stats.active_users, 42);

    let analytics = panel.analytics().await;
    assert_eq!(analytics.avg_evaluation_time, "2分15秒");
    assert_eq!(analytics.top_competency, "共感力");
    assert_eq!(analytics.avg_message_length, "186文字");
}

#[tokio::test]
async fn test_fetch_requires_both_bounds() {
    let panel = panel();
    let now = Utc::now();

    assert!(matches!(
        panel.fetch_records(None, Some(now)).await,
        Err(ExportError::MissingRange)
    ));
    assert!(matches!(
        panel.fetch_records(Some(now), None).await,
        Err(ExportError::MissingRange)
    ));
    assert!(matches!(
        panel
            .fetch_records(Some(now), Some(now - ChronoDuration::days(1)))
            .await,
        Err(ExportError::InvertedRange { .. })
    ));
}

#[tokio::test]
async fn test_fetch_returns_mock_records_for_any_valid_range() {
    let range = default_range(Utc::now());
    let records = panel()
        .fetch_records(Some(range.start), Some(range.end))
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].subject_id, "student001");
    assert_eq!(records, admin::mock_records());
}

#[test]
fn test_default_range_spans_a_week() {
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let range = default_range(now);
    assert_eq!(range.end, now);
    assert_eq!(range.end - range.start, ChronoDuration::days(7));
}

#[test]
fn test_preview_truncates_long_texts() {
    let rows = admin::preview(&admin::mock_records());

    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert!(row.input_excerpt.chars().count() <= 53);
        assert!(row.output_excerpt.ends_with("..."));
    }
}

#[test]
fn test_records_from_history_pairs_evaluations() {
    let mut conv = Conversation::new(ConversationId::from("chat_1_abc"));
    conv.push_turn(Turn::user("雑談", false));
    conv.push_turn(Turn::assistant("返事", false));
    conv.push_turn(Turn::user("評価して", true));
    conv.push_turn(Turn::assistant("評価結果", true));
    let index = ConversationIndex::new(vec![conv]);

    let records = records_from_history(&index, "student001");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].conversation_id, "chat_1_abc");
    assert_eq!(records[0].input_text, "評価して");
    assert_eq!(records[0].output_text, "評価結果");
}

#[test]
fn test_records_from_history_skips_failed_evaluations() {
    let mut conv = Conversation::new(ConversationId::from("chat_2_def"));
    conv.push_turn(Turn::user("評価して", true));
    conv.push_turn(Turn::assistant(EVALUATION_FAILURE, false));
    conv.push_turn(Turn::user("もう一度評価して", true));
    conv.push_turn(Turn::assistant("評価結果", true));
    let index = ConversationIndex::new(vec![conv]);

    let records = records_from_history(&index, "student001");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].input_text, "もう一度評価して");
    assert!(records.iter().all(|r| r.output_text != EVALUATION_FAILURE));
}

#[tokio::test]
async fn test_export_writes_named_csv() {
    let dir = tempfile::tempdir().unwrap();
    let range = default_range(Utc::now());
    let today = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();

    let path = panel()
        .export(Some(range.start), Some(range.end), dir.path(), today)
        .await
        .unwrap();

    assert!(path.ends_with("competency_evaluation_2024-01-16.csv"));
    let csv = std::fs::read_to_string(path).unwrap();
    assert!(csv.starts_with(BOM));
    assert!(csv.contains("\"chat_002_def456\""));
}
