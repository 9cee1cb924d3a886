use super::{create_test_orchestrator, orchestrator_with, Arc, MockTestResponder};
use rai_advising::models::internal::{ConversationId, Sender};
use rai_advising::auth::ANONYMOUS_LABEL;
use rai_advising::orchestrator::ChatError;
use rai_advising::services::responder::ResponderError;
use rai_advising::services::variant::{BRIEF_FAILURE, EVALUATION_FAILURE, GENERIC_FAILURE};
use rai_advising::services::{Mode, Variant};

// ============================================
// Sending
// ============================================

#[tokio::test]
async fn test_plain_send_stores_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);

    let outcome = chat.send("  グループで話し合った  ", Mode::Plain).await.unwrap();

    assert!(!outcome.failed);
    let conv = chat.store().index().get(&outcome.conversation_id).unwrap();
    assert_eq!(conv.turns.len(), 2);
    assert_eq!(conv.turns[0].sender, Sender::User);
    assert_eq!(conv.turns[0].text, "グループで話し合った");
    assert_eq!(conv.turns[1].sender, Sender::Assistant);
    assert_eq!(conv.turns[1].text, outcome.reply);
    assert!(!conv.has_evaluation);
    assert!(!chat.state().loading);
}

#[tokio::test]
async fn test_evaluation_send_flags_both_turns() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Basic);

    let outcome = chat
        .send("ロールプレイで相談者役をやってみた", Mode::Evaluation)
        .await
        .unwrap();

    let conv = chat.store().current();
    assert_eq!(conv.id, outcome.conversation_id);
    assert!(conv.turns.iter().all(|t| t.is_evaluation));
    assert!(conv.has_evaluation);
    assert!(outcome.reply.contains("【コンピテンシー評価結果】"));
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);

    let result = chat.send(" \n\t ", Mode::Plain).await;

    assert!(matches!(result, Err(ChatError::EmptyMessage)));
    assert!(chat.store().index().is_empty());
    assert!(!chat.can_send("   "));
}

#[tokio::test]
async fn test_over_limit_message_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);

    let result = chat.send(&"長".repeat(16001), Mode::Plain).await;

    assert!(matches!(
        result,
        Err(ChatError::MessageTooLong {
            length: 16001,
            limit: 16000
        })
    ));
    assert!(chat.store().index().is_empty());
}

#[tokio::test]
async fn test_responder_failure_becomes_error_turn() {
    let dir = tempfile::tempdir().unwrap();
    let mut responder = MockTestResponder::new();
    responder
        .expect_respond()
        .times(1)
        .returning(|_, _| Err(ResponderError::Unavailable("offline".to_string())));
    let mut chat = orchestrator_with(dir.path(), Variant::Sampled, Arc::new(responder));

    let outcome = chat.send("授業の感想", Mode::Evaluation).await.unwrap();

    assert!(outcome.failed);
    assert_eq!(outcome.reply, EVALUATION_FAILURE);
    let turns = &chat.store().current().turns;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].text, EVALUATION_FAILURE);
    assert!(!turns[1].is_evaluation);
    assert!(!chat.state().loading);
}

#[tokio::test]
async fn test_plain_failure_uses_generic_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut responder = MockTestResponder::new();
    responder
        .expect_respond()
        .returning(|_, _| Err(ResponderError::Generation("boom".to_string())));
    let mut chat = orchestrator_with(dir.path(), Variant::Basic, Arc::new(responder));

    let outcome = chat.send("こんにちは", Mode::Plain).await.unwrap();
    assert_eq!(outcome.reply, GENERIC_FAILURE);
}

#[tokio::test]
async fn test_standalone_failure_uses_brief_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut responder = MockTestResponder::new();
    responder
        .expect_respond()
        .times(2)
        .returning(|_, _| Err(ResponderError::Unavailable("offline".to_string())));
    let mut chat = orchestrator_with(dir.path(), Variant::Standalone, Arc::new(responder));

    let plain = chat.send("こんにちは", Mode::Plain).await.unwrap();
    let evaluation = chat.send("授業の感想", Mode::Evaluation).await.unwrap();

    assert_eq!(plain.reply, BRIEF_FAILURE);
    assert_eq!(evaluation.reply, BRIEF_FAILURE);
}

#[tokio::test]
async fn test_second_send_while_pending_is_busy() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);

    let pending = chat.begin_send("一つ目", Mode::Plain).unwrap();
    assert!(chat.state().loading);
    assert!(!chat.can_send("二つ目"));
    assert!(matches!(
        chat.begin_send("二つ目", Mode::Plain),
        Err(ChatError::Busy)
    ));
    assert!(matches!(
        chat.send("二つ目", Mode::Plain).await,
        Err(ChatError::Busy)
    ));
    assert_eq!(chat.store().current().turns.len(), 1);

    let result = pending.reply().await;
    let outcome = chat.complete_send(pending, result).unwrap();

    assert!(!chat.state().loading);
    assert!(!outcome.failed);
    assert_eq!(chat.store().current().turns.len(), 2);
    chat.send("二つ目", Mode::Plain).await.unwrap();
}

#[tokio::test]
async fn test_pending_reply_lands_in_original_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);

    let pending = chat.begin_send("元の会話", Mode::Evaluation).unwrap();
    let original = pending.conversation_id().clone();
    chat.new_chat();

    let result = pending.reply().await;
    chat.complete_send(pending, result).unwrap();

    assert!(chat.store().current().turns.is_empty());
    let conv = chat.store().index().get(&original).unwrap();
    assert_eq!(conv.turns.len(), 2);
    assert!(conv.has_evaluation);
}

#[tokio::test]
async fn test_failed_reply_still_clears_loading() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Basic);

    let pending = chat.begin_send("質問", Mode::Plain).unwrap();
    let outcome = chat
        .complete_send(pending, Err(ResponderError::Generation("boom".to_string())))
        .unwrap();

    assert!(outcome.failed);
    assert!(!chat.state().loading);
    assert!(chat.can_send("次"));
}

#[tokio::test]
async fn test_responder_receives_trimmed_text_and_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut responder = MockTestResponder::new();
    responder
        .expect_respond()
        .withf(|input, mode| input.to_string() == "振り返り" && *mode == Mode::Evaluation)
        .times(1)
        .returning(|_, _| Ok("評価".to_string()));
    let mut chat = orchestrator_with(dir.path(), Variant::Standalone, Arc::new(responder));

    chat.send(" 振り返り ", Mode::Evaluation).await.unwrap();
}

// ============================================
// History management
// ============================================

#[tokio::test]
async fn test_new_chat_keeps_previous_in_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);

    let first = chat.send("一つ目", Mode::Plain).await.unwrap().conversation_id;
    chat.new_chat();
    let second = chat.send("二つ目", Mode::Plain).await.unwrap().conversation_id;

    assert_ne!(first, second);
    let ids: Vec<_> = chat.store().index().iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec![second, first.clone()]);

    let reopened = chat.open(&first).unwrap();
    assert_eq!(reopened.title, "一つ目");
}

#[tokio::test]
async fn test_open_unknown_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);
    assert!(matches!(
        chat.open(&ConversationId::from("standalone_chat_0_zzz")),
        Err(ChatError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_only_in_deletable_variant() {
    let dir = tempfile::tempdir().unwrap();
    let mut basic = create_test_orchestrator(dir.path(), Variant::Basic);
    let id = basic.send("残したい", Mode::Plain).await.unwrap().conversation_id;
    assert!(matches!(basic.delete(&id), Err(ChatError::DeleteNotAllowed)));

    let mut standalone = create_test_orchestrator(dir.path(), Variant::Standalone);
    let id = standalone.send("消したい", Mode::Plain).await.unwrap().conversation_id;
    assert!(standalone.delete(&id).unwrap());
    assert!(standalone.store().index().is_empty());
    assert!(!standalone.delete(&id).unwrap());
}

#[tokio::test]
async fn test_clear_all_resets_to_fresh_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);
    let id = chat.send("消える", Mode::Plain).await.unwrap().conversation_id;

    chat.clear_all().unwrap();

    assert!(chat.store().index().is_empty());
    assert_ne!(chat.store().current_id(), &id);
    assert!(chat.store().current().turns.is_empty());
}

#[tokio::test]
async fn test_logout_forgets_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat =
        create_test_orchestrator(dir.path(), Variant::Sampled).with_user_label("田中 太郎さん");
    chat.send("ログアウト前", Mode::Plain).await.unwrap();

    chat.logout().unwrap();

    assert!(chat.store().index().is_empty());
    assert!(chat.store().current().turns.is_empty());
    assert!(chat.state().user_label.is_empty());
}

#[tokio::test]
async fn test_standalone_logout_keeps_anonymous_label() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat =
        create_test_orchestrator(dir.path(), Variant::Standalone).with_user_label(ANONYMOUS_LABEL);

    chat.logout().unwrap();

    assert_eq!(chat.state().user_label, ANONYMOUS_LABEL);
}
