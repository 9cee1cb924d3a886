use super::{create_test_orchestrator, open_store};
use rai_advising::services::{Mode, Variant};
use rai_advising::storage::{load_index, FileStorage, LocalStorage};

#[tokio::test]
async fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let saved = {
        let mut chat = create_test_orchestrator(dir.path(), Variant::Standalone);
        chat.send("グループワークの感想", Mode::Evaluation).await.unwrap();
        chat.new_chat();
        chat.send("二回目", Mode::Plain).await.unwrap();
        chat.store().index().clone()
    };

    let reopened = open_store(dir.path(), Variant::Standalone);
    assert_eq!(reopened.index(), &saved);
    assert_eq!(reopened.index().len(), 2);
}

#[tokio::test]
async fn test_variants_use_separate_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut basic = create_test_orchestrator(dir.path(), Variant::Basic);
    basic.send("basic only", Mode::Plain).await.unwrap();

    assert_eq!(open_store(dir.path(), Variant::Basic).index().len(), 1);
    assert!(open_store(dir.path(), Variant::Sampled).index().is_empty());
    assert!(open_store(dir.path(), Variant::Standalone).index().is_empty());
}

#[tokio::test]
async fn test_persisted_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = create_test_orchestrator(dir.path(), Variant::Sampled);
    chat.send("形式の確認", Mode::Evaluation).await.unwrap();

    let storage = FileStorage::open(dir.path()).unwrap();
    let raw = storage
        .get_item(Variant::Sampled.profile().storage_key)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let conv = &value[0];
    assert!(conv["id"].as_str().unwrap().starts_with("chat_"));
    assert_eq!(conv["title"], "形式の確認");
    assert_eq!(conv["hasCompetencyEvaluation"], true);
    assert_eq!(conv["messages"][0]["sender"], "user");
    assert_eq!(conv["messages"][1]["sender"], "ai");
    assert_eq!(conv["messages"][1]["isCompetencyEvaluation"], true);
    assert!(conv["messages"][0]["timestamp"].is_string());
}

#[test]
fn test_corrupt_history_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::open(dir.path()).unwrap();
    storage
        .set_item("rai_chat_history", "[{\"id\": 5}]")
        .unwrap();

    assert!(load_index(&storage, "rai_chat_history").is_empty());
}
