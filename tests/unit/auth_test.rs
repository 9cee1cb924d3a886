use rai_advising::auth::{
    self, Identity, Role, ADMIN_TOKEN_KEY, ANONYMOUS_LABEL, MOCK_FACULTY_TOKEN, USER_KEY,
};
use rai_advising::services::Variant;
use rai_advising::storage::{LocalStorage, MemoryStorage};

#[test]
fn test_missing_student_is_replaced_by_mock() {
    let mut storage = MemoryStorage::new();
    let identity = auth::resolve_student(&mut storage).unwrap();

    assert_eq!(identity, Identity::mock_student());
    assert_eq!(identity.role, Role::Student);
    assert!(storage.get_item(USER_KEY).unwrap().is_some());
}

#[test]
fn test_stored_student_is_trusted() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            USER_KEY,
            r#"{"id":"student042","name":"山田 花子","email":"yamada@example.jp","role":"student"}"#,
        )
        .unwrap();

    let identity = auth::resolve_student(&mut storage).unwrap();
    assert_eq!(identity.id, "student042");
    assert_eq!(identity.display_name(), "山田 花子さん");
}

#[test]
fn test_unreadable_identity_falls_back_to_mock() {
    let mut storage = MemoryStorage::new();
    storage.set_item(USER_KEY, "garbage").unwrap();
    assert_eq!(auth::resolve_student(&mut storage).unwrap(), Identity::mock_student());
}

#[test]
fn test_header_label_per_variant() {
    let mut storage = MemoryStorage::new();
    assert_eq!(
        auth::header_label(&mut storage, &Variant::Basic.profile()).unwrap(),
        "田中 太郎さん"
    );
    assert_eq!(
        auth::header_label(&mut storage, &Variant::Standalone.profile()).unwrap(),
        ANONYMOUS_LABEL
    );
}

#[test]
fn test_faculty_token_issued_once() {
    let mut storage = MemoryStorage::new();
    let faculty = auth::resolve_faculty(&mut storage).unwrap();

    assert_eq!(faculty.role, Role::Faculty);
    assert_eq!(
        storage.get_item(ADMIN_TOKEN_KEY).unwrap().as_deref(),
        Some(MOCK_FACULTY_TOKEN)
    );

    auth::logout_faculty(&mut storage).unwrap();
    assert_eq!(storage.get_item(ADMIN_TOKEN_KEY).unwrap(), None);
}

#[test]
fn test_logout_removes_user_and_history() {
    let profile = Variant::Sampled.profile();
    let mut storage = MemoryStorage::new();
    auth::resolve_student(&mut storage).unwrap();
    storage.set_item(profile.storage_key, "[]").unwrap();

    auth::logout(&mut storage, &profile).unwrap();

    assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
    assert_eq!(storage.get_item(profile.storage_key).unwrap(), None);
}
