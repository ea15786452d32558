use super::*;
use serde_json::json;

// =============================================================================
// Helpers
// =============================================================================

fn make_user() -> SessionUser {
    SessionUser {
        id: "u-1".to_owned(),
        name: "Nguyen Van A".to_owned(),
        email: "a@itec.hcmus.edu.vn".to_owned(),
        roles: vec![Role::new("SUPER_ADMIN"), Role::new("DEAN")],
        department: Some(DepartmentRef { id: "d-7".to_owned(), name: "Software Engineering".to_owned() }),
        avatar_url: Some("https://example.com/a.png".to_owned()),
    }
}

fn make_store() -> (MemoryStorage, SessionStore<MemoryStorage>) {
    let storage = MemoryStorage::new();
    (storage.clone(), SessionStore::new(storage))
}

// =============================================================================
// commit / read
// =============================================================================

#[test]
fn read_after_commit_reproduces_user() {
    let (_, store) = make_store();
    let user = make_user();
    store.commit("tok-1", None, &user).unwrap();

    let session = store.read().unwrap();
    assert_eq!(session.auth_token, "tok-1");
    assert_eq!(session.refresh_token, None);
    assert_eq!(session.user, user);
}

#[test]
fn commit_stores_refresh_token_when_given() {
    let (storage, store) = make_store();
    store.commit("tok-1", Some("ref-1"), &make_user()).unwrap();
    assert_eq!(storage.get_item(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
    assert_eq!(store.read().unwrap().refresh_token.as_deref(), Some("ref-1"));
}

#[test]
fn commit_overwrites_previous_session() {
    let (storage, store) = make_store();
    store.commit("old", Some("old-ref"), &make_user()).unwrap();

    let other = SessionUser { id: "u-2".to_owned(), ..SessionUser::default() };
    store.commit("new", None, &other).unwrap();

    let session = store.read().unwrap();
    assert_eq!(session.auth_token, "new");
    assert_eq!(session.user.id, "u-2");
    assert_eq!(storage.get_item(REFRESH_TOKEN_KEY), None);
}

#[test]
fn commit_does_not_validate_token_shape() {
    let (_, store) = make_store();
    store.commit("not a jwt at all", None, &make_user()).unwrap();
    assert_eq!(store.read().unwrap().auth_token, "not a jwt at all");
}

#[test]
fn commit_writes_canonical_profile_json() {
    let (storage, store) = make_store();
    store.commit("tok", None, &make_user()).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&storage.get_item(USER_KEY).unwrap()).unwrap();
    assert_eq!(raw["roles"], json!(["SUPER_ADMIN", "DEAN"]));
    assert_eq!(raw["avatarUrl"], json!("https://example.com/a.png"));
}

#[test]
fn read_empty_storage_is_none() {
    let (_, store) = make_store();
    assert!(store.read().is_none());
    assert!(!store.is_authenticated());
}

#[test]
fn read_with_corrupt_profile_is_none() {
    let (storage, store) = make_store();
    storage.set_item(TOKEN_KEY, "tok").unwrap();
    storage.set_item(USER_KEY, "{not json").unwrap();
    assert!(store.read().is_none());
}

#[test]
fn read_with_empty_token_is_none() {
    let (storage, store) = make_store();
    storage.set_item(TOKEN_KEY, "").unwrap();
    storage.set_item(USER_KEY, "{}").unwrap();
    assert!(store.read().is_none());
}

#[test]
fn read_without_profile_is_none() {
    let (storage, store) = make_store();
    storage.set_item(TOKEN_KEY, "tok").unwrap();
    assert!(store.read().is_none());
}

#[test]
fn read_normalizes_legacy_role_objects() {
    let (storage, store) = make_store();
    storage.set_item(TOKEN_KEY, "tok").unwrap();
    let legacy = json!({
        "id": 12,
        "name": "B",
        "email": "b@x.com",
        "roles": [{ "slug": "SUPER_ADMIN", "name": "Super Admin" }, "user"],
        "department": { "id": 3, "name": "Math" }
    });
    storage.set_item(USER_KEY, &legacy.to_string()).unwrap();

    let user = store.read().unwrap().user;
    assert_eq!(user.id, "12");
    assert_eq!(user.roles, vec![Role::new("SUPER_ADMIN"), Role::new("USER")]);
    assert_eq!(user.department, Some(DepartmentRef { id: "3".to_owned(), name: "Math".to_owned() }));
}

#[test]
fn read_tolerates_minimal_profile() {
    let (storage, store) = make_store();
    storage.set_item(TOKEN_KEY, "tok").unwrap();
    storage.set_item(USER_KEY, r#"{"roles":"SUPER_ADMIN"}"#).unwrap();
    let user = store.read().unwrap().user;
    assert!(user.roles.is_empty());
    assert_eq!(user.department_name(), "Department");
}

#[test]
fn read_tolerates_null_text_fields() {
    let (storage, store) = make_store();
    storage.set_item(TOKEN_KEY, "tok").unwrap();
    storage
        .set_item(USER_KEY, r#"{"id":"u","name":null,"email":null,"department":{"id":2,"name":null}}"#)
        .unwrap();
    let user = store.read().unwrap().user;
    assert_eq!(user.name, "");
    assert_eq!(user.email, "");
    assert_eq!(user.department, Some(DepartmentRef { id: "2".to_owned(), name: String::new() }));
}

// =============================================================================
// clear
// =============================================================================

#[test]
fn clear_after_commit_yields_no_session() {
    let (storage, store) = make_store();
    store.commit("tok", Some("ref"), &make_user()).unwrap();
    store.clear();
    assert!(store.read().is_none());
    assert!(storage.is_empty());
}

#[test]
fn clear_is_idempotent() {
    let (storage, store) = make_store();
    store.clear();
    store.clear();
    assert!(storage.is_empty());
    assert!(store.read().is_none());
}

#[test]
fn clear_leaves_unrelated_keys() {
    let (storage, store) = make_store();
    storage.set_item("theme", "dark").unwrap();
    store.commit("tok", None, &make_user()).unwrap();
    store.clear();
    assert_eq!(storage.len(), 1);
    assert_eq!(storage.get_item("theme").as_deref(), Some("dark"));
}

// =============================================================================
// SessionUser helpers
// =============================================================================

#[test]
fn avatar_aliases_are_accepted() {
    let user: SessionUser = serde_json::from_value(json!({ "picture": "p.png" })).unwrap();
    assert_eq!(user.avatar_url.as_deref(), Some("p.png"));
}

#[test]
fn department_name_uses_assigned_department() {
    assert_eq!(make_user().department_name(), "Software Engineering");
}

#[test]
fn session_user_is_admin_uses_normalized_roles() {
    assert!(make_user().is_admin());
    assert!(!SessionUser::default().is_admin());
}
