use super::*;
use crate::roles::Role;
use crate::session::MemoryStorage;

// =============================================================================
// Helpers
// =============================================================================

const USER_PARAM: &str = "%7B%22id%22%3A%22u-1%22%2C%22name%22%3A%22Alice%22%2C%22email%22%3A%22a%40b.com%22%2C%22roles%22%3A%5B%22USER%22%5D%7D";

fn store() -> SessionStore<MemoryStorage> {
    SessionStore::new(MemoryStorage::new())
}

// =============================================================================
// parse_query
// =============================================================================

#[test]
fn parse_query_decodes_pairs() {
    assert_eq!(
        parse_query("?a=1&b=hello+world&c=%2Fx"),
        vec![
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "hello world".to_owned()),
            ("c".to_owned(), "/x".to_owned()),
        ]
    );
}

#[test]
fn parse_query_handles_bare_keys_and_empty_input() {
    assert_eq!(parse_query("flag"), vec![("flag".to_owned(), String::new())]);
    assert!(parse_query("").is_empty());
    assert!(parse_query("?").is_empty());
}

// =============================================================================
// AuthRedirect::from_query
// =============================================================================

#[test]
fn from_query_error_takes_precedence() {
    let redirect = AuthRedirect::from_query([("token", "t"), ("user", "{}"), ("error", "auth_failed")]);
    assert_eq!(redirect, AuthRedirect::Error(AuthErrorCode::AuthFailed));
}

#[test]
fn from_query_accepts_access_token_alias() {
    let redirect = AuthRedirect::from_query([("accessToken", "t"), ("refreshToken", "r"), ("user", "{}")]);
    assert_eq!(
        redirect,
        AuthRedirect::Success {
            token: "t".to_owned(),
            refresh_token: Some("r".to_owned()),
            user_json: "{}".to_owned(),
            first_user: false,
        }
    );
}

#[test]
fn from_query_first_user_flag_requires_literal_true() {
    let yes = AuthRedirect::from_query([("token", "t"), ("user", "{}"), ("isFirstUser", "true")]);
    let no = AuthRedirect::from_query([("token", "t"), ("user", "{}"), ("isFirstUser", "1")]);
    assert!(matches!(yes, AuthRedirect::Success { first_user: true, .. }));
    assert!(matches!(no, AuthRedirect::Success { first_user: false, .. }));
}

#[test]
fn from_query_token_without_user_is_empty() {
    assert_eq!(AuthRedirect::from_query([("token", "t")]), AuthRedirect::Empty);
}

#[test]
fn from_query_empty_values_are_absent() {
    assert_eq!(AuthRedirect::from_query([("error", ""), ("token", ""), ("user", "{}")]), AuthRedirect::Empty);
}

#[test]
fn from_query_unknown_error_code_is_kept_opaque() {
    let redirect = AuthRedirect::from_query_str("error=tenant_locked");
    assert_eq!(redirect, AuthRedirect::Error(AuthErrorCode::Other("tenant_locked".to_owned())));
}

// =============================================================================
// AuthErrorCode
// =============================================================================

#[test]
fn error_messages_for_known_codes() {
    assert_eq!(AuthErrorCode::parse("auth_failed").message(), GENERIC_FAILURE);
    assert_eq!(AuthErrorCode::parse("no_code").message(), "Authorization code missing");
    assert_eq!(AuthErrorCode::parse("access_denied").message(), "You declined to grant access.");
}

#[test]
fn error_message_for_unknown_code_shows_raw_code() {
    assert_eq!(AuthErrorCode::parse("weird").message(), "Sign-in error: weird");
}

// =============================================================================
// complete_sign_in
// =============================================================================

#[test]
fn domain_not_allowed_goes_to_blocked_screen() {
    let store = store();
    let route = complete_sign_in(&store, AuthRedirect::from_query_str("error=domain_not_allowed"));
    assert_eq!(route, AppRoute::NotFound);
    assert!(store.read().is_none());
}

#[test]
fn other_errors_go_to_login_with_message() {
    let route = complete_sign_in(&store(), AuthRedirect::from_query_str("error=no_code"));
    assert_eq!(route, AppRoute::login_with_notice("Authorization code missing"));
}

#[test]
fn success_commits_session_and_goes_to_dashboard() {
    let store = store();
    let route = complete_sign_in(&store, AuthRedirect::from_query_str(&format!("token=tok-1&user={USER_PARAM}")));
    assert_eq!(route, AppRoute::Dashboard);

    let session = store.read().unwrap();
    assert_eq!(session.auth_token, "tok-1");
    assert_eq!(session.user.name, "Alice");
    assert_eq!(session.user.email, "a@b.com");
    assert_eq!(session.user.roles, vec![Role::new("USER")]);
}

#[test]
fn first_user_goes_to_admin_settings() {
    let store = store();
    let query = format!("token=tok-1&user={USER_PARAM}&isFirstUser=true");
    assert_eq!(complete_sign_in(&store, AuthRedirect::from_query_str(&query)), AppRoute::AdminSettings);
    assert!(store.read().is_some());
}

#[test]
fn double_encoded_user_param_is_decoded_twice() {
    let double = USER_PARAM.replace('%', "%25");
    let store = store();
    let route = complete_sign_in(&store, AuthRedirect::from_query_str(&format!("token=t&user={double}")));
    assert_eq!(route, AppRoute::Dashboard);
    assert_eq!(store.read().unwrap().user.id, "u-1");
}

#[test]
fn unparseable_user_goes_to_login_without_committing() {
    let store = store();
    let redirect = AuthRedirect::from_query([("token", "t"), ("user", "{broken")]);
    assert_eq!(complete_sign_in(&store, redirect), AppRoute::login_with_notice(GENERIC_FAILURE));
    assert!(store.read().is_none());
}

#[test]
fn null_profile_fields_still_sign_in() {
    let store = store();
    let user = r#"{"id":7,"name":null,"email":null,"roles":["USER"],"department":null}"#;
    let redirect = AuthRedirect::from_query([("token", "t"), ("user", user)]);
    assert_eq!(complete_sign_in(&store, redirect), AppRoute::Dashboard);

    let session = store.read().unwrap();
    assert_eq!(session.user.id, "7");
    assert_eq!(session.user.name, "");
    assert_eq!(session.user.department, None);
}

#[test]
fn null_department_name_still_signs_in() {
    let store = store();
    let user = r#"{"id":7,"name":"An","department":{"id":1,"name":null}}"#;
    let redirect = AuthRedirect::from_query([("token", "t"), ("user", user)]);
    assert_eq!(complete_sign_in(&store, redirect), AppRoute::Dashboard);
    assert_eq!(store.read().unwrap().user.department_name(), "Department");
}

#[test]
fn success_with_refresh_token_stores_it() {
    let store = store();
    let redirect = AuthRedirect::from_query([("accessToken", "t"), ("refreshToken", "r"), ("user", "{}")]);
    assert_eq!(complete_sign_in(&store, redirect), AppRoute::Dashboard);
    assert_eq!(store.read().unwrap().refresh_token.as_deref(), Some("r"));
}

#[test]
fn no_params_goes_to_plain_login() {
    assert_eq!(complete_sign_in(&store(), AuthRedirect::from_query_str("")), AppRoute::login());
}
