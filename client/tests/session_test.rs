//! Session store end to end: login persists the token, a restart restores it,
//! a rejected token ends the session, logout clears everything.

mod common;

use std::sync::Arc;

use common::{start_server, PASSWORD, VALID_TOKEN};
use market_client::app::MarketApp;
use market_client::notify::{NotificationCenter, RecordingSink};
use market_client::store::{FileTokenStorage, TokenStorage};
use shared::{LoginRequest, UserUpdate};

fn credentials(password: &str) -> LoginRequest {
    LoginRequest {
        username: "alice".into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn test_login_persists_and_restart_restores() {
    let server = start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let config = server.config(dir.path().join("session.json"));

    let app = MarketApp::from_config(&config).unwrap();
    assert!(!app.session.is_logged_in());

    let user = app.session.login(&credentials(PASSWORD)).await.unwrap();
    assert_eq!(user.username, "alice");
    assert!(app.session.is_admin());
    assert_eq!(
        FileTokenStorage::new(&config.session_file).load().unwrap().as_deref(),
        Some(VALID_TOKEN)
    );

    // A fresh process picks the token up from disk
    let restarted = MarketApp::from_config(&config).unwrap();
    assert!(restarted.session.is_logged_in());
    assert!(restarted.session.user_info().is_none());

    let user = restarted.session.initialize_user().await.unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(
        server.backend.last().authorization.as_deref(),
        Some("Bearer tok-123")
    );
}

#[tokio::test]
async fn test_failed_login_sets_error_and_stays_logged_out() {
    let server = start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let app = MarketApp::from_config(&server.config(dir.path().join("session.json"))).unwrap();

    let err = app.session.login(&credentials("wrong")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(app.session.error().as_deref(), Some("用户名或密码错误"));
    assert!(!app.session.is_logged_in());
    assert!(!app.session.is_loading());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_rejected_token_clears_session() {
    let server = start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let config = server.config(dir.path().join("session.json"));
    FileTokenStorage::new(&config.session_file).save("stale-token").unwrap();

    let app = MarketApp::from_config(&config).unwrap();
    assert!(app.session.is_logged_in());

    let err = app.session.fetch_user_info().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!app.session.is_logged_in());
    assert!(app.session.token().is_none());
    assert!(!config.session_file.exists());

    // Later calls go out without credentials
    let _ = app.api.get_current_user().await;
    assert_eq!(server.backend.last().authorization, None);
}

#[tokio::test]
async fn test_update_profile_then_logout() {
    let server = start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let config = server.config(dir.path().join("session.json"));
    let sink = Arc::new(RecordingSink::new());
    let storage = Arc::new(FileTokenStorage::new(&config.session_file));
    let app = MarketApp::with_storage(&config, storage, NotificationCenter::new(sink.clone())).unwrap();

    app.session.login(&credentials(PASSWORD)).await.unwrap();
    let user = app
        .session
        .update_user_info(&UserUpdate {
            nickname: Some("Al".into()),
            ..UserUpdate::default()
        })
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(server.backend.last().body, Some(serde_json::json!({"nickname": "Al"})));

    app.session.logout().await;
    app.notifications.success("已退出登录");

    assert_eq!(server.backend.count("POST", "/api/auth/logout"), 1);
    assert!(!app.session.is_logged_in());
    assert!(app.session.user_info().is_none());
    assert!(!config.session_file.exists());
    assert_eq!(sink.toasts().len(), 1);
}
