use mockito::Server;
use now_playing_kiosk::auth;
use now_playing_kiosk::credentials::Credential;
use now_playing_kiosk::error::AuthRefreshError;
use serde_json::json;

fn cred() -> Credential {
    Credential {
        access_token: "old".into(),
        refresh_token: "r1".into(),
        client_id: "id".into(),
        client_secret: "sec".into(),
    }
}

#[test]
fn refresh_success_preserves_refresh_token() {
    let mut server = Server::new();

    // base64("id:sec")
    let _m = server
        .mock("POST", "/api/token")
        .match_header("authorization", "Basic aWQ6c2Vj")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"access_token": "new", "token_type": "Bearer", "expires_in": 3600}).to_string())
        .create();

    let rt = tokio::runtime::Runtime::new().expect("rt");
    let client = reqwest::Client::new();
    let out = rt
        .block_on(auth::refresh(&client, &server.url(), &cred()))
        .expect("refresh");
    assert_eq!(out.access_token, "new");
    assert_eq!(out.refresh_token, "r1");
    assert_eq!(out.client_id, "id");
    assert_eq!(out.client_secret, "sec");
}

#[test]
fn provider_issued_refresh_token_replaces_the_old_one() {
    let mut server = Server::new();

    let _m = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"access_token": "new", "refresh_token": "r2"}).to_string())
        .create();

    let rt = tokio::runtime::Runtime::new().expect("rt");
    let client = reqwest::Client::new();
    let out = rt
        .block_on(auth::refresh(&client, &server.url(), &cred()))
        .expect("refresh");
    assert_eq!(out.access_token, "new");
    assert_eq!(out.refresh_token, "r2");
}

#[test]
fn rejected_refresh_carries_status_and_body() {
    let mut server = Server::new();

    let _m = server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "invalid_client"}).to_string())
        .create();

    let rt = tokio::runtime::Runtime::new().expect("rt");
    let client = reqwest::Client::new();
    let err = rt
        .block_on(auth::refresh(&client, &server.url(), &cred()))
        .expect_err("should fail");
    match err {
        AuthRefreshError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn success_body_without_access_token_is_an_error() {
    let mut server = Server::new();

    let _m = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"token_type": "Bearer"}).to_string())
        .create();

    let rt = tokio::runtime::Runtime::new().expect("rt");
    let client = reqwest::Client::new();
    let err = rt
        .block_on(auth::refresh(&client, &server.url(), &cred()))
        .expect_err("should fail");
    assert!(matches!(err, AuthRefreshError::MissingAccessToken));
}
