use crate::credentials::Credential;
use crate::error::AuthRefreshError;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

pub const DEFAULT_AUTH_BASE: &str = "https://accounts.spotify.com";

/// Token endpoint base. May be overridden by SPOTIFY_AUTH_BASE (useful for tests).
pub fn auth_base() -> String {
    std::env::var("SPOTIFY_AUTH_BASE").unwrap_or_else(|_| DEFAULT_AUTH_BASE.into())
}

/// Exchange the refresh token for a new access token.
///
/// Returns an updated record: the new `access_token`, and the provider's new
/// `refresh_token` only if it issued one (most responses do not include it,
/// in which case the existing refresh token is kept).
pub async fn refresh(
    client: &Client,
    auth_base: &str,
    cred: &Credential,
) -> Result<Credential, AuthRefreshError> {
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", cred.refresh_token.as_str()),
    ];
    let url = format!("{}/api/token", auth_base);
    let resp = client
        .post(&url)
        .header(AUTHORIZATION, cred.basic())
        .form(&params)
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthRefreshError::Rejected { status, body });
    }
    let j: serde_json::Value = resp.json().await?;
    let access_token = j["access_token"]
        .as_str()
        .ok_or(AuthRefreshError::MissingAccessToken)?
        .to_string();
    let refresh_token = j["refresh_token"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| cred.refresh_token.clone());
    debug!("access token refreshed");
    Ok(Credential {
        access_token,
        refresh_token,
        client_id: cred.client_id.clone(),
        client_secret: cred.client_secret.clone(),
    })
}
