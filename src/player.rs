use crate::auth;
use crate::credentials::{Credential, CredentialStore};
use crate::error::{FetchError, StorageError};
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// API base. May be overridden by SPOTIFY_API_BASE (useful for tests).
pub fn api_base() -> String {
    std::env::var("SPOTIFY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into())
}

/// Transient snapshot of the player, fetched once per poll. Absence of a
/// snapshot (no active device/track) is a valid state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub track_name: Option<String>,
    pub artist_names: Vec<String>,
    pub album_art_url: Option<String>,
}

/// Current credential plus the bearer header derived from it. Rebuilt only
/// after a successful refresh.
struct AuthState {
    credential: Credential,
    bearer: String,
}

/// Client for the playback-state and playback-control endpoints.
///
/// The auth state lives behind a single mutex: refresh mutates the credential
/// while fetch reads it, and the poll loop never runs cycles concurrently, so
/// one lock per call is all the coordination needed.
pub struct PlayerClient {
    client: Client,
    store: CredentialStore,
    auth_base: String,
    api_base: String,
    auth: Mutex<Option<AuthState>>,
}

impl PlayerClient {
    pub fn new(store: CredentialStore, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_base_urls(store, timeout, auth::auth_base(), api_base())
    }

    pub fn with_base_urls(
        store: CredentialStore,
        timeout: Duration,
        auth_base: String,
        api_base: String,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            store,
            auth_base,
            api_base,
            auth: Mutex::new(None),
        })
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    fn ensure_auth<'a>(
        &self,
        slot: &'a mut Option<AuthState>,
    ) -> Result<&'a AuthState, StorageError> {
        match slot {
            Some(state) => Ok(state),
            None => {
                let credential = self.store.load()?;
                let bearer = credential.bearer();
                Ok(slot.insert(AuthState { credential, bearer }))
            }
        }
    }

    /// Fetch the current playback state.
    ///
    /// On 401 the access token is refreshed, persisted, and the request is
    /// retried exactly once. A refresh failure or any failure of the retried
    /// request aborts the call; no other error class triggers a retry.
    pub async fn fetch(&self) -> Result<Option<PlaybackState>, FetchError> {
        let mut slot = self.auth.lock().await;
        let state = self.ensure_auth(&mut slot)?;
        let url = format!("{}/me/player", self.api_base);
        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, &state.bearer)
            .send()
            .await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("playback request returned 401; refreshing access token and retrying once");
            let refreshed = auth::refresh(&self.client, &self.auth_base, &state.credential).await?;
            self.store.save(&refreshed)?;
            let bearer = refreshed.bearer();
            *slot = Some(AuthState {
                credential: refreshed,
                bearer: bearer.clone(),
            });
            let retry = self
                .client
                .get(&url)
                .header(AUTHORIZATION, &bearer)
                .send()
                .await?;
            let retry_status = retry.status();
            if !retry_status.is_success() {
                return Err(FetchError::RetryFailed(retry_status));
            }
            return parse_playback(retry).await;
        }

        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        parse_playback(resp).await
    }

    /// Skip to the next track. Fire-and-forget: only the status is inspected.
    pub async fn next(&self) -> Result<(), FetchError> {
        self.command(Method::POST, "me/player/next").await
    }

    /// Skip to the previous track.
    pub async fn previous(&self) -> Result<(), FetchError> {
        self.command(Method::POST, "me/player/previous").await
    }

    /// Resume playback on the active device.
    pub async fn play(&self) -> Result<(), FetchError> {
        self.command(Method::PUT, "me/player/play").await
    }

    /// Pause playback on the active device.
    pub async fn pause(&self) -> Result<(), FetchError> {
        self.command(Method::PUT, "me/player/pause").await
    }

    async fn command(&self, method: Method, path: &str) -> Result<(), FetchError> {
        let mut slot = self.auth.lock().await;
        let state = self.ensure_auth(&mut slot)?;
        let url = format!("{}/{}", self.api_base, path);
        let resp = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION, &state.bearer)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            debug!("player command {} returned {}", path, status);
            return Err(FetchError::Status(status));
        }
        Ok(())
    }
}

async fn parse_playback(resp: reqwest::Response) -> Result<Option<PlaybackState>, FetchError> {
    // 204/empty body means no active device or track.
    if resp.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    let j: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))?;
    if j["item"].is_null() {
        return Ok(None);
    }
    let is_playing = j["is_playing"].as_bool().unwrap_or(false);
    let track_name = j["item"]["name"].as_str().map(str::to_string);
    let artist_names = j["item"]["artists"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let album_art_url = j["item"]["album"]["images"][0]["url"]
        .as_str()
        .map(str::to_string);
    Ok(Some(PlaybackState {
        is_playing,
        track_name,
        artist_names,
        album_art_url,
    }))
}
