use std::sync::Arc;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::backend;
use crate::config::Config;
use crate::state::{AppState, StatusLine, VerifyStatus};

/// Re-reads the backend's saved values and mirrors them into view state.
/// Either request failing blanks both displays; there is no
/// partial-success rendering.
pub async fn refresh_saved(state: Arc<Mutex<AppState>>, config: Arc<Config>) {
    state.lock().await.is_loading = true;

    let client = Client::new();
    let latest = backend::fetch_latest_token(&client, &config.api_base_url).await;
    let rows = if latest.is_some() {
        backend::fetch_all_tokens(&client, &config.api_base_url).await
    } else {
        None
    };

    let mut state = state.lock().await;
    match (latest, rows) {
        (Some(token), Some(rows)) => {
            state.saved_token = token;
            state.saved_access_token = rows
                .first()
                .and_then(|row| row.access_token.clone())
                .unwrap_or_default();
            state.last_refreshed = Some(chrono::Local::now());
        }
        _ => {
            state.saved_token.clear();
            state.saved_access_token.clear();
        }
    }
    state.is_loading = false;
}

/// Sends the current input text to the verification endpoint. The text
/// goes out untrimmed.
pub async fn verify(state: Arc<Mutex<AppState>>, config: Arc<Config>) {
    let token = {
        let mut state = state.lock().await;
        state.verify_status = None;
        state.is_loading = true;
        state.token_input.clone()
    };

    let client = Client::new();
    let valid = backend::verify_token(&client, &config.api_base_url, &token).await;

    let mut state = state.lock().await;
    state.verify_status = Some(if valid {
        VerifyStatus::Valid
    } else {
        VerifyStatus::Invalid
    });
    state.is_loading = false;
}

/// Saves the current input text, then refetches the saved values so the
/// displays reflect backend state rather than a local echo.
pub async fn save(state: Arc<Mutex<AppState>>, config: Arc<Config>) {
    let token = {
        let mut state = state.lock().await;
        state.save_message = None;
        state.is_loading = true;
        state.token_input.clone()
    };

    let client = Client::new();
    let saved = backend::save_token(&client, &config.api_base_url, &token).await;

    {
        let mut state = state.lock().await;
        state.save_message = Some(if saved {
            StatusLine::success("Token saved!")
        } else {
            StatusLine::failure("Failed to save token.")
        });
        state.is_loading = false;
    }

    if saved {
        refresh_saved(state, config).await;
    }
}

/// Asks the backend for the derived access token of whatever auth token
/// it has saved; no input is read.
pub async fn fetch_access_token(state: Arc<Mutex<AppState>>, config: Arc<Config>) {
    {
        let mut state = state.lock().await;
        state.access_token_message = None;
        state.is_loading = true;
    }

    let client = Client::new();
    let fetched = backend::fetch_access_token(&client, &config.api_base_url).await;
    let succeeded = fetched.is_some();

    {
        let mut state = state.lock().await;
        state.access_token_message = Some(match fetched {
            Some(access_token) => {
                StatusLine::success(format!("Access token (sub) saved: {}", access_token))
            }
            None => StatusLine::failure("Failed to fetch access token."),
        });
        state.is_loading = false;
    }

    if succeeded {
        refresh_saved(state, config).await;
    }
}

/// Publishes the current draft. The draft is kept after posting.
pub async fn publish_post(state: Arc<Mutex<AppState>>, config: Arc<Config>) {
    let text = {
        let mut state = state.lock().await;
        state.post_status = None;
        state.is_loading = true;
        state.post_text.clone()
    };

    let client = Client::new();
    let posted = backend::post_to_linkedin(&client, &config.api_base_url, &text).await;

    let mut state = state.lock().await;
    state.post_status = Some(if posted {
        StatusLine::success("Posted successfully!")
    } else {
        StatusLine::failure("Failed to post.")
    });
    state.is_loading = false;
}
