//! Health Check Lambda - connection status of every integration.
//!
//! GET with an optional `Authorization: Bearer` Google access token. Each
//! section reports `{status, message, configured}` so the settings page
//! can show per-integration state.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use shared::http::{bearer_token, json_response, preflight_response};
use shared::meta::MetaAdsClient;
use shared::oauth::GoogleOAuthClient;
use shared::sheets::GoogleSheetsReader;
use shared::Config;

const DRIVE_ABOUT_URL: &str = "https://www.googleapis.com/drive/v3/about";

struct AppState {
    config: Config,
    meta: Option<MetaAdsClient>,
    oauth: Option<GoogleOAuthClient>,
    http: reqwest::Client,
}

impl AppState {
    fn new(config: Config) -> Result<Self, Error> {
        let meta = match config.meta() {
            Some((token, account)) => Some(MetaAdsClient::new(token, account)?),
            None => None,
        };

        let oauth = match config.google_oauth() {
            Ok((client_id, client_secret)) => Some(GoogleOAuthClient::new(
                client_id,
                client_secret,
                config.google_redirect_uri.clone(),
            )?),
            Err(_) => None,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            config,
            meta,
            oauth,
            http,
        })
    }
}

async fn check_meta(state: &AppState) -> Value {
    let Some(meta) = &state.meta else {
        return json!({
            "status": "not_configured",
            "message": "Meta credentials not configured",
            "configured": false,
        });
    };

    match meta.account_status().await {
        Ok(account) => {
            let name = account.name.unwrap_or_else(|| "Unknown".to_string());
            json!({
                "status": "connected",
                "message": format!("Connected to {}", name),
                "configured": true,
                "account_name": name,
                "account_status": account.account_status,
            })
        }
        Err(e) => json!({
            "status": "error",
            "message": e.to_string(),
            "configured": true,
        }),
    }
}

async fn check_google_oauth(state: &AppState, access_token: Option<&str>) -> Value {
    let Some(token) = access_token else {
        return if state.oauth.is_none() {
            json!({
                "status": "not_configured",
                "message": "Google OAuth not configured",
                "configured": false,
            })
        } else {
            json!({
                "status": "not_authenticated",
                "message": "OAuth configured but user not logged in",
                "configured": true,
            })
        };
    };

    let Some(oauth) = &state.oauth else {
        return json!({
            "status": "not_configured",
            "message": "Google OAuth not configured",
            "configured": false,
        });
    };

    match oauth.userinfo(token).await {
        Ok(user) => {
            let email = user.email.unwrap_or_else(|| "unknown".to_string());
            json!({
                "status": "connected",
                "message": format!("Logged in as {}", email),
                "configured": true,
                "user_email": email,
                "user_name": user.name,
            })
        }
        Err(_) => json!({
            "status": "error",
            "message": "Invalid or expired token",
            "configured": true,
        }),
    }
}

async fn check_google_sheets(state: &AppState, access_token: Option<&str>) -> Value {
    let Some(token) = access_token else {
        return json!({
            "status": "not_authenticated",
            "message": "Login with Google to access Sheets",
            "configured": false,
        });
    };

    let Some(spreadsheet_id) = state.config.spreadsheet_id.as_deref() else {
        return json!({
            "status": "warning",
            "message": "No spreadsheet ID configured (using mock data)",
            "configured": false,
        });
    };

    let title = match GoogleSheetsReader::new(spreadsheet_id, token) {
        Ok(reader) => reader.spreadsheet_title().await,
        Err(e) => Err(e),
    };

    match title {
        Ok(title) => json!({
            "status": "connected",
            "message": format!("Connected to: {}", title),
            "configured": true,
            "spreadsheet_title": title,
        }),
        Err(_) => json!({
            "status": "error",
            "message": "Cannot access spreadsheet",
            "configured": true,
        }),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveAbout {
    user: Option<DriveUser>,
    storage_quota: Option<StorageQuota>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveUser {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StorageQuota {
    usage: Option<String>,
    limit: Option<String>,
}

fn quota_gb(value: &Option<String>) -> f64 {
    let bytes: f64 = value
        .as_deref()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    bytes / (1024u64.pow(3) as f64)
}

async fn check_google_drive(state: &AppState, access_token: Option<&str>) -> Value {
    let Some(token) = access_token else {
        return json!({
            "status": "not_authenticated",
            "message": "Login with Google to access Drive",
            "configured": false,
        });
    };

    let about = state
        .http
        .get(DRIVE_ABOUT_URL)
        .query(&[("fields", "user,storageQuota")])
        .bearer_auth(token)
        .send()
        .await;

    let about = match about {
        Ok(response) if response.status().is_success() => {
            response.json::<DriveAbout>().await.ok()
        }
        _ => None,
    };

    match about {
        Some(about) => {
            let user = about
                .user
                .and_then(|u| u.display_name)
                .unwrap_or_else(|| "Unknown".to_string());
            let (used, limit) = about
                .storage_quota
                .map(|q| (quota_gb(&q.usage), quota_gb(&q.limit)))
                .unwrap_or((0.0, 0.0));
            json!({
                "status": "connected",
                "message": format!("{:.1} GB of {:.1} GB used", used, limit),
                "configured": true,
                "user_name": user,
            })
        }
        None => json!({
            "status": "error",
            "message": "Cannot access Drive",
            "configured": true,
        }),
    }
}

fn config_status(config: &Config) -> Value {
    json!({
        "meta_configured": config.meta().is_some(),
        "google_oauth_configured": config.google_oauth().is_ok(),
        "redirect_uri_configured": config.google_redirect_uri.is_some(),
        "spreadsheet_configured": config.spreadsheet_id.is_some(),
    })
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let access_token = bearer_token(&event);
    let token = access_token.as_deref();

    let health = json!({
        "meta": check_meta(&state).await,
        "google_oauth": check_google_oauth(&state, token).await,
        "google_sheets": check_google_sheets(&state, token).await,
        "google_drive": check_google_drive(&state, token).await,
        "config": config_status(&state.config),
    });

    json_response(200, &health)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new(Config::from_env())?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
