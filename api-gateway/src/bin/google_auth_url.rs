//! Google Auth URL Lambda - starts the OAuth flow.
//!
//! GET. Returns the authorization URL the frontend redirects the user to.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use shared::http::{error_to_response, json_response, preflight_response};
use shared::oauth::GoogleOAuthClient;
use shared::Config;

struct AppState {
    oauth: Option<GoogleOAuthClient>,
}

impl AppState {
    fn new(config: &Config) -> Result<Self, Error> {
        let oauth = match config.google_oauth() {
            Ok((client_id, client_secret)) => Some(GoogleOAuthClient::new(
                client_id,
                client_secret,
                config.google_redirect_uri.clone(),
            )?),
            Err(_) => None,
        };
        Ok(Self { oauth })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let Some(oauth) = &state.oauth else {
        return error_to_response(&shared::Error::NotConfigured("Google OAuth"));
    };

    match oauth.auth_url() {
        Ok(url) => json_response(200, &serde_json::json!({ "url": url })),
        Err(e) => error_to_response(&e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new(&Config::from_env())?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
