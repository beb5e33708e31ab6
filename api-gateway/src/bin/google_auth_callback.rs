//! Google Auth Callback Lambda - authorization-code exchange.
//!
//! POST `{"code": ...}`. Exchanges the code for tokens, looks the user up
//! on the userinfo endpoint, and hands both back to the frontend. Tokens
//! are not stored server-side.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shared::http::{error_response, error_to_response, json_response, preflight_response};
use shared::oauth::GoogleOAuthClient;
use shared::{parse_body, Config};

#[derive(Debug, Deserialize)]
struct CallbackRequest {
    code: Option<String>,
}

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

    let request: CallbackRequest = parse_body!(event.body());
    let Some(code) = request.code else {
        return error_response(400, "Missing authorization code");
    };

    let Some(oauth) = &state.oauth else {
        return error_to_response(&shared::Error::NotConfigured("Google OAuth"));
    };

    let tokens = match oauth.exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => return error_to_response(&e),
    };

    let user = match oauth.userinfo(&tokens.access_token).await {
        Ok(user) => user,
        Err(e) => return error_to_response(&e),
    };

    info!("Completed OAuth exchange for {:?}", user.email);

    json_response(
        200,
        &serde_json::json!({
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
            "expires_in": tokens.expires_in,
            "user": {
                "email": user.email,
                "name": user.name,
                "picture": user.picture,
            },
        }),
    )
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
