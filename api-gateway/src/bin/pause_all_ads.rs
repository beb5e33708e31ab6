//! Pause All Ads Lambda - emergency stop for every active campaign.
//!
//! POST. A write path, so missing Meta credentials are a 403 rather than
//! an empty payload.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shared::http::{error_to_response, json_response, preflight_response};
use shared::meta::MetaAdsClient;
use shared::Config;

struct AppState {
    meta: Option<MetaAdsClient>,
}

impl AppState {
    fn new(config: &Config) -> Result<Self, Error> {
        let meta = match config.meta() {
            Some((token, account)) => Some(MetaAdsClient::new(token, account)?),
            None => None,
        };
        Ok(Self { meta })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let Some(meta) = &state.meta else {
        return error_to_response(&shared::Error::NotConfigured("Meta credentials"));
    };

    let campaigns = match meta.get_campaigns("id,status").await {
        Ok(campaigns) => campaigns,
        Err(e) => return error_to_response(&e),
    };

    let mut paused = 0u32;

    for campaign in campaigns {
        if campaign.status.as_deref() != Some("ACTIVE") {
            continue;
        }

        match meta.pause_campaign(&campaign.id).await {
            Ok(()) => paused += 1,
            Err(e) => warn!("Failed to pause campaign {}: {}", campaign.id, e),
        }
    }

    info!("Paused {} campaigns", paused);

    json_response(200, &serde_json::json!({ "paused": paused }))
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
