//! Calendar Month Lambda - post feed for one calendar month.
//!
//! GET with optional `year`/`month` query parameters (defaults: current
//! month) and an optional `Authorization: Bearer` Google access token.
//! Authenticated requests read the configured spreadsheet through the feed
//! resolver; unauthenticated ones get the fixture set directly.

use chrono::{Datelike, Utc};
use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shared::calendar::{fixture_posts, month_label, resolve_month};
use shared::http::{bearer_token, error_response, error_to_response, json_response, preflight_response};
use shared::sheets::GoogleSheetsReader;
use shared::Config;

struct AppState {
    config: Config,
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let now = Utc::now();
    let params = event.query_string_parameters();

    let year: i32 = match params.first("year") {
        Some(value) => match value.parse() {
            Ok(year) => year,
            Err(_) => return error_response(400, format!("Invalid year: {}", value)),
        },
        None => now.year(),
    };

    let month: u32 = match params.first("month") {
        Some(value) => match value.parse() {
            Ok(month) => month,
            Err(_) => return error_response(400, format!("Invalid month: {}", value)),
        },
        None => now.month(),
    };

    let access_token = bearer_token(&event);

    let posts = match (access_token, state.config.spreadsheet_id.as_deref()) {
        (Some(token), Some(spreadsheet_id)) => {
            let reader = match GoogleSheetsReader::new(spreadsheet_id, token) {
                Ok(reader) => reader,
                Err(e) => return error_to_response(&e),
            };

            match resolve_month(&reader, &state.config.calendar_sheets(), year, month).await {
                Ok(posts) => posts,
                Err(e) => return error_to_response(&e),
            }
        }
        _ => {
            info!("No Google credentials, serving fixture posts");
            match month_label(year, month) {
                Ok(label) => fixture_posts(&label),
                Err(e) => return error_to_response(&e),
            }
        }
    };

    info!("Resolved {} posts for {}-{:02}", posts.len(), year, month);

    json_response(200, &serde_json::json!({ "posts": posts }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState {
        config: Config::from_env(),
    });

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
