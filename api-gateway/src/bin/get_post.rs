//! Get Post Lambda - single post detail.
//!
//! GET with a required `id` query parameter (`{sheet_name}_{row_index}`).
//! Authenticated requests look the row up in the spreadsheet; without
//! credentials the read path degrades to an empty payload.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shared::calendar::post_from_row;
use shared::http::{bearer_token, error_response, error_to_response, json_response, preflight_response};
use shared::sheets::{GoogleSheetsReader, SheetReader};
use shared::Config;

struct AppState {
    config: Config,
}

/// Split a post id back into its sheet name and 1-based row index.
fn parse_post_id(id: &str) -> Option<(&str, usize)> {
    let (sheet_name, index) = id.rsplit_once('_')?;
    let row_index: usize = index.parse().ok()?;
    // Row 1 is the header; data ids start at row 2.
    if sheet_name.is_empty() || row_index < 2 {
        return None;
    }
    Some((sheet_name, row_index))
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let params = event.query_string_parameters();
    let Some(id) = params.first("id") else {
        return error_response(400, "Missing post ID");
    };

    let Some((sheet_name, row_index)) = parse_post_id(id) else {
        return error_response(400, format!("Invalid post ID: {}", id));
    };

    let access_token = bearer_token(&event);

    match (access_token, state.config.spreadsheet_id.as_deref()) {
        (Some(token), Some(spreadsheet_id)) => {
            let reader = match GoogleSheetsReader::new(spreadsheet_id, token) {
                Ok(reader) => reader,
                Err(e) => return error_to_response(&e),
            };

            let rows = match reader.read(sheet_name).await {
                Ok(rows) => rows,
                Err(e) => return error_to_response(&e),
            };

            let post = rows
                .get(row_index - 1)
                .and_then(|row| post_from_row(sheet_name, row_index, row));

            match post {
                Some(post) => {
                    info!("Found post {}", post.id);
                    json_response(200, &serde_json::json!({ "post": post }))
                }
                None => error_response(404, format!("Post not found: {}", id)),
            }
        }
        _ => json_response(200, &serde_json::json!({ "post": null })),
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_id() {
        assert_eq!(
            parse_post_id("Calendario Feed_7"),
            Some(("Calendario Feed", 7))
        );
        // Sheet names may themselves contain underscores.
        assert_eq!(parse_post_id("Feed_2026_3"), Some(("Feed_2026", 3)));
        assert_eq!(parse_post_id("Calendario Feed_1"), None);
        assert_eq!(parse_post_id("no-separator"), None);
        assert_eq!(parse_post_id("_5"), None);
    }
}
