//! Update Post Lambda - stub.
//!
//! PUT with a required `id` query parameter and a JSON body of changed
//! fields. Spreadsheet writes are not implemented yet.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use tracing_subscriber::EnvFilter;

use shared::http::{error_response, error_to_response, preflight_response};
use shared::parse_body;

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let params = event.query_string_parameters();
    if params.first("id").is_none() {
        return error_response(400, "Missing post ID");
    }

    let _updates: serde_json::Value = parse_body!(event.body());

    error_to_response(&shared::Error::NotImplemented("Post update"))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(handler)).await
}
