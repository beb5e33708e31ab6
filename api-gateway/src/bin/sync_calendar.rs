//! Sync Calendar Lambda - stub.
//!
//! POST. Pushing dashboard edits back into the spreadsheet is not
//! implemented yet; reads go through the calendar-month resolver instead.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use tracing_subscriber::EnvFilter;

use shared::http::{error_to_response, preflight_response};

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    error_to_response(&shared::Error::NotImplemented("Calendar sync"))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(handler)).await
}
