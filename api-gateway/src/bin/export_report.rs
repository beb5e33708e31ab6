//! Export Report Lambda - stub.
//!
//! GET. PDF report generation is not implemented yet.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use tracing_subscriber::EnvFilter;

use shared::http::{error_to_response, preflight_response};

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    error_to_response(&shared::Error::NotImplemented("Report export"))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(handler)).await
}
