//! HTTP helpers for Lambda functions.
//!
//! Every response carries the dashboard's CORS headers so the frontend can
//! call the functions from the browser.

use lambda_http::http::response::Builder;
use lambda_http::{Body, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Error;

/// Error response body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn builder_with_cors(status: u16) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
}

/// Response to a CORS preflight request: 200, empty body.
pub fn preflight_response() -> Result<Response<Body>, lambda_http::Error> {
    Ok(builder_with_cors(200)
        .body(Body::Empty)
        .expect("Failed to build response"))
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(builder_with_cors(status)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))
        .expect("Failed to build response"))
}

/// Create an error response with the given status code and message.
pub fn error_response(
    status: u16,
    message: impl Into<String>,
) -> Result<Response<Body>, lambda_http::Error> {
    json_response(
        status,
        &ErrorBody {
            error: message.into(),
        },
    )
}

/// Map a domain error onto its HTTP response.
pub fn error_to_response(err: &Error) -> Result<Response<Body>, lambda_http::Error> {
    error_response(err.status_code(), err.to_string())
}

/// Extract a `Bearer` token from the Authorization header, if present.
pub fn bearer_token(event: &Request) -> Option<String> {
    event
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Parse request body as JSON, returning a 400 response on failure.
///
/// Returns `Ok(Ok(T))` on successful parse, `Ok(Err(Response))` on parse
/// error (400), or `Err(lambda_http::Error)` on serialization failure.
pub fn parse_json_body<T: DeserializeOwned>(
    body: &Body,
) -> Result<Result<T, Response<Body>>, lambda_http::Error> {
    match serde_json::from_slice(body.as_ref()) {
        Ok(parsed) => Ok(Ok(parsed)),
        Err(e) => {
            let response = error_response(400, format!("Invalid request body: {}", e))?;
            Ok(Err(response))
        }
    }
}

/// Macro to parse request body, returning early with 400 on parse error.
///
/// Usage:
/// ```ignore
/// let request: MyRequest = parse_body!(event.body());
/// ```
#[macro_export]
macro_rules! parse_body {
    ($body:expr) => {
        match shared::http::parse_json_body($body)? {
            Ok(parsed) => parsed,
            Err(response) => return Ok(response),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        let request = lambda_http::http::Request::builder()
            .header("Authorization", "Bearer ya29.token")
            .body(Body::Empty)
            .unwrap();
        assert_eq!(bearer_token(&request), Some("ya29.token".to_string()));
    }

    #[test]
    fn test_bearer_token_missing_scheme() {
        let request = lambda_http::http::Request::builder()
            .header("Authorization", "Basic dXNlcg==")
            .body(Body::Empty)
            .unwrap();
        assert_eq!(bearer_token(&request), None);
    }
}
