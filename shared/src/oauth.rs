//! Google OAuth2 client: authorization URL construction, code exchange,
//! refresh-token exchange, and userinfo lookup.
//!
//! Tokens are returned to the frontend as-is; nothing is stored or rotated
//! server-side.

use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SCOPES: [&str; 5] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.readonly",
    "openid",
    "email",
    "profile",
];

/// Google token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// Google token endpoint failure body.
#[derive(Debug, Deserialize)]
struct TokenError {
    error: Option<String>,
    error_description: Option<String>,
}

/// Authenticated user's profile from the userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

pub struct GoogleOAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: Option<String>,
}

impl GoogleOAuthClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
        })
    }

    fn redirect_uri(&self) -> Result<&str> {
        self.redirect_uri
            .as_deref()
            .ok_or(Error::NotConfigured("OAuth redirect URI"))
    }

    /// Build the authorization URL the user is redirected to.
    pub fn auth_url(&self) -> Result<String> {
        let redirect_uri = self.redirect_uri()?;
        let scopes = SCOPES.join(" ");

        Ok(format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&\
             access_type=offline&prompt=consent",
            AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes)
        ))
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let redirect_uri = self.redirect_uri()?.to_string();
        let params = [
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        self.token_request(&params, "Token exchange failed").await
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let params = [
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("grant_type", "refresh_token"),
        ];

        self.token_request(&params, "Token refresh failed").await
    }

    async fn token_request(
        &self,
        params: &[(&str, &str)],
        failure: &str,
    ) -> Result<TokenResponse> {
        let response = self.client.post(TOKEN_URL).form(params).send().await?;

        if !response.status().is_success() {
            let detail = response
                .json::<TokenError>()
                .await
                .ok()
                .and_then(|e| e.error_description.or(e.error));
            // Google rejects bad codes and revoked refresh tokens with a
            // descriptive body; surface it as a client error.
            return Err(Error::Validation(
                detail.unwrap_or_else(|| failure.to_string()),
            ));
        }

        Ok(response.json().await?)
    }

    /// Fetch the profile of the user the access token belongs to.
    pub async fn userinfo(&self, access_token: &str) -> Result<UserInfo> {
        let response = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Upstream("Invalid or expired token".to_string()));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_url_parameters() {
        let client = GoogleOAuthClient::new(
            "client-123",
            "secret",
            Some("https://dash.example.com/auth/callback".to_string()),
        )
        .unwrap();

        let url = client.auth_url().unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fdash.example.com%2Fauth%2Fcallback"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fspreadsheets"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
    }

    #[test]
    fn test_auth_url_requires_redirect_uri() {
        let client = GoogleOAuthClient::new("client-123", "secret", None).unwrap();
        let err = client.auth_url().unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
