//! Configuration management for Lambda functions.

use std::env;

use crate::{Error, Result};

/// Application configuration loaded from environment variables.
///
/// Resolved once at startup and injected into handlers; credentials that
/// are absent stay `None` so read paths can degrade gracefully.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client id
    pub google_client_id: Option<String>,
    /// Google OAuth client secret
    pub google_client_secret: Option<String>,
    /// OAuth redirect URI registered with Google
    pub google_redirect_uri: Option<String>,
    /// Id of the spreadsheet backing the content calendar
    pub spreadsheet_id: Option<String>,
    /// Name of the feed-posts sheet tab
    pub feed_sheet: String,
    /// Name of the stories sheet tab
    pub stories_sheet: String,
    /// Meta Ads access token
    pub meta_access_token: Option<String>,
    /// Meta Ads ad-account id
    pub meta_ad_account_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI").ok(),
            spreadsheet_id: env::var("GOOGLE_SPREADSHEET_ID").ok(),
            feed_sheet: env::var("CALENDAR_FEED_SHEET")
                .unwrap_or_else(|_| "Calendario Feed".to_string()),
            stories_sheet: env::var("CALENDAR_STORIES_SHEET")
                .unwrap_or_else(|_| "Calendario Stories IG".to_string()),
            meta_access_token: env::var("META_ACCESS_TOKEN").ok(),
            meta_ad_account_id: env::var("META_AD_ACCOUNT_ID").ok(),
        }
    }

    /// The two calendar sheets to consult, feed sheet first.
    pub fn calendar_sheets(&self) -> [&str; 2] {
        [&self.feed_sheet, &self.stories_sheet]
    }

    /// Google OAuth client credentials, if configured.
    pub fn google_oauth(&self) -> Result<(&str, &str)> {
        match (&self.google_client_id, &self.google_client_secret) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(Error::NotConfigured("Google OAuth")),
        }
    }

    /// Meta Ads credentials, if configured.
    pub fn meta(&self) -> Option<(&str, &str)> {
        match (&self.meta_access_token, &self.meta_ad_account_id) {
            (Some(token), Some(account)) => Some((token, account)),
            _ => None,
        }
    }
}
