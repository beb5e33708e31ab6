//! Meta Ads Graph API client.
//!
//! Thin pass-through over the v21.0 Graph API. Metric fields arrive as
//! strings and parse to numbers, defaulting to zero when absent.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{Error, Result};

const GRAPH_BASE: &str = "https://graph.facebook.com/v21.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const INSIGHT_FIELDS: &str = "impressions,clicks,ctr,cpc,cpm,spend";

/// One insights row.
#[derive(Debug, Default, Deserialize)]
pub struct Insights {
    impressions: Option<String>,
    clicks: Option<String>,
    ctr: Option<String>,
    cpc: Option<String>,
    cpm: Option<String>,
    spend: Option<String>,
}

fn metric_i64(value: &Option<String>) -> i64 {
    value.as_deref().and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn metric_f64(value: &Option<String>) -> f64 {
    value.as_deref().and_then(|v| v.parse().ok()).unwrap_or(0.0)
}

impl Insights {
    pub fn impressions(&self) -> i64 {
        metric_i64(&self.impressions)
    }

    pub fn clicks(&self) -> i64 {
        metric_i64(&self.clicks)
    }

    pub fn ctr(&self) -> f64 {
        metric_f64(&self.ctr)
    }

    pub fn cpc(&self) -> f64 {
        metric_f64(&self.cpc)
    }

    pub fn cpm(&self) -> f64 {
        metric_f64(&self.cpm)
    }

    pub fn spend(&self) -> f64 {
        metric_f64(&self.spend)
    }
}

/// Campaign record as returned by the campaign edge.
#[derive(Debug, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: Option<String>,
    pub objective: Option<String>,
    pub status: Option<String>,
    pub daily_budget: Option<String>,
}

/// Ad-account metadata, used by the health check.
#[derive(Debug, Deserialize)]
pub struct AccountInfo {
    pub name: Option<String>,
    pub account_status: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: Option<String>,
}

pub struct MetaAdsClient {
    client: reqwest::Client,
    access_token: String,
    ad_account_id: String,
}

impl MetaAdsClient {
    pub fn new(access_token: impl Into<String>, ad_account_id: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.into(),
            ad_account_id: ad_account_id.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(&[("access_token", self.access_token.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<GraphErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("Graph API returned {}", status));
            return Err(Error::Upstream(message));
        }

        Ok(response.json().await?)
    }

    /// Account-level insights for a date range (`YYYY-MM-DD` bounds).
    pub async fn get_insights(&self, since: &str, until: &str) -> Result<Insights> {
        let url = format!("{}/{}/insights", GRAPH_BASE, self.ad_account_id);
        let time_range = format!(r#"{{"since":"{}","until":"{}"}}"#, since, until);

        let envelope: DataEnvelope<Insights> = self
            .get_json(
                &url,
                &[("fields", INSIGHT_FIELDS), ("time_range", &time_range)],
            )
            .await?;

        Ok(envelope.data.into_iter().next().unwrap_or_default())
    }

    /// Lifetime spend/ctr insights for one campaign.
    pub async fn get_campaign_insights(&self, campaign_id: &str) -> Result<Insights> {
        let url = format!("{}/{}/insights", GRAPH_BASE, campaign_id);

        let envelope: DataEnvelope<Insights> =
            self.get_json(&url, &[("fields", "spend,ctr")]).await?;

        Ok(envelope.data.into_iter().next().unwrap_or_default())
    }

    /// List campaigns in the ad account with the requested fields.
    pub async fn get_campaigns(&self, fields: &str) -> Result<Vec<Campaign>> {
        let url = format!("{}/{}/campaigns", GRAPH_BASE, self.ad_account_id);

        let envelope: DataEnvelope<Campaign> =
            self.get_json(&url, &[("fields", fields)]).await?;

        Ok(envelope.data)
    }

    /// Pause one campaign.
    pub async fn pause_campaign(&self, campaign_id: &str) -> Result<()> {
        let url = format!("{}/{}", GRAPH_BASE, campaign_id);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("access_token", self.access_token.as_str()),
                ("status", "PAUSED"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Failed to pause campaign {}: {}",
                campaign_id,
                response.status()
            )));
        }

        Ok(())
    }

    /// Ad-account name and status, used by the health check.
    pub async fn account_status(&self) -> Result<AccountInfo> {
        let url = format!("{}/{}", GRAPH_BASE, self.ad_account_id);
        self.get_json(&url, &[("fields", "name,account_status")])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insights_parse_string_metrics() {
        let json = r#"{"impressions":"10543","clicks":"312","ctr":"2.96","spend":"148.72"}"#;
        let insights: Insights = serde_json::from_str(json).unwrap();
        assert_eq!(insights.impressions(), 10543);
        assert_eq!(insights.clicks(), 312);
        assert!((insights.ctr() - 2.96).abs() < f64::EPSILON);
        assert!((insights.spend() - 148.72).abs() < f64::EPSILON);
        assert_eq!(insights.cpc(), 0.0);
    }

    #[test]
    fn test_empty_data_envelope() {
        let json = r#"{"data":[]}"#;
        let envelope: DataEnvelope<Insights> = serde_json::from_str(json).unwrap();
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn test_campaign_optional_fields() {
        let json = r#"{"id":"1200","name":"Awareness Q3"}"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.id, "1200");
        assert_eq!(campaign.objective, None);
        assert_eq!(campaign.status, None);
    }
}
