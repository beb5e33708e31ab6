//! Campaigns Lambda - campaign list with spend and CTR.
//!
//! GET. Without Meta credentials the response is an empty list.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shared::http::{error_to_response, json_response, preflight_response};
use shared::meta::MetaAdsClient;
use shared::Config;

#[derive(Debug, Serialize)]
struct CampaignSummary {
    id: String,
    name: String,
    objective: String,
    status: String,
    spend: f64,
    ctr: f64,
}

#[derive(Debug, Serialize)]
struct CampaignsResponse {
    campaigns: Vec<CampaignSummary>,
}

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
        return json_response(200, &CampaignsResponse { campaigns: vec![] });
    };

    let campaigns = match meta
        .get_campaigns("id,name,objective,status,daily_budget")
        .await
    {
        Ok(campaigns) => campaigns,
        Err(e) => return error_to_response(&e),
    };

    let mut summaries = Vec::with_capacity(campaigns.len());

    for campaign in campaigns {
        let insights = match meta.get_campaign_insights(&campaign.id).await {
            Ok(insights) => insights,
            Err(e) => {
                warn!("No insights for campaign {}: {}", campaign.id, e);
                Default::default()
            }
        };

        summaries.push(CampaignSummary {
            id: campaign.id,
            name: campaign.name.unwrap_or_else(|| "Unnamed".to_string()),
            objective: campaign.objective.unwrap_or_else(|| "N/A".to_string()),
            status: campaign.status.unwrap_or_else(|| "PAUSED".to_string()),
            spend: insights.spend(),
            ctr: insights.ctr(),
        });
    }

    info!("Listed {} campaigns", summaries.len());

    json_response(200, &CampaignsResponse { campaigns: summaries })
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
