// src/api/http.rs — JSON-over-HTTP client for the Ads API

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AdsApi, EstimateRequest, IdeaPage, IdeaSelector, KeywordEstimate};
use crate::infra::config::ApiConfig;
use crate::infra::errors::KeywordOptimizerError;

pub struct HttpAdsApi {
    endpoint: String,
    developer_token: String,
    client_customer_id: String,
    access_token: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct IdeasBody<'a> {
    selector: &'a IdeaSelector,
    offset: usize,
    page_size: usize,
}

#[derive(Deserialize)]
struct EstimatesBody {
    #[serde(default)]
    estimates: Vec<KeywordEstimate>,
}

impl HttpAdsApi {
    pub fn new(config: &ApiConfig) -> Result<Self, KeywordOptimizerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KeywordOptimizerError::Api {
                message: format!("Cannot build HTTP client: {}", e),
                retriable: false,
            })?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            developer_token: config.developer_token.clone(),
            client_customer_id: config.client_customer_id.clone(),
            access_token: config.access_token.clone().unwrap_or_default(),
            client,
        })
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, KeywordOptimizerError> {
        let url = format!("{}/{}", self.endpoint, path);
        tracing::debug!(%url, "Ads API request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("developer-token", &self.developer_token)
            .header("client-customer-id", &self.client_customer_id)
            .json(body)
            .send()
            .await
            .map_err(|e| KeywordOptimizerError::Api {
                message: format!("Problem while connecting to the Ads API: {}", e),
                retriable: e.is_timeout() || e.is_connect(),
            })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let text = resp.text().await.unwrap_or_default();
        Err(classify_status(status, retry_after, &text))
    }
}

/// Map a non-success HTTP status to an error, marking transient ones retriable.
fn classify_status(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> KeywordOptimizerError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return KeywordOptimizerError::RateLimited {
            retry_after_ms: retry_after_secs.unwrap_or(0) * 1000,
        };
    }
    KeywordOptimizerError::Api {
        message: format!(
            "HTTP {}: {}",
            status.as_u16(),
            body.chars().take(200).collect::<String>()
        ),
        retriable: status.is_server_error(),
    }
}

#[async_trait]
impl AdsApi for HttpAdsApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn keyword_ideas(
        &self,
        selector: &IdeaSelector,
        offset: usize,
        page_size: usize,
    ) -> Result<IdeaPage, KeywordOptimizerError> {
        let body = IdeasBody {
            selector,
            offset,
            page_size,
        };
        let resp = self.post("keyword-ideas", &body).await?;
        resp.json::<IdeaPage>()
            .await
            .map_err(|e| KeywordOptimizerError::Api {
                message: format!("Invalid keyword idea response: {}", e),
                retriable: false,
            })
    }

    async fn estimate_traffic(
        &self,
        request: &EstimateRequest,
    ) -> Result<Vec<KeywordEstimate>, KeywordOptimizerError> {
        let resp = self.post("traffic-estimates", request).await?;
        let body: EstimatesBody = resp.json().await.map_err(|e| KeywordOptimizerError::Api {
            message: format!("Invalid traffic estimate response: {}", e),
            retriable: false,
        })?;
        Ok(body.estimates)
    }
}
