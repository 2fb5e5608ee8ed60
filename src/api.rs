use crate::dashboard::DashboardPayload;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status { status: reqwest::StatusCode, url: String },
    #[error("invalid dashboard payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce a team lead's task dashboard.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_dashboard(&self, team_lead_id: &str) -> Result<DashboardPayload, FetchError>;
}

/// Reads the dashboard from the task backend over HTTP.
pub struct HttpDashboardSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDashboardSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn dashboard_url(&self, team_lead_id: &str) -> String {
        format!("{}/task/getTaskDashboard/{}", self.base_url, team_lead_id)
    }
}

#[async_trait]
impl DashboardSource for HttpDashboardSource {
    async fn fetch_dashboard(&self, team_lead_id: &str) -> Result<DashboardPayload, FetchError> {
        let url = self.dashboard_url(team_lead_id);
        debug!(%url, "requesting task dashboard");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }
        let body = response.text().await?;
        Ok(DashboardPayload::from_json(&body)?)
    }
}
