use analytics_store::AnalyticsSnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct TrackRequest {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No access code configured; run `docs-analytics login <code>` or pass --code")]
    MissingAccessCode,
    #[error("The server rejected the access code")]
    Unauthorized,
    #[error("Unexpected response {0}: {1}")]
    UnexpectedStatus(u16, String),
    #[error("Request failed: {0}")]
    Transport(String),
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(401, _) => ClientError::Unauthorized,
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                ClientError::UnexpectedStatus(code, body)
            }
            ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct DashboardClient {
    base_url: String,
    access_code: Option<String>,
}

impl DashboardClient {
    pub fn new(base_url: String, access_code: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_code,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health_check(&self) -> Result<bool, ClientError> {
        let url = format!("{}/", self.base_url);
        let response = ureq::get(&url).call()?;

        Ok(response.status() == 200)
    }

    pub fn fetch_analytics(&self) -> Result<AnalyticsSnapshot, ClientError> {
        let code = self
            .access_code
            .as_deref()
            .ok_or(ClientError::MissingAccessCode)?;

        let url = format!("{}/api/analytics/data", self.base_url);
        let response = ureq::get(&url)
            .set("Authorization", &format!("Bearer {}", code))
            .call()?;

        response
            .into_json()
            .map_err(|e| ClientError::Transport(format!("Failed to parse analytics: {}", e)))
    }

    pub fn track(&self, request: &TrackRequest) -> Result<bool, ClientError> {
        let url = format!("{}/api/analytics/track", self.base_url);
        let response = ureq::post(&url).send_json(request)?;

        let body: TrackResponse = response
            .into_json()
            .map_err(|e| ClientError::Transport(format!("Failed to parse response: {}", e)))?;
        Ok(body.success)
    }
}
