use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{AppError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    pub status: u16,
    /// `None` when the body is not valid JSON.
    pub json: Option<serde_json::Value>,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Cheap request/JSON-response primitive used before falling back to a browser.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)], timeout: Duration) -> Result<ProbeResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn get(&self, url: &str, headers: &[(&str, &str)], timeout: Duration) -> Result<ProbeResponse> {
        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| AppError::Probe {
            endpoint: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| AppError::Probe {
            endpoint: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(ProbeResponse {
            status,
            json: serde_json::from_slice(&body).ok(),
        })
    }
}
