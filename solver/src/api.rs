use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;

use crate::api_trait::SolverApi;

/// A solving service reached with `GET {url}?cube={facelets}`.
#[derive(Debug, Clone)]
pub struct HttpSolverEndpoint {
    url: String,
    client: reqwest::Client,
}

impl HttpSolverEndpoint {
    pub fn new(url: String) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: String, client: reqwest::Client) -> Self {
        Self { url, client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SolverApi for HttpSolverEndpoint {
    fn name(&self) -> &str {
        &self.url
    }

    async fn request(&self, facelets: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("cube", facelets)])
            .send()
            .await
            .with_context(|| format!("Failed to send solve request to {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Solve request to {} failed with status {}: {}",
                self.url,
                status,
                text
            ));
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read solve response from {}", self.url))
    }
}
