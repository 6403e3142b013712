use reqwest::{
    Client, RequestBuilder,
    header::{ACCEPT, AUTHORIZATION},
};
use serde_json::Value;
use url::Url;

use crate::config::OpenDataConfig;

/// Thin wrapper over one shared HTTP client. Every upstream call is a single
/// GET with a fixed timeout; any failure (network, non-2xx, bad JSON) is
/// logged once and collapsed into `None` so callers handle absence uniformly.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    github_token: Option<String>,
}

impl UpstreamClient {
    pub fn new(config: &OpenDataConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            github_token: config.github_token.clone(),
        })
    }

    pub async fn get_nws(&self, url: Url) -> Option<Value> {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/geo+json");
        self.get_json("nws", request).await
    }

    pub async fn get_github(&self, url: Url) -> Option<Value> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.github_token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }
        self.get_json("github", request).await
    }

    pub async fn get_rail(&self, url: Url) -> Option<Value> {
        self.get_json("indian-rail", self.client.get(url)).await
    }

    async fn get_json(&self, service: &str, request: RequestBuilder) -> Option<Value> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(service, error = %e, "upstream request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::error!(
                service,
                status = response.status().as_u16(),
                "upstream returned error status"
            );
            return None;
        }

        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(service, error = %e, "upstream body was not valid JSON");
                None
            }
        }
    }
}
