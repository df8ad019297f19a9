//! Upstream HTTP client.

use std::time::Duration;

use axum::body::Bytes;
use reqwest::{multipart::Form, StatusCode, Url};

use crate::config::UpstreamConfig;
use crate::relay::error::RelayError;
use crate::relay::upload::Upload;

/// Sends uploads to the configured ingestion endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: Url,
    field_name: String,
}

impl UpstreamClient {
    /// Build the client from config.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let url = Url::parse(&config.url).map_err(|source| RelayError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(RelayError::Client)?;

        Ok(Self {
            client,
            url,
            field_name: config.field_name.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST the upload once and return the body of a 200 response.
    pub async fn forward(&self, upload: Upload) -> Result<Bytes, RelayError> {
        let form = Form::new().part(self.field_name.clone(), upload.into_part());

        let response = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(RelayError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RelayError::Status(status));
        }

        response.bytes().await.map_err(RelayError::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_url() {
        let config = UpstreamConfig {
            url: "::not-a-url".into(),
            ..UpstreamConfig::default()
        };

        let err = UpstreamClient::from_config(&config).unwrap_err();
        assert!(matches!(err, RelayError::InvalidUrl { .. }));
        assert_eq!(err.kind(), "setup");
    }

    #[test]
    fn keeps_configured_endpoint() {
        let client = UpstreamClient::from_config(&UpstreamConfig::default()).unwrap();
        assert_eq!(client.url().as_str(), "http://34.29.113.34:8080/img");
    }
}
