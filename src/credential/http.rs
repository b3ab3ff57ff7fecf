use super::fetcher::{ChannelId, CredentialFetcher, SessionCredential};
use crate::config::CredentialsConfig;
use crate::error::{CredentialError, CredentialFailure};
use anyhow::{bail, Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Response body from the issuing service
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "rtcToken")]
    pub rtc_token: String,
}

/// Fetches credentials with `GET {endpoint}/rtc/{channel}`
#[derive(Clone)]
pub struct HttpCredentialFetcher {
    client: Client,
    endpoint: Url,
}

impl HttpCredentialFetcher {
    /// Create a fetcher for the issuing service at `endpoint`.
    ///
    /// No timeout is applied unless `timeout` is set; a hung request then
    /// postpones the caller's transition indefinitely.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid credential endpoint: {}", endpoint))?;
        if endpoint.cannot_be_a_base() {
            bail!("Credential endpoint cannot be used as a base URL: {}", endpoint);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// Create a fetcher from the `[credentials]` config section
    pub fn from_config(config: &CredentialsConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.request_timeout())
    }

    fn token_url(&self, channel: &ChannelId) -> Url {
        let mut url = self.endpoint.clone();
        // Checked in `new`: the endpoint can be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("rtc").push(channel.as_str());
        }
        url
    }

    async fn handle_response(
        &self,
        channel: &ChannelId,
        response: reqwest::Response,
    ) -> Result<SessionCredential, CredentialFailure> {
        let status = response.status();

        if status.is_success() {
            let body: TokenResponse = response
                .json()
                .await
                .map_err(|e| CredentialFailure::Malformed(e.to_string()))?;

            if body.rtc_token.is_empty() {
                return Err(CredentialFailure::Malformed("empty token".to_string()));
            }

            Ok(SessionCredential::new(channel.clone(), body.rtc_token))
        } else {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %message, "Issuing service refused credential");
            Err(CredentialFailure::Denied {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl CredentialFetcher for HttpCredentialFetcher {
    #[instrument(skip_all, fields(channel = %channel))]
    async fn fetch(&self, channel: &ChannelId) -> Result<SessionCredential, CredentialError> {
        if channel.is_empty() {
            return Err(CredentialError::new(
                channel.clone(),
                CredentialFailure::EmptyChannel,
            ));
        }

        let url = self.token_url(channel);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "Credential request failed");
            CredentialError::new(channel.clone(), CredentialFailure::Network(e.to_string()))
        })?;

        let credential = self
            .handle_response(channel, response)
            .await
            .map_err(|cause| CredentialError::new(channel.clone(), cause))?;

        info!(credential = ?credential, "Credential fetched from issuing service");

        Ok(credential)
    }
}
