use std::future::Future;

use reqwest::{StatusCode, Url};

use sealpost_types::api::{KeyExchangeDto, MessageDto, WireError};
use sealpost_types::{KeyExchangeEnvelope, MessageEnvelope};

use crate::error::ClientError;

/// The four relay operations, over raw envelopes.
pub trait RelayTransport: Send + Sync {
    fn post_message(
        &self,
        envelope: MessageEnvelope,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Drain the caller's queue. Empty means no mail.
    fn get_messages(
        &self,
        recipient_id: &str,
    ) -> impl Future<Output = Result<Vec<MessageEnvelope>, ClientError>> + Send;

    fn post_key_exchange(
        &self,
        envelope: KeyExchangeEnvelope,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Take the pending key offer, or `None` if nothing is waiting yet.
    fn get_key_exchange(
        &self,
        recipient_id: &str,
    ) -> impl Future<Output = Result<Option<KeyExchangeEnvelope>, ClientError>> + Send;
}

/// [`RelayTransport`] over the relay's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRelay {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Any 4xx means the relay refused the request itself and becomes
/// [`ClientError::Rejected`] carrying the status; 5xx stays a transport error.
fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_client_error() {
        return Err(ClientError::Rejected(status.to_string()));
    }
    Ok(resp.error_for_status()?)
}

impl RelayTransport for HttpRelay {
    async fn post_message(&self, envelope: MessageEnvelope) -> Result<(), ClientError> {
        let url = self.url(&["api", "messages"])?;
        let resp = self.client.post(url).json(&MessageDto::from(envelope)).send().await?;
        check(resp)?;
        Ok(())
    }

    async fn get_messages(&self, recipient_id: &str) -> Result<Vec<MessageEnvelope>, ClientError> {
        let url = self.url(&["api", "messages", recipient_id])?;
        let resp = check(self.client.get(url).send().await?)?;

        let dtos: Vec<MessageDto> = resp.json().await?;
        Ok(dtos
            .into_iter()
            .map(MessageDto::into_envelope)
            .collect::<Result<Vec<_>, WireError>>()?)
    }

    async fn post_key_exchange(&self, envelope: KeyExchangeEnvelope) -> Result<(), ClientError> {
        let url = self.url(&["api", "messages", "keyexchange"])?;
        let resp = self.client.post(url).json(&KeyExchangeDto::from(envelope)).send().await?;
        check(resp)?;
        Ok(())
    }

    async fn get_key_exchange(&self, recipient_id: &str) -> Result<Option<KeyExchangeEnvelope>, ClientError> {
        let url = self.url(&["api", "messages", "keyexchange", recipient_id])?;
        let resp = self.client.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let dto: KeyExchangeDto = check(resp)?.json().await?;
        Ok(Some(dto.into_envelope()?))
    }
}
