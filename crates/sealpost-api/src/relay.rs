use axum::http::StatusCode;
use thiserror::Error;
use tracing::warn;

use sealpost_mailbox::{Mailbox, MailboxError};
use sealpost_types::{KeyExchangeEnvelope, MessageEnvelope};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("no pending key exchange for {0}")]
    NotFound(String),
}

impl From<MailboxError> for RelayError {
    fn from(err: MailboxError) -> Self {
        match err {
            MailboxError::NotFound(recipient_id) => Self::NotFound(recipient_id),
        }
    }
}

impl From<RelayError> for StatusCode {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// The relay's boundary operations. Validates identifiers and hands everything
/// else to the [`Mailbox`] untouched; ciphertext and wrapped keys are opaque here.
#[derive(Clone, Default)]
pub struct RelayApi {
    mailbox: Mailbox,
}

impl RelayApi {
    pub fn new(mailbox: Mailbox) -> Self {
        Self { mailbox }
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn post_message(&self, envelope: MessageEnvelope) -> Result<(), RelayError> {
        require_id(&envelope.sender_id, "sender id cannot be empty")?;
        require_id(&envelope.recipient_id, "recipient id cannot be empty")?;

        self.mailbox.deposit_message(envelope);
        Ok(())
    }

    pub fn get_messages(&self, recipient_id: &str) -> Result<Vec<MessageEnvelope>, RelayError> {
        require_id(recipient_id, "user id cannot be empty")?;

        Ok(self.mailbox.fetch_and_clear_messages(recipient_id))
    }

    pub fn post_key_exchange(&self, envelope: KeyExchangeEnvelope) -> Result<(), RelayError> {
        require_id(&envelope.sender_id, "sender id cannot be empty")?;
        require_id(&envelope.recipient_id, "recipient id cannot be empty")?;
        if envelope.wrapped_key.is_empty() {
            return Err(RelayError::InvalidInput("wrapped key cannot be empty"));
        }

        let recipient_id = envelope.recipient_id.clone();
        if self.mailbox.deposit_key_exchange(envelope) {
            warn!("Pending key offer for {} replaced by a newer one", recipient_id);
        }
        Ok(())
    }

    pub fn get_key_exchange(&self, recipient_id: &str) -> Result<KeyExchangeEnvelope, RelayError> {
        require_id(recipient_id, "user id cannot be empty")?;

        Ok(self.mailbox.fetch_and_remove_key_exchange(recipient_id)?)
    }
}

/// Identifiers that are empty or whitespace-only never reach the mailbox.
fn require_id(id: &str, reason: &'static str) -> Result<(), RelayError> {
    if id.trim().is_empty() {
        return Err(RelayError::InvalidInput(reason));
    }
    Ok(())
}
