use std::collections::VecDeque;

use sealpost_types::{KeyExchangeEnvelope, MessageEnvelope};

/// Everything pending for one recipient. Guarded by its own mutex.
#[derive(Debug, Default)]
pub(crate) struct RecipientSlot {
    /// Pending messages in arrival order.
    pub messages: VecDeque<MessageEnvelope>,
    /// Most recent unconsumed key offer. A new deposit replaces it.
    pub key_exchange: Option<KeyExchangeEnvelope>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MailboxError {
    #[error("no pending key exchange for {0}")]
    NotFound(String),
}

/// Point-in-time counts across all recipients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailboxStats {
    pub recipients: usize,
    pub pending_messages: usize,
    pub pending_key_exchanges: usize,
}
