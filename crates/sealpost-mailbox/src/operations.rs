use std::mem;

use sealpost_types::{KeyExchangeEnvelope, MessageEnvelope};

use crate::Mailbox;
use crate::models::{MailboxError, MailboxStats};

impl Mailbox {
    // -- Messages --

    /// Append to the recipient's queue, creating it if absent.
    pub fn deposit_message(&self, envelope: MessageEnvelope) {
        let slot = self.slot(&envelope.recipient_id);
        slot.lock().messages.push_back(envelope);
    }

    /// Take every pending message for the recipient, in arrival order.
    ///
    /// The snapshot and the clear happen under one lock, so a concurrent deposit
    /// lands either in this result or in the next one. An unknown recipient
    /// simply has no mail.
    pub fn fetch_and_clear_messages(&self, recipient_id: &str) -> Vec<MessageEnvelope> {
        let Some(slot) = self.existing_slot(recipient_id) else {
            return Vec::new();
        };

        let drained = mem::take(&mut slot.lock().messages);
        drained.into()
    }

    // -- Key exchange --

    /// Store a key offer for the recipient. Only the latest unconsumed offer
    /// survives. Returns true if an earlier one was replaced.
    pub fn deposit_key_exchange(&self, envelope: KeyExchangeEnvelope) -> bool {
        let slot = self.slot(&envelope.recipient_id);
        let replaced = slot.lock().key_exchange.replace(envelope);
        replaced.is_some()
    }

    /// Take the pending key offer for the recipient.
    pub fn fetch_and_remove_key_exchange(
        &self,
        recipient_id: &str,
    ) -> Result<KeyExchangeEnvelope, MailboxError> {
        self.existing_slot(recipient_id)
            .and_then(|slot| slot.lock().key_exchange.take())
            .ok_or_else(|| MailboxError::NotFound(recipient_id.to_string()))
    }

    // -- Stats --

    pub fn stats(&self) -> MailboxStats {
        let mut stats = MailboxStats::default();
        self.for_each_slot(|slot| {
            stats.recipients += 1;
            stats.pending_messages += slot.messages.len();
            if slot.key_exchange.is_some() {
                stats.pending_key_exchanges += 1;
            }
        });
        stats
    }
}
