pub mod models;
pub mod operations;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

pub use models::{MailboxError, MailboxStats};

use models::RecipientSlot;

/// In-memory, per-recipient holding area for envelopes awaiting a fetch.
///
/// Cheap to clone; all clones share the same state. Create one at process start
/// and drop it at shutdown. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct Mailbox {
    inner: Arc<MailboxInner>,
}

#[derive(Default)]
struct MailboxInner {
    /// recipient_id -> that recipient's queue and key-exchange slot.
    /// Slots are never removed, so a handle cloned out of the map stays the
    /// live slot for that recipient.
    slots: RwLock<HashMap<String, Arc<Mutex<RecipientSlot>>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slot for `recipient_id`, creating it on first use.
    fn slot(&self, recipient_id: &str) -> Arc<Mutex<RecipientSlot>> {
        if let Some(slot) = self.inner.slots.read().get(recipient_id) {
            return slot.clone();
        }

        let mut slots = self.inner.slots.write();
        slots
            .entry(recipient_id.to_string())
            .or_insert_with(|| {
                debug!("Creating mailbox for {}", recipient_id);
                Arc::new(Mutex::new(RecipientSlot::default()))
            })
            .clone()
    }

    /// Get the slot for `recipient_id` without creating one.
    fn existing_slot(&self, recipient_id: &str) -> Option<Arc<Mutex<RecipientSlot>>> {
        self.inner.slots.read().get(recipient_id).cloned()
    }

    /// Run `f` against every slot. Takes each slot lock in turn, never two at once.
    fn for_each_slot(&self, mut f: impl FnMut(&RecipientSlot)) {
        let slots: Vec<_> = self.inner.slots.read().values().cloned().collect();
        for slot in slots {
            f(&slot.lock());
        }
    }
}
