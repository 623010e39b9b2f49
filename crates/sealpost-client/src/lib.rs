//! Client side of the relay protocol.
//!
//! A [`Participant`] owns its key pair and the session keys it has established,
//! and talks to a relay through any [`RelayTransport`]. Keys never leave the
//! participant; the relay only ever sees wrapped keys and ciphertext.

pub mod error;
pub mod participant;
pub mod transport;

pub use error::ClientError;
pub use participant::{Participant, Received, RejectReason};
pub use transport::{HttpRelay, RelayTransport};
