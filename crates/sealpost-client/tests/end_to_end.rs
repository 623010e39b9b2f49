//! End-to-end: two participants establish a session through the relay and
//! exchange messages, both in-process and over HTTP on loopback.

use std::sync::LazyLock;

use sealpost_api::{RelayApi, RelayError, router};
use sealpost_client::{ClientError, HttpRelay, Participant, Received, RejectReason, RelayTransport};
use sealpost_crypto::{CryptoError, CryptoProvider, HybridCipher, KeyPair, RustCryptoProvider};
use sealpost_types::{KeyExchangeEnvelope, MessageEnvelope};

// RSA generation is slow in debug builds; generate each pair once.
static ALICE_KEYS: LazyLock<KeyPair> = LazyLock::new(|| RustCryptoProvider.generate_key_pair().unwrap());
static BOB_KEYS: LazyLock<KeyPair> = LazyLock::new(|| RustCryptoProvider.generate_key_pair().unwrap());
static EVE_KEYS: LazyLock<KeyPair> = LazyLock::new(|| RustCryptoProvider.generate_key_pair().unwrap());

fn participant(user_id: &str, keys: &KeyPair) -> Participant {
    Participant::with_key_pair(user_id, keys.clone(), HybridCipher::new())
}

/// Calls the relay operations directly, no HTTP in between.
struct InProcess(RelayApi);

fn rejected(e: RelayError) -> ClientError {
    ClientError::Rejected(e.to_string())
}

impl RelayTransport for InProcess {
    async fn post_message(&self, envelope: MessageEnvelope) -> Result<(), ClientError> {
        self.0.post_message(envelope).map_err(rejected)
    }

    async fn get_messages(&self, recipient_id: &str) -> Result<Vec<MessageEnvelope>, ClientError> {
        self.0.get_messages(recipient_id).map_err(rejected)
    }

    async fn post_key_exchange(&self, envelope: KeyExchangeEnvelope) -> Result<(), ClientError> {
        self.0.post_key_exchange(envelope).map_err(rejected)
    }

    async fn get_key_exchange(&self, recipient_id: &str) -> Result<Option<KeyExchangeEnvelope>, ClientError> {
        match self.0.get_key_exchange(recipient_id) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(RelayError::NotFound(_)) => Ok(None),
            Err(e) => Err(rejected(e)),
        }
    }
}

/// A malicious relay that flips one bit of every ciphertext it stores.
struct Tampering(InProcess);

impl RelayTransport for Tampering {
    async fn post_message(&self, mut envelope: MessageEnvelope) -> Result<(), ClientError> {
        envelope.ciphertext[0] ^= 0x01;
        self.0.post_message(envelope).await
    }

    async fn get_messages(&self, recipient_id: &str) -> Result<Vec<MessageEnvelope>, ClientError> {
        self.0.get_messages(recipient_id).await
    }

    async fn post_key_exchange(&self, envelope: KeyExchangeEnvelope) -> Result<(), ClientError> {
        self.0.post_key_exchange(envelope).await
    }

    async fn get_key_exchange(&self, recipient_id: &str) -> Result<Option<KeyExchangeEnvelope>, ClientError> {
        self.0.get_key_exchange(recipient_id).await
    }
}

async fn hello_scenario<T: RelayTransport>(relay: &T) {
    let mut alice = participant("alice", &ALICE_KEYS);
    let mut bob = participant("bob", &BOB_KEYS);

    // Nothing pending yet: a normal outcome, not an error.
    assert_eq!(alice.accept_session(relay).await.unwrap(), None);
    assert!(alice.receive(relay).await.unwrap().is_empty());

    bob.offer_session(relay, alice.user_id(), alice.public_key()).await.unwrap();
    assert_eq!(alice.accept_session(relay).await.unwrap().as_deref(), Some(bob.user_id()));
    assert!(alice.has_session("bob"));

    bob.send(relay, "alice", b"hello").await.unwrap();

    let received = alice.receive(relay).await.unwrap();
    assert_eq!(
        received,
        vec![Received::Message { sender_id: "bob".into(), plaintext: b"hello".to_vec() }]
    );

    // Drained exactly once.
    assert!(alice.receive(relay).await.unwrap().is_empty());

    // The same session key works in the other direction.
    alice.send(relay, "bob", b"hi bob").await.unwrap();
    let reply = bob.receive(relay).await.unwrap();
    assert_eq!(
        reply,
        vec![Received::Message { sender_id: "alice".into(), plaintext: b"hi bob".to_vec() }]
    );
}

#[tokio::test]
async fn hello_in_process() {
    hello_scenario(&InProcess(RelayApi::default())).await;
}

/// Serve a fresh relay on a loopback port and point an [`HttpRelay`] at it.
async fn spawn_relay() -> HttpRelay {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(RelayApi::default())).await.unwrap();
    });
    HttpRelay::new(&format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn hello_over_http() {
    let relay = spawn_relay().await;
    hello_scenario(&relay).await;
}

#[tokio::test]
async fn refused_requests_over_http_are_rejections() {
    let relay = spawn_relay().await;

    let err = relay
        .post_key_exchange(KeyExchangeEnvelope {
            sender_id: "bob".into(),
            recipient_id: " ".into(),
            wrapped_key: vec![1u8; 256],
        })
        .await
        .unwrap_err();
    assert!(matches!(&err, ClientError::Rejected(status) if status.starts_with("400")), "{:?}", err);

    let err = relay
        .post_message(MessageEnvelope {
            sender_id: String::new(),
            recipient_id: "alice".into(),
            nonce: vec![0u8; 12],
            ciphertext: vec![0u8; 32],
        })
        .await
        .unwrap_err();
    assert!(matches!(&err, ClientError::Rejected(status) if status.starts_with("400")), "{:?}", err);
}

#[tokio::test]
async fn messages_arrive_in_order() {
    let relay = InProcess(RelayApi::default());
    let mut alice = participant("alice", &ALICE_KEYS);
    let mut bob = participant("bob", &BOB_KEYS);

    bob.offer_session(&relay, "alice", alice.public_key()).await.unwrap();
    alice.accept_session(&relay).await.unwrap();

    for i in 0..10 {
        bob.send(&relay, "alice", format!("message {}", i).as_bytes()).await.unwrap();
    }

    let texts: Vec<String> = alice
        .receive(&relay)
        .await
        .unwrap()
        .into_iter()
        .map(|r| match r {
            Received::Message { plaintext, .. } => String::from_utf8(plaintext).unwrap(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    let expected: Vec<String> = (0..10).map(|i| format!("message {}", i)).collect();
    assert_eq!(texts, expected);
}

#[tokio::test]
async fn tampered_messages_are_rejected_without_plaintext() {
    let relay = Tampering(InProcess(RelayApi::default()));
    let mut alice = participant("alice", &ALICE_KEYS);
    let mut bob = participant("bob", &BOB_KEYS);

    bob.offer_session(&relay, "alice", alice.public_key()).await.unwrap();
    alice.accept_session(&relay).await.unwrap();

    bob.send(&relay, "alice", b"transfer 10 coins").await.unwrap();
    bob.send(&relay, "alice", b"again").await.unwrap();

    let received = alice.receive(&relay).await.unwrap();
    assert_eq!(received.len(), 2);
    for r in received {
        assert_eq!(r, Received::Rejected { sender_id: "bob".into(), reason: RejectReason::Tampered });
    }
}

#[tokio::test]
async fn messages_without_a_session_are_rejected() {
    let relay = InProcess(RelayApi::default());
    let alice = participant("alice", &ALICE_KEYS);

    // Eve never offered Alice a session; she encrypts under a key of her own.
    let cipher = HybridCipher::new();
    let sealed = cipher.encrypt(b"spoof", &cipher.generate_session_key().unwrap()).unwrap();
    relay
        .post_message(MessageEnvelope {
            sender_id: "eve".into(),
            recipient_id: "alice".into(),
            nonce: sealed.nonce.to_vec(),
            ciphertext: sealed.ciphertext,
        })
        .await
        .unwrap();

    let received = alice.receive(&relay).await.unwrap();
    assert_eq!(
        received,
        vec![Received::Rejected { sender_id: "eve".into(), reason: RejectReason::NoSession }]
    );
}

#[tokio::test]
async fn malformed_nonce_is_rejected() {
    let relay = InProcess(RelayApi::default());
    let mut alice = participant("alice", &ALICE_KEYS);
    let mut bob = participant("bob", &BOB_KEYS);

    bob.offer_session(&relay, "alice", alice.public_key()).await.unwrap();
    alice.accept_session(&relay).await.unwrap();

    relay
        .post_message(MessageEnvelope {
            sender_id: "bob".into(),
            recipient_id: "alice".into(),
            nonce: vec![0u8; 8],
            ciphertext: vec![0u8; 32],
        })
        .await
        .unwrap();
    bob.send(&relay, "alice", b"still fine").await.unwrap();

    let received = alice.receive(&relay).await.unwrap();
    assert_eq!(
        received,
        vec![
            Received::Rejected { sender_id: "bob".into(), reason: RejectReason::Malformed },
            Received::Message { sender_id: "bob".into(), plaintext: b"still fine".to_vec() },
        ]
    );
}

#[tokio::test]
async fn send_without_session_fails() {
    let relay = InProcess(RelayApi::default());
    let bob = participant("bob", &BOB_KEYS);

    let err = bob.send(&relay, "alice", b"hello").await.unwrap_err();
    assert!(matches!(err, ClientError::NoSession(peer) if peer == "alice"));
}

#[tokio::test]
async fn key_wrapped_for_someone_else_cannot_be_accepted() {
    let relay = InProcess(RelayApi::default());
    let mut alice = participant("alice", &ALICE_KEYS);
    let mut bob = participant("bob", &BOB_KEYS);

    // Bob wraps with Eve's public key but addresses the offer to Alice.
    bob.offer_session(&relay, "alice", &EVE_KEYS.public).await.unwrap();

    let err = alice.accept_session(&relay).await.unwrap_err();
    assert!(matches!(err, ClientError::Crypto(CryptoError::Decryption)));
    assert!(!alice.has_session("bob"));

    // The offer was consumed by the failed attempt.
    assert_eq!(alice.accept_session(&relay).await.unwrap(), None);
}

#[tokio::test]
async fn latest_offer_wins() {
    let relay = InProcess(RelayApi::default());
    let mut alice = participant("alice", &ALICE_KEYS);
    let mut bob = participant("bob", &BOB_KEYS);
    let mut eve = participant("eve", &EVE_KEYS);

    bob.offer_session(&relay, "alice", alice.public_key()).await.unwrap();
    eve.offer_session(&relay, "alice", alice.public_key()).await.unwrap();

    assert_eq!(alice.accept_session(&relay).await.unwrap().as_deref(), Some("eve"));
    assert!(!alice.has_session("bob"));
    assert_eq!(alice.accept_session(&relay).await.unwrap(), None);
}

#[tokio::test]
async fn blank_ids_are_rejected_by_the_relay() {
    let relay = InProcess(RelayApi::default());
    let mut bob = participant("bob", &BOB_KEYS);

    let err = bob.offer_session(&relay, " ", &ALICE_KEYS.public).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));
}
