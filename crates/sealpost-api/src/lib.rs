pub mod health;
pub mod key_exchange;
pub mod messages;
pub mod relay;

use axum::{
    Router,
    routing::{get, post},
};

pub use relay::{RelayApi, RelayError};

/// Route table for the relay. Callers add their own layers (CORS, tracing, limits).
pub fn router(api: RelayApi) -> Router {
    Router::new()
        .route("/api/messages", post(messages::post_message))
        .route("/api/messages/{user_id}", get(messages::get_messages))
        .route(
            "/api/messages/keyexchange",
            post(key_exchange::post_key_exchange).get(messages::get_key_exchange_user_messages),
        )
        .route("/api/messages/keyexchange/{user_id}", get(key_exchange::get_key_exchange))
        .route("/health", get(health::health))
        .with_state(api)
}
