use axum::{Json, extract::State};

use sealpost_types::api::HealthResponse;

use crate::relay::RelayApi;

/// GET /health
pub async fn health(State(api): State<RelayApi>) -> Json<HealthResponse> {
    let stats = api.mailbox().stats();
    Json(HealthResponse {
        status: "ok".into(),
        recipients: stats.recipients,
        pending_messages: stats.pending_messages,
        pending_key_exchanges: stats.pending_key_exchanges,
    })
}
