use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use sealpost_types::api::MessageDto;

use crate::relay::RelayApi;

/// POST /api/messages
pub async fn post_message(
    State(api): State<RelayApi>,
    Json(req): Json<MessageDto>,
) -> Result<impl IntoResponse, StatusCode> {
    let envelope = req.into_envelope().map_err(|e| {
        warn!("Rejected message: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let (sender_id, recipient_id) = (envelope.sender_id.clone(), envelope.recipient_id.clone());
    api.post_message(envelope).map_err(|e| {
        warn!("Rejected message: {}", e);
        StatusCode::from(e)
    })?;

    info!("Message received for {} from {}", recipient_id, sender_id);
    Ok(StatusCode::OK)
}

/// GET /api/messages/{user_id}
///
/// Drains the queue. An empty array means no mail, not an error.
pub async fn get_messages(
    State(api): State<RelayApi>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    drain(&api, &user_id)
}

/// GET /api/messages/keyexchange
///
/// The static key-exchange segment shadows `{user_id}` for a user literally
/// named `keyexchange`; GET on that path still drains their queue.
pub async fn get_key_exchange_user_messages(
    State(api): State<RelayApi>,
) -> Result<impl IntoResponse, StatusCode> {
    drain(&api, KEY_EXCHANGE_SEGMENT)
}

const KEY_EXCHANGE_SEGMENT: &str = "keyexchange";

fn drain(api: &RelayApi, user_id: &str) -> Result<Json<Vec<MessageDto>>, StatusCode> {
    let envelopes = api.get_messages(user_id)?;

    if !envelopes.is_empty() {
        info!("Delivering {} messages to {}", envelopes.len(), user_id);
    }

    let messages: Vec<MessageDto> = envelopes.into_iter().map(MessageDto::from).collect();
    Ok(Json(messages))
}
