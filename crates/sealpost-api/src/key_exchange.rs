use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use sealpost_types::api::KeyExchangeDto;

use crate::relay::{RelayApi, RelayError};

/// POST /api/messages/keyexchange
///
/// Replaces any offer already waiting for the recipient.
pub async fn post_key_exchange(
    State(api): State<RelayApi>,
    Json(req): Json<KeyExchangeDto>,
) -> Result<impl IntoResponse, StatusCode> {
    let envelope = req.into_envelope().map_err(|e| {
        warn!("Rejected key exchange: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let (sender_id, recipient_id) = (envelope.sender_id.clone(), envelope.recipient_id.clone());
    api.post_key_exchange(envelope).map_err(|e| {
        warn!("Rejected key exchange: {}", e);
        StatusCode::from(e)
    })?;

    info!("Wrapped key stored for {} from {}", recipient_id, sender_id);
    Ok(StatusCode::OK)
}

/// GET /api/messages/keyexchange/{user_id}
///
/// 404 tells the recipient nothing is pending yet and it should poll again later.
pub async fn get_key_exchange(
    State(api): State<RelayApi>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    match api.get_key_exchange(&user_id) {
        Ok(envelope) => {
            info!("Delivering wrapped key to {}", user_id);
            Ok(Json(KeyExchangeDto::from(envelope)))
        }
        Err(e @ RelayError::NotFound(_)) => Err(e.into()),
        Err(e) => {
            warn!("Rejected key exchange fetch: {}", e);
            Err(e.into())
        }
    }
}
