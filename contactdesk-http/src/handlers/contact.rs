use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use contactdesk::{ContactError, ContactRecord, ContactSubmission};

use super::AppState;
use crate::dto::{ContactRequest, ContactResponse};

/// POST /contact - validate, persist, then relay one submission
#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Submission stored and relayed", body = ContactResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Store write failed"),
        (status = 502, description = "Stored, but a relay service failed")
    )
)]
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ContactError> {
    let submission = ContactSubmission::from(body).validate()?;
    let record = ContactRecord::new(submission);

    let id = state.store.insert_contact(&record).await.map_err(|e| {
        tracing::error!(record_id = %record.id, error = %e, "Failed to store contact submission");
        e
    })?;
    tracing::info!(record_id = %record.id, stored_id = %id, "Contact submission stored");

    let report = state.relays.relay(&record).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            status: "received".to_string(),
            id,
            relayed: report.into(),
        }),
    ))
}
