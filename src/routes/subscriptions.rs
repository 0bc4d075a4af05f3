use crate::{
    app_state::AppState,
    domain::{NewSubscriber, SubscribePayload},
    subscriber_store::upsert_subscriber,
};
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tokio::time::timeout;
use tracing::Span;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

#[tracing::instrument(
    name = "Adding a waitlist subscriber",
    skip(app_state, payload),
    fields(subscriber_email = tracing::field::Empty, subscriber_id = tracing::field::Empty)
)]
async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscribePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscribeResponse>), SubscribeError> {
    let db_pool = app_state
        .db_pool
        .as_ref()
        .ok_or(SubscribeError::ConfigurationError)?;

    let Json(payload) = payload?;
    let new_subscriber =
        NewSubscriber::try_from(payload).map_err(SubscribeError::ValidationError)?;
    Span::current().record(
        "subscriber_email",
        &tracing::field::display(&new_subscriber.email),
    );

    let id = timeout(
        app_state.store_timeout,
        upsert_subscriber(db_pool, &new_subscriber),
    )
    .await
    .context("Subscriber store did not respond in time")??;
    Span::current().record("subscriber_id", &tracing::field::display(&id));

    app_state.notifier.notify(&new_subscriber).await;

    Ok((StatusCode::CREATED, Json(SubscribeResponse { ok: true, id })))
}

#[derive(Serialize)]
struct SubscribeResponse {
    ok: bool,
    id: Uuid,
}

#[derive(Debug, thiserror::Error)]
enum SubscribeError {
    #[error("Server not configured")]
    ConfigurationError,
    #[error("Bad request")]
    MalformedBody(#[from] JsonRejection),
    #[error("Invalid email")]
    ValidationError(String),
    #[error("Database error")]
    StoreError(#[from] anyhow::Error),
}

impl IntoResponse for SubscribeError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        let status = match self {
            Self::ConfigurationError | Self::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MalformedBody(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
