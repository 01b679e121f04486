use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::AppState;
use crate::{error::Error, users::DeleteOutcome};

static CONTROL_PAGE: &str = include_str!("page.html");

#[derive(Deserialize)]
struct DeleteUserRequest {
    email: Option<String>,
}

pub(super) async fn index() -> Html<&'static str> {
    Html(CONTROL_PAGE)
}

pub(super) async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

pub(super) async fn reject_head(req: Request, next: Next) -> Response {
    if req.method() == Method::HEAD {
        return not_found().await.into_response();
    }
    next.run(req).await
}

#[instrument(skip(state))]
pub(super) async fn list_by_username_pattern(State(state): State<AppState>) -> Response {
    match state.client.list_by_username_pattern(&state.pattern).await {
        Ok(users) => {
            info!(matched = users.len(), "listed users");
            Json(users).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[instrument(skip(state, body))]
pub(super) async fn delete_user(State(state): State<AppState>, body: Bytes) -> Response {
    let email = match parse_email(&body) {
        Ok(email) => email,
        Err(e) => return e.into_response(),
    };

    match state.client.delete_user(&email).await {
        Ok(DeleteOutcome::Deleted { email }) => {
            info!(%email, "deleted user");
            (StatusCode::OK, "deleted").into_response()
        }
        Ok(DeleteOutcome::Failed { email, status, body }) => {
            warn!(%email, ?status, "failed to delete user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to delete user: {body}"),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// The body must be a JSON object with a non-empty `email` string.
fn parse_email(body: &[u8]) -> Result<String, Error> {
    let req: DeleteUserRequest = serde_json::from_slice(body)
        .map_err(|e| Error::BadRequest(format!("invalid JSON body: {e}")))?;
    match req.email {
        Some(email) if !email.is_empty() => Ok(email),
        _ => Err(Error::BadRequest("missing email".to_string())),
    }
}
