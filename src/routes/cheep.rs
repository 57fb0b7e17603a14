use crate::{
    AppState,
    dto::{CheepFields, NewCheep},
    errors::ApiError,
    extract::{CheepBody, CurrentUser},
    render::{compose, render},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::info;

/// GET /new, GET /cheep
/// Signed-out visitors are sent to the login page.
pub async fn compose_page(user: CurrentUser) -> Response {
    if !user.is_signed_in() {
        return Redirect::to("/login").into_response();
    }

    Html(render(compose(), true)).into_response()
}

/// POST /new
/// Body (form or JSON): { "text": "...", "url"?: "...", "file"?: "..." }
pub async fn create_cheep(
    State(state): State<AppState>,
    user: CurrentUser,
    CheepBody(fields): CheepBody,
) -> Result<Redirect, ApiError> {
    append_cheep(&state, &user, fields).await?;
    Ok(Redirect::to("/"))
}

/// POST /cheep
/// Same body as `POST /new`; answers 204 instead of redirecting.
pub async fn create_cheep_api(
    State(state): State<AppState>,
    user: CurrentUser,
    CheepBody(fields): CheepBody,
) -> Result<StatusCode, ApiError> {
    append_cheep(&state, &user, fields).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn append_cheep(
    state: &AppState,
    user: &CurrentUser,
    fields: CheepFields,
) -> Result<(), ApiError> {
    let identity = user.0.as_ref().ok_or(ApiError::NotSignedIn)?;

    let post = NewCheep::try_from(fields)?.into_post(Utc::now().timestamp_millis());

    state
        .append_post(post)
        .await
        .map_err(ApiError::WriteFailed)?;

    info!("Cheep posted by {}", identity.email);

    Ok(())
}
