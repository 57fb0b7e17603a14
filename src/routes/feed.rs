use crate::{
    AppState,
    extract::CurrentUser,
    render::{feed, render},
    store::newest_first,
};
use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use tracing::warn;

use super::not_allowed_page;

/// GET /
/// The newest cheeps, at most `feed_limit` of them.
pub async fn home(State(state): State<AppState>, user: CurrentUser) -> Response {
    let limit = state.config.feed_limit;

    match state.list_posts(Some(limit)).await {
        Ok(posts) => {
            // The store is asked for `limit` newest posts; don't rely on it.
            let posts = newest_first(posts, Some(limit));
            let page = feed(&posts, &state.config.author_name, Utc::now().timestamp_millis());
            Html(render(page, user.is_signed_in())).into_response()
        }
        Err(e) => {
            warn!("Feed read failed: {}", e);
            not_allowed_page(user.is_signed_in())
        }
    }
}

/// GET /cheeps, GET /posts
/// Response: every cheep as a JSON array, newest first.
pub async fn list_cheeps(State(state): State<AppState>, user: CurrentUser) -> Response {
    match state.list_posts(None).await {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => {
            warn!("Cheep listing failed: {}", e);
            not_allowed_page(user.is_signed_in())
        }
    }
}
