//! Route table.
//!
//! - `GET /` - Feed
//! - `GET /cheeps`, `GET /posts` - All cheeps as JSON
//! - `GET /new`, `GET /cheep` - Compose form (signed in only)
//! - `POST /new` - Post a cheep, redirect to the feed
//! - `POST /cheep` - Post a cheep, 204
//! - `GET /login`, `POST /login`, `GET /logout` - Session
//! - anything else - 404 page

mod cheep;
mod feed;
mod session;

use crate::{
    AppState,
    extract::CurrentUser,
    render::{not_allowed, not_found, render},
};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{MethodRouter, get},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", page(get(feed::home)))
        .route("/cheeps", page(get(feed::list_cheeps)))
        .route("/posts", page(get(feed::list_cheeps)))
        .route(
            "/new",
            page(get(cheep::compose_page).post(cheep::create_cheep)),
        )
        .route(
            "/cheep",
            page(get(cheep::compose_page).post(cheep::create_cheep_api)),
        )
        .route(
            "/login",
            page(get(session::login_page).post(session::sign_in)),
        )
        .route("/logout", page(get(session::sign_out)))
        .fallback(not_found_page)
        .with_state(state)
}

/// A known path hit with the wrong method is still a 404 page.
fn page(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(not_found_page)
}

pub async fn not_found_page(user: CurrentUser) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(render(not_found(), user.is_signed_in())),
    )
}

pub(crate) fn not_allowed_page(signed_in: bool) -> Response {
    (StatusCode::UNAUTHORIZED, Html(render(not_allowed(), signed_in))).into_response()
}
