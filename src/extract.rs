//! Request extractors shared by the handlers.

use crate::{
    AppState,
    dto::CheepFields,
    errors::ApiError,
    identity::{Identity, SESSION_COOKIE},
};
use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

/// Identity of whoever sent the request, if their session cookie checks out.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    pub fn is_signed_in(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let identity = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| state.sessions.current_identity(cookie.value()));
        Ok(CurrentUser(identity))
    }
}

/// Cheep fields from either a form post or a JSON document, picked by
/// `Content-Type`. Anything else is a malformed cheep.
#[derive(Debug)]
pub struct CheepBody(pub CheepFields);

impl FromRequest<AppState> for CheepBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            "application/x-www-form-urlencoded" => {
                let Form(fields) = Form::<CheepFields>::from_request(req, state)
                    .await
                    .map_err(|_| ApiError::MalformedCheep)?;
                Ok(CheepBody(fields))
            }
            "application/json" => {
                let Json(fields) = Json::<CheepFields>::from_request(req, state)
                    .await
                    .map_err(|_| ApiError::MalformedCheep)?;
                Ok(CheepBody(fields))
            }
            _ => Err(ApiError::MalformedCheep),
        }
    }
}
