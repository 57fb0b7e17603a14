use crate::{
    AppState,
    dto::{LoginQuery, LoginRequest},
    errors::ApiError,
    extract::CurrentUser,
    identity::{AuthError, Credentials, SESSION_COOKIE, removal_cookie, session_cookie},
    render::{login, render},
};
use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{error, info, warn};
use validator::Validate;

const LOGIN_FAILED: &str = "/login?invalid";

/// GET /login
/// `?invalid` shows the failed-login message.
pub async fn login_page(user: CurrentUser, Query(query): Query<LoginQuery>) -> Html<String> {
    Html(render(login(query.is_invalid()), user.is_signed_in()))
}

/// POST /login
/// Body (form): emailaddress=...&password=...
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    let Ok(Form(payload)) = form else {
        return Ok(Redirect::to(LOGIN_FAILED).into_response());
    };

    if payload.validate().is_err() {
        return Ok(Redirect::to(LOGIN_FAILED).into_response());
    }

    let email = payload.emailaddress.to_lowercase();
    if state.login_limiter.check_key(&email).is_err() {
        warn!("Login throttled for {}", email);
        return Err(ApiError::TooManyAttempts);
    }

    let credentials = Credentials {
        email,
        password: payload.password,
    };

    match state.sessions.sign_in(&credentials).await {
        Ok(signed_in) => {
            info!("User logged in: {}", signed_in.identity.email);
            let cookie = session_cookie(signed_in.token, state.sessions.ttl());
            Ok((jar.add(cookie), Redirect::to("/")).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Failed login for {}", credentials.email);
            Ok(Redirect::to(LOGIN_FAILED).into_response())
        }
        Err(e) => {
            error!("Identity provider error: {}", e);
            Ok(Redirect::to(LOGIN_FAILED).into_response())
        }
    }
}

/// GET /logout
pub async fn sign_out(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.sign_out(cookie.value());
    }
    if let Some(identity) = user.0 {
        info!("User logged out: {}", identity.email);
    }

    (jar.remove(removal_cookie()), Redirect::to("/")).into_response()
}
