//! Identity adapter and request-scoped sessions.
//!
//! An [`IdentityProvider`] checks credentials. [`Sessions`] turns a
//! successful sign-in into a signed session token that travels in a cookie,
//! so every request carries its own identity.

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use bcrypt::verify;
use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "cheeper_session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;
}

/// An account the provider accepts, as listed in `CHEEPER_CONFIG`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccount {
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Identity provider backed by a fixed list of accounts.
pub struct StaticIdentityProvider {
    accounts: DashMap<String, UserAccount>,
}

impl StaticIdentityProvider {
    pub fn new(accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.email.to_lowercase(), account))
            .collect();
        Self { accounts }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let account = self
            .accounts
            .get(&credentials.email.to_lowercase())
            .map(|entry| entry.value().clone())
            .ok_or(AuthError::InvalidCredentials)?;

        // bcrypt is CPU-bound; run it on the blocking pool.
        let password = credentials.password.clone();
        let hash = account.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify(password, &hash))
            .await
            .map_err(|e| AuthError::Unavailable(format!("password check panicked: {}", e)))?
            .map_err(|e| AuthError::Unavailable(format!("password verification failed: {}", e)))?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Identity {
            display_name: account
                .display_name
                .unwrap_or_else(|| account.email.clone()),
            email: account.email,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (email)
    pub name: String,
    pub jti: String,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: Identity,
    pub token: String,
}

pub struct Sessions {
    provider: Arc<dyn IdentityProvider>,
    secret: String,
    ttl: Duration,
    /// Signed-out token ids and the time they would have expired.
    revoked: DashMap<String, usize>,
}

impl Sessions {
    pub fn new(provider: Arc<dyn IdentityProvider>, secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            provider,
            secret: secret.into(),
            ttl,
            revoked: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignedIn, AuthError> {
        let identity = self.provider.sign_in(credentials).await?;
        let token = self.issue(&identity)?;
        Ok(SignedIn { identity, token })
    }

    /// Revoke a session token. Unknown or already-invalid tokens are ignored.
    pub fn sign_out(&self, token: &str) {
        let Some(claims) = self.decode(token) else {
            return;
        };

        let now = Utc::now().timestamp() as usize;
        self.revoked.retain(|_, exp| *exp > now);
        self.revoked.insert(claims.jti, claims.exp);
    }

    pub fn current_identity(&self, token: &str) -> Option<Identity> {
        let claims = self.decode(token)?;
        if self.revoked.contains_key(&claims.jti) {
            return None;
        }

        Some(Identity {
            email: claims.sub,
            display_name: claims.name,
        })
    }

    fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Unavailable(format!("Invalid session ttl: {}", e)))?;
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Unavailable("Failed to calculate expiration".into()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: identity.email.clone(),
            name: identity.display_name.clone(),
            jti: Uuid::new_v4().to_string(),
            exp: expiration,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    fn decode(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .ok()
    }
}

/// Session cookie carrying `token`, living as long as the session does.
pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX))
        .build()
}

/// Cookie to hand to `CookieJar::remove`; path must match [`session_cookie`].
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};
    use axum_extra::extract::CookieJar;

    fn provider() -> Arc<dyn IdentityProvider> {
        Arc::new(StaticIdentityProvider::new([UserAccount {
            email: "tode@pond.dev".into(),
            password_hash: bcrypt::hash("hunter22", 4).unwrap(),
            display_name: Some("TodePond".into()),
        }]))
    }

    fn sessions() -> Sessions {
        Sessions::new(provider(), "test-secret", Duration::from_secs(3600))
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn sign_in_with_valid_credentials() {
        let sessions = sessions();
        let signed_in = sessions
            .sign_in(&credentials("tode@pond.dev", "hunter22"))
            .await
            .unwrap();

        assert_eq!(signed_in.identity.display_name, "TodePond");
        assert_eq!(
            sessions.current_identity(&signed_in.token),
            Some(signed_in.identity)
        );
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let sessions = sessions();
        assert!(
            sessions
                .sign_in(&credentials("Tode@Pond.dev", "hunter22"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let err = sessions()
            .sign_in(&credentials("tode@pond.dev", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_account_is_rejected() {
        let err = sessions()
            .sign_in(&credentials("nobody@pond.dev", "hunter22"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn sign_out_revokes_the_token() {
        let sessions = sessions();
        let signed_in = sessions
            .sign_in(&credentials("tode@pond.dev", "hunter22"))
            .await
            .unwrap();

        sessions.sign_out(&signed_in.token);
        assert_eq!(sessions.current_identity(&signed_in.token), None);
    }

    #[tokio::test]
    async fn tokens_from_another_secret_are_ignored() {
        let signed_in = Sessions::new(provider(), "other-secret", Duration::from_secs(3600))
            .sign_in(&credentials("tode@pond.dev", "hunter22"))
            .await
            .unwrap();

        assert_eq!(sessions().current_identity(&signed_in.token), None);
        assert_eq!(sessions().current_identity("garbage"), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok".into(), Duration::from_secs(60));
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(60)));
    }

    #[test]
    fn jar_finds_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("a=1; cheeper_session=abc.def.ghi; b=2"),
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(jar.get(SESSION_COOKIE).map(|c| c.value()), Some("abc.def.ghi"));
    }

    #[test]
    fn removed_session_cookie_leaves_the_jar() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("cheeper_session=tok"));
        let jar = CookieJar::from_headers(&headers).remove(removal_cookie());
        assert!(jar.get(SESSION_COOKIE).is_none());
    }
}
