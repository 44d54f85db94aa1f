//! Authentication service - credential issuance and verification.
//!
//! Registration and login hash or verify passwords on the blocking thread
//! pool and hand back a signed, self-contained session token. Verification
//! is a pure function of the token and the signing secret: no store access,
//! no server-side session state, no revocation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, HashCost, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::Store;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Carried for clients; no route enforces it
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Caller identity recovered from a verified session token.
///
/// Protected operations take this, never an identifier from the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

/// Token response returned after successful registration or login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed session token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and issue a session token
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> AppResult<TokenResponse>;

    /// Check credentials and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a session token and extract the caller identity
    fn verify_token(&self, token: &str) -> AppResult<Identity>;
}

/// Concrete implementation of AuthService over a store.
pub struct Authenticator<S: Store> {
    store: Arc<S>,
    config: Config,
}

impl<S: Store> Authenticator<S> {
    pub fn new(store: Arc<S>, config: Config) -> Self {
        Self { store, config }
    }

    fn issue_token(&self, user_id: Uuid, role: UserRole) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.config.jwt_expiration_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::internal("Token lifetime out of range"))?;

        let claims = Claims {
            sub: user_id,
            role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        Ok(TokenResponse {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: (expires_at - now).num_seconds(),
        })
    }
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_password(plain_text: String, cost: HashCost) -> AppResult<Password> {
    tokio::task::spawn_blocking(move || Password::new(&plain_text, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_password(stored: Password, plain_text: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || stored.verify(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}

#[async_trait]
impl<S: Store + 'static> AuthService for Authenticator<S> {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> AppResult<TokenResponse> {
        if email.trim().is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }

        let users = self.store.users();
        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateIdentity);
        }

        let password_hash = hash_password(password, self.config.hash_cost)
            .await?
            .into_string();

        // Insert re-checks uniqueness; a concurrent registration surfaces here
        let user = users
            .insert(NewUser {
                name,
                email,
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        self.issue_token(user.id, user.role)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let Some(user) = self.store.users().find_by_email(&email).await? else {
            // Burn a comparable amount of work so a miss is not faster than a bad password
            let _ = hash_password(password, self.config.hash_cost).await;
            tracing::debug!("Login rejected");
            return Err(AppError::InvalidCredentials);
        };

        let stored = Password::from_hash(user.password_hash.clone());
        if !verify_password(stored, password).await? {
            tracing::debug!("Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_token(user.id, user.role)
    }

    fn verify_token(&self, token: &str) -> AppResult<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &validation,
        )
        .map(|data| Identity::from(data.claims))
        .map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::Unauthorized
        })
    }
}
