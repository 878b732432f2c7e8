//! Administrator registration and login.
//!
//! Passwords are stored as argon2id hashes; a successful login issues a
//! signed JWT that the API layer accepts as a bearer token or session cookie.
use anyhow::anyhow;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::DbConnection;
use crate::domain::models::Admin;
use crate::error::{AppError, AppResult};
use crate::storage::sqlite::AdminRepository;
use crate::storage::traits::AdminStorage;

const SESSION_TTL_HOURS: i64 = 12;
const MIN_PASSWORD_LEN: usize = 8;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin account id.
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthService {
    admins: AdminRepository,
    secret: String,
}

impl AuthService {
    pub fn new(connection: DbConnection, secret: impl Into<String>) -> Self {
        Self {
            admins: AdminRepository::new(connection),
            secret: secret.into(),
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> AppResult<Admin> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty."));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            )));
        }
        if self.admins.get_admin_by_username(username).await?.is_some() {
            return Err(AppError::validation("Username is already taken."));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {e}"))?
            .to_string();

        let admin = Admin {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        };
        self.admins.store_admin(&admin).await?;
        tracing::info!(admin_id = %admin.id, "registered admin {}", admin.username);
        Ok(admin)
    }

    /// Verify credentials and issue a session token. Unknown usernames and
    /// wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(Admin, String)> {
        let admin = self
            .admins
            .get_admin_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&admin.password_hash)
            .map_err(|e| anyhow!("stored password hash is malformed: {e}"))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::InvalidCredentials)?;

        let claims = SessionClaims {
            sub: admin.id.clone(),
            username: admin.username.clone(),
            exp: (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| anyhow!("session token creation failed: {e}"))?;

        tracing::info!(admin_id = %admin.id, "admin logged in");
        Ok((admin, token))
    }

    /// Decode and validate a session token. Returns None for anything invalid
    /// or expired.
    pub fn verify_token(&self, token: &str) -> Option<SessionClaims> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .ok()
    }
}
