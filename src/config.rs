use std::env;
use std::net::SocketAddr;

use anyhow::Result;

const DEFAULT_DATABASE_URL: &str = "sqlite:gives_back.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
const DEV_SESSION_SECRET: &str = "dev-only-session-secret";

/// Runtime configuration, read from the environment with development
/// defaults. `SESSION_SECRET` must be set outside development.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub allowed_origin: String,
    pub session_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()?;

        let allowed_origin =
            env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string());

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                if env::var("RUST_ENV").as_deref() == Ok("production") {
                    anyhow::bail!("SESSION_SECRET must be set in production");
                }
                tracing::warn!("SESSION_SECRET not set, using development default");
                DEV_SESSION_SECRET.to_string()
            }
        };

        Ok(Self {
            database_url,
            bind_addr,
            allowed_origin,
            session_secret,
        })
    }
}
