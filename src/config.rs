//! Server configuration read from the environment (and `.env`).

use std::net::IpAddr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Credentials and token settings for the shop administrator.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub admin_username: String,
    /// bcrypt hash of the administrator password
    pub admin_password_hash: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub host: IpAddr,
    /// First port tried; the next 20 are tried when it is taken
    pub port: u16,
    pub db_max_connections: u32,
    pub auth: AuthSettings,
    /// Title printed on downloaded bills
    pub business_name: String,
}

fn require(name: &str) -> Result<String, BoxError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("{name} must be set").into()),
    }
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, BoxError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            host: parsed_or("HOST", IpAddr::from([127, 0, 0, 1])),
            port: parsed_or("PORT", 3000),
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 5),
            auth: AuthSettings {
                jwt_secret: require("JWT_SECRET")?,
                admin_username: std::env::var("ADMIN_USERNAME")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| "admin".to_string()),
                admin_password_hash: require("ADMIN_PASSWORD_HASH")?,
                token_ttl_hours: parsed_or("TOKEN_TTL_HOURS", 8),
            },
            business_name: std::env::var("BUSINESS_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "Goldsmith Assistant".to_string()),
        })
    }
}
