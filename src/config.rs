use crate::error::AppError;
use jsonwebtoken::Algorithm;
use std::env;
use std::ops::RangeInclusive;

/// Work factors bcrypt accepts.
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Signing material for bearer tokens. Fixed for the life of the process.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub algorithm: Algorithm,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtSettings,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt: JwtSettings {
                secret: required("JWT_SECRET")?,
                algorithm: parse_algorithm(
                    &lookup("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string()),
                )?,
            },
            bcrypt_cost: parse_bcrypt_cost(&lookup)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number", key))),
        None => Ok(default),
    }
}

fn parse_bcrypt_cost<F>(lookup: &F) -> Result<u32, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let cost = parse_or(lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
    if !BCRYPT_COST_RANGE.contains(&cost) {
        return Err(AppError::Config(format!(
            "BCRYPT_COST must be between {} and {} (got {})",
            BCRYPT_COST_RANGE.start(),
            BCRYPT_COST_RANGE.end(),
            cost
        )));
    }
    Ok(cost)
}

/// Only the HMAC family is accepted: the token secret is a shared symmetric key.
fn parse_algorithm(raw: &str) -> Result<Algorithm, AppError> {
    match raw.trim().parse::<Algorithm>() {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        _ => Err(AppError::Config(format!(
            "JWT_ALGORITHM must be one of HS256, HS384, HS512 (got {})",
            raw
        ))),
    }
}
