use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{JwtCodec, PasswordHasher, TokenCodec};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{PgTaskStore, PgUserStore, TaskStore, UserStore};

/// Everything a request handler needs, built once at startup and shared
/// read-only across workers via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<dyn TokenCodec>,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(
        config: &Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Result<Self, AppError> {
        Self::with_clock(config, users, tasks, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            tokens: Arc::new(JwtCodec::new(&config.jwt, clock)),
            users,
            tasks,
            passwords: PasswordHasher::new(config.bcrypt_cost)?,
        })
    }

    /// Production wiring: both stores share one Postgres pool.
    pub fn postgres(config: &Config, pool: PgPool) -> Result<Self, AppError> {
        Self::new(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgTaskStore::new(pool)),
        )
    }
}
