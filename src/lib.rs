#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "Password hashing, bearer-token issuance and verification, and the per-request"]
#![doc = "identity resolution that guards every task route, plus the storage, routing,"]
#![doc = "configuration and error types the binary (`main.rs`) assembles into a server."]

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
