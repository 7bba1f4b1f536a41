//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use course_market_core::domain::Role;
use course_market_core::ports::{DataService, VideoService};
use std::sync::Arc;
use uuid::Uuid;

/// The shared application state, created once at startup and passed to all
/// handlers. The backend behind `data` and `video` is chosen exactly once by
/// the binary (live or demo); nothing downstream branches on the mode.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<dyn DataService>,
    pub video: Arc<dyn VideoService>,
    pub config: Arc<Config>,
}

/// The authenticated caller, resolved by the auth middleware and inserted
/// into request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}
