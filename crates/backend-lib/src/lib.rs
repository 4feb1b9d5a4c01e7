// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality of the hospital management API server.

pub mod auth;
pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth};
use crate::config::Settings;
use crate::error::AppError;
use crate::model::PredictionGateway;
use crate::storage::Storage;

pub use crate::router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Premium classifier front door
    pub gateway: Arc<PredictionGateway>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
}

impl<S: Storage> AppState<S> {
    /// Create a new application state, with `DefaultAuth` over `storage`
    pub fn new(storage: S, settings: Settings, gateway: PredictionGateway) -> Result<Self, AppError> {
        let auth = DefaultAuth::from_settings(Arc::new(storage.clone()), &settings)?;
        Ok(Self::with_auth(storage, settings, gateway, Arc::new(auth)))
    }

    /// Create a state around an already built auth service
    pub fn with_auth(
        storage: S,
        settings: Settings,
        gateway: PredictionGateway,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            auth,
            gateway: Arc::new(gateway),
            settings: Arc::new(settings),
            storage,
        }
    }
}
