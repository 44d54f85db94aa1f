//! Application state - Dependency injection container.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::infra::Store;
use crate::services::{AuthService, ClassService, EnrollmentService, ServiceContainer, Services};

/// Application state shared by all handlers.
///
/// Holds the single store instance built at startup and the services built
/// over it; nothing here is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Class service
    pub class_service: Arc<dyn ClassService>,
    /// Enrollment service
    pub enrollment_service: Arc<dyn EnrollmentService>,
    /// Store adapter (health checks)
    pub store: Arc<dyn Store>,
    /// Per-request deadline
    pub request_timeout: Duration,
}

impl AppState {
    /// Build every service over `store`.
    pub fn from_store<S: Store + 'static>(store: Arc<S>, config: Config) -> Self {
        let request_timeout = config.request_timeout;
        let services = Services::from_store(store.clone(), config);
        Self::new(&services, store, request_timeout)
    }

    /// Create application state from an existing service container.
    pub fn new(
        services: &dyn ServiceContainer,
        store: Arc<dyn Store>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            class_service: services.classes(),
            enrollment_service: services.enrollment(),
            store,
            request_timeout,
        }
    }
}
