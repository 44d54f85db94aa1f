//! Service Container - Centralized service access.
//!
//! Builds every service over one shared store so the whole process talks to
//! a single store instance.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, ClassManager, ClassService, EnrollmentService, Enroller,
};
use crate::config::Config;
use crate::infra::Store;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get class service
    fn classes(&self) -> Arc<dyn ClassService>;

    /// Get enrollment service
    fn enrollment(&self) -> Arc<dyn EnrollmentService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    class_service: Arc<dyn ClassService>,
    enrollment_service: Arc<dyn EnrollmentService>,
}

impl Services {
    /// Create a service container from injected services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        class_service: Arc<dyn ClassService>,
        enrollment_service: Arc<dyn EnrollmentService>,
    ) -> Self {
        Self {
            auth_service,
            class_service,
            enrollment_service,
        }
    }

    /// Create every service over the given store
    pub fn from_store<S: Store + 'static>(store: Arc<S>, config: Config) -> Self {
        Self::new(
            Arc::new(Authenticator::new(store.clone(), config)),
            Arc::new(ClassManager::new(store.clone())),
            Arc::new(Enroller::new(store)),
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn classes(&self) -> Arc<dyn ClassService> {
        self.class_service.clone()
    }

    fn enrollment(&self) -> Arc<dyn EnrollmentService> {
        self.enrollment_service.clone()
    }
}
