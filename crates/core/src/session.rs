//! Session & Dependency Injection
//!
//! A `Session` is the collaborator handle a host passes into every workflow
//! call: a stable identifier plus an optional `ServiceContainer` used for
//! dependency injection. The container is a type-keyed map owned by the
//! session and injected through constructors; there are no module-level
//! singletons anywhere in the workspace.
//!
//! A missing session id is a hard validation error at the workflow boundary;
//! a missing container is tolerated (the engine merely logs a warning).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// ServiceContainer
// ============================================================================

/// Type-keyed service registry shared across one session.
///
/// Services are stored as `Arc<T>` and resolved by their concrete type.
/// Registration replaces any previous instance of the same type.
#[derive(Default)]
pub struct ServiceContainer {
    services: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service instance, replacing any existing one of the same type.
    pub fn register<T: Any + Send + Sync>(&self, service: Arc<T>) {
        let mut services = self
            .services
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        services.insert(TypeId::of::<T>(), service);
    }

    /// Resolve a service by type. Returns `None` when nothing is registered.
    pub fn resolve<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let services = self.services.read().ok()?;
        services
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }

    /// Whether a service of the given type is registered.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services
            .read()
            .map(|services| services.contains_key(&TypeId::of::<T>()))
            .unwrap_or(false)
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every registered service.
    pub fn clear(&self) {
        if let Ok(mut services) = self.services.write() {
            services.clear();
        }
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("services", &self.len())
            .finish()
    }
}

// ============================================================================
// Session
// ============================================================================

/// Identity and DI handle for one workflow caller.
#[derive(Debug, Clone)]
pub struct Session {
    /// Stable session identifier.
    pub id: String,
    /// Optional DI container. Absence degrades features, never correctness.
    pub container: Option<Arc<ServiceContainer>>,
}

impl Session {
    /// Create a session without a container.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            container: None,
        }
    }

    /// Attach a DI container.
    pub fn with_container(mut self, container: Arc<ServiceContainer>) -> Self {
        self.container = Some(container);
        self
    }

    /// Validate the session identity.
    ///
    /// An empty id is a hard error. A missing container is fine here; callers
    /// that care emit their own warning.
    pub fn validate(&self) -> CoreResult<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::validation("session id is empty"));
        }
        Ok(())
    }

    /// Resolve a service from the container, if one is attached.
    pub fn resolve<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.container.as_ref().and_then(|c| c.resolve::<T>())
    }
}
