//! The runtime container.
//!
//! One container is created per HTTP request (or CLI invocation) and dropped
//! with it, so the instance cache never outlives or races a request. `get`
//! resolves depth-first and synchronously: every dependency id in the factory
//! plan is resolved in declared order via recursive `get` calls, then the
//! construct function runs with the resolved arguments.
//!
//! Two bootstrap entries are seeded at construction and stay singletons under
//! either policy: the application configuration (under
//! [`CONFIG_ID`]) and the container's own handle (under [`CONTAINER_ID`], a
//! [`ContainerHandle`] holding a weak pointer so the per-request container
//! still drops normally).
//!
//! Every resolution pass carries an explicit in-progress stack; revisiting an
//! id that is still being resolved fails fast with
//! [`ResolveError::CycleDetected`] instead of recursing into the stack limit.

use crate::di::factory::{Plans, Requirement};
use fennec_core::{
    AppConfig, CONFIG_ID, CONTAINER_ID, ContainerConfig, Dependencies, Dependency, ResolveError,
    SharedInstance,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

struct ContainerInner {
    plans: Arc<Plans>,
    policy: ContainerConfig,
    config: Arc<AppConfig>,
    cache: Mutex<HashMap<String, SharedInstance>>,
}

/// The per-request service container.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

/// An injectable handle to the owning container.
///
/// Seeded under [`CONTAINER_ID`]; services that need to resolve other
/// services at runtime depend on this instead of an ambient global. The
/// handle holds a weak pointer, so it never extends the container's life.
#[derive(Clone)]
pub struct ContainerHandle {
    inner: Weak<ContainerInner>,
}

impl ContainerHandle {
    /// Re-materialize the owning container.
    pub fn container(&self) -> Result<Container, ResolveError> {
        self.inner
            .upgrade()
            .map(|inner| Container { inner })
            .ok_or(ResolveError::ContainerGone)
    }

    /// Resolve a service through the owning container.
    pub fn get(&self, id: &str) -> Result<SharedInstance, ResolveError> {
        self.container()?.get(id)
    }
}

impl Container {
    /// Create a container over built plans, seeding the bootstrap entries.
    pub fn new(plans: Arc<Plans>, policy: ContainerConfig, config: Arc<AppConfig>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<ContainerInner>| {
            let mut cache: HashMap<String, SharedInstance> = HashMap::new();
            cache.insert(CONFIG_ID.to_string(), config.clone() as SharedInstance);
            cache.insert(
                CONTAINER_ID.to_string(),
                Arc::new(ContainerHandle {
                    inner: weak.clone(),
                }) as SharedInstance,
            );
            ContainerInner {
                plans,
                policy,
                config,
                cache: Mutex::new(cache),
            }
        });
        Self { inner }
    }

    /// Resolve a service by identifier.
    pub fn get(&self, id: &str) -> Result<SharedInstance, ResolveError> {
        let mut in_progress = Vec::new();
        self.resolve(id, &mut in_progress)
    }

    /// Resolve a service and downcast it to its concrete type.
    pub fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ResolveError> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| ResolveError::WrongInstanceType {
                id: id.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Whether the id is cached or a plan exists for it.
    pub fn has(&self, id: &str) -> bool {
        self.cached(id) || self.inner.plans.contains(id)
    }

    /// The seeded application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    fn cached(&self, id: &str) -> bool {
        self.inner
            .cache
            .lock()
            .map(|cache| cache.contains_key(id))
            .unwrap_or(false)
    }

    fn cache_hit(&self, id: &str) -> Option<SharedInstance> {
        self.inner.cache.lock().ok()?.get(id).cloned()
    }

    fn resolve(
        &self,
        id: &str,
        in_progress: &mut Vec<String>,
    ) -> Result<SharedInstance, ResolveError> {
        let bootstrap = id == CONFIG_ID || id == CONTAINER_ID;
        if self.inner.policy.is_singleton() || bootstrap {
            if let Some(hit) = self.cache_hit(id) {
                tracing::trace!(id, "container cache hit");
                return Ok(hit);
            }
        }

        // Interface names with exactly one implementation resolve as that
        // implementation; the instance is cached under the implementation id.
        if let Some(target) = self.inner.plans.alias(id) {
            let target = target.to_string();
            return self.resolve(&target, in_progress);
        }

        if in_progress.iter().any(|entry| entry == id) {
            let mut chain = in_progress.clone();
            chain.push(id.to_string());
            return Err(ResolveError::CycleDetected { chain });
        }

        let plan = self
            .inner
            .plans
            .plan(id)
            .ok_or_else(|| ResolveError::ServiceNotFound(id.to_string()))?;

        in_progress.push(id.to_string());
        let mut resolved = Vec::with_capacity(plan.requirements.len());
        for requirement in &plan.requirements {
            match requirement {
                Requirement::Service(dep_id) => {
                    resolved.push(Dependency::Service(self.resolve(dep_id, in_progress)?));
                }
                Requirement::Config(name) => {
                    resolved.push(Dependency::Config {
                        name: name.clone(),
                        value: self.inner.config.get(name).cloned(),
                    });
                }
            }
        }
        in_progress.pop();

        let mut deps = Dependencies::new(id, resolved);
        let instance = (plan.construct)(&mut deps)?;
        tracing::debug!(id, "service constructed");

        if self.inner.policy.is_singleton() {
            if let Ok(mut cache) = self.inner.cache.lock() {
                cache.insert(id.to_string(), instance.clone());
            }
        }

        Ok(instance)
    }
}
