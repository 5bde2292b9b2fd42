//! Runtime service instances and the dependency cursor.
//!
//! Constructed services are stored type-erased as [`SharedInstance`] so the
//! container can hold an arbitrary object graph behind string identifiers.
//! Construct functions receive their resolved dependencies positionally
//! through [`Dependencies`], in the exact order the descriptor declared them.

use crate::bind::BoundBody;
use crate::config::ConfigValue;
use crate::error::{BoxError, HttpError, ResolveError};
use std::any::Any;
use std::sync::Arc;

/// A type-erased, shareable service instance.
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// The bootstrap identifier of the seeded application configuration.
pub const CONFIG_ID: &str = "AppConfig";

/// The bootstrap identifier of the container's own handle.
pub const CONTAINER_ID: &str = "Container";

/// One resolved constructor argument.
#[derive(Clone)]
pub enum Dependency {
    /// A resolved service instance.
    Service(SharedInstance),
    /// A configuration-bound primitive value, absent when the parameter store
    /// has no entry under the given name.
    Config {
        /// The configuration parameter name.
        name: String,
        /// The looked-up value, if any.
        value: Option<ConfigValue>,
    },
}

/// Positional cursor over the resolved arguments of one construct call.
///
/// A construct function consumes its arguments in declaration order:
///
/// ```rust,ignore
/// |deps| {
///     let repo = deps.service::<SqlUserRepository>()?;
///     let dsn = deps.config_text()?;
///     Ok(Arc::new(UserService::new(repo, dsn)))
/// }
/// ```
pub struct Dependencies {
    id: String,
    items: std::vec::IntoIter<Dependency>,
}

impl Dependencies {
    /// Create a cursor for the service with the given id.
    pub fn new(id: impl Into<String>, items: Vec<Dependency>) -> Self {
        Self {
            id: id.into(),
            items: items.into_iter(),
        }
    }

    /// The id of the service being constructed.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn next(&mut self) -> Result<Dependency, ResolveError> {
        self.items
            .next()
            .ok_or_else(|| ResolveError::DependencyExhausted(self.id.clone()))
    }

    /// Take the next dependency as a concrete service instance.
    pub fn service<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, ResolveError> {
        let shared = self.shared()?;
        shared
            .downcast::<T>()
            .map_err(|_| ResolveError::WrongInstanceType {
                id: self.id.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Take the next dependency as a raw type-erased instance.
    pub fn shared(&mut self) -> Result<SharedInstance, ResolveError> {
        match self.next()? {
            Dependency::Service(instance) => Ok(instance),
            Dependency::Config { .. } => Err(ResolveError::WrongInstanceType {
                id: self.id.clone(),
                expected: "service instance",
            }),
        }
    }

    /// Take the next dependency as a required configuration string.
    pub fn config_text(&mut self) -> Result<String, ResolveError> {
        match self.next()? {
            Dependency::Config {
                value: Some(ConfigValue::Text(text)),
                ..
            } => Ok(text),
            Dependency::Config { name, .. } => Err(ResolveError::MissingConfig(name)),
            Dependency::Service(_) => Err(ResolveError::WrongInstanceType {
                id: self.id.clone(),
                expected: "configuration value",
            }),
        }
    }

    /// Take the next dependency as a required configuration list.
    pub fn config_list(&mut self) -> Result<Vec<String>, ResolveError> {
        match self.next()? {
            Dependency::Config {
                value: Some(ConfigValue::List(items)),
                ..
            } => Ok(items),
            Dependency::Config { name, .. } => Err(ResolveError::MissingConfig(name)),
            Dependency::Service(_) => Err(ResolveError::WrongInstanceType {
                id: self.id.clone(),
                expected: "configuration value",
            }),
        }
    }

    /// Take the next dependency as an optional configuration value.
    pub fn config_opt(&mut self) -> Result<Option<ConfigValue>, ResolveError> {
        match self.next()? {
            Dependency::Config { value, .. } => Ok(value),
            Dependency::Service(_) => Err(ResolveError::WrongInstanceType {
                id: self.id.clone(),
                expected: "configuration value",
            }),
        }
    }
}

/// The function that builds a service from its resolved dependencies.
pub type ConstructFn =
    Arc<dyn Fn(&mut Dependencies) -> Result<SharedInstance, ResolveError> + Send + Sync>;

/// Context handed to every pre-hook before a handler call.
pub struct ActionContext<'a> {
    /// The matched controller's service id.
    pub controller: &'a str,
    /// The lowercased handler method name.
    pub method: &'a str,
    /// The bound request body, when a body parameter was implied.
    pub body: Option<&'a BoundBody>,
}

/// A pre-hook invoked before every handler call.
///
/// Hooks run strictly sequentially in the order the application configuration
/// lists them; the first failure aborts remaining hooks and the handler.
pub trait BeforeAction: Send + Sync + 'static {
    /// Inspect (or reject) the pending handler invocation.
    fn before(&self, ctx: ActionContext<'_>) -> Result<(), HttpError>;
}

/// A CLI command entry point.
///
/// Commands are resolved through the container like any other service; the
/// runner passes every argument after the command id positionally.
pub trait Command: Send + Sync + 'static {
    /// Run the command with its positional arguments.
    fn run(&self, args: &[String]) -> Result<(), BoxError>;
}
