//! Service descriptors.
//!
//! A [`ServiceDescriptor`] is the explicit, once-built replacement for
//! runtime reflection: it carries everything the factory builder needs to
//! wire a type: its capability kind, implemented interface names, ordered
//! constructor parameters and a construct function, plus kind-specific
//! payload (handler table for controllers, entry closure for commands).
//!
//! Descriptors are produced by whatever discovery mechanism the embedding
//! application uses (a build step, static registration, hand-written
//! bootstrap code); the container and dispatcher only ever read this table.

use crate::error::HandlerError;
use crate::http::{Args, Reply};
use crate::service::{BeforeAction, Command, ConstructFn, Dependencies, SharedInstance};
use std::sync::Arc;

/// The capability kind of a discoverable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKind {
    /// A plain container-managed service.
    Service,
    /// A service bound to exactly one route template.
    Controller {
        /// The route template, e.g. `/users/{id}`.
        route: String,
    },
    /// A service bound to a CLI command identifier.
    Command {
        /// The command namespace.
        namespace: String,
        /// The command name within its namespace.
        name: String,
    },
}

/// Where a constructor parameter's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSource {
    /// A primitive (string or list) parameter, bound to a configuration
    /// lookup under the parameter's name.
    Config,
    /// A service parameter, resolved through the container. The string is
    /// the declared type: either a registered service id or an interface
    /// name with exactly one implementation.
    Service(String),
}

/// One ordered constructor parameter.
#[derive(Debug, Clone)]
pub struct CtorParam {
    /// The parameter name (also the configuration key for primitives).
    pub name: String,
    /// The value source.
    pub source: ParamSource,
}

impl CtorParam {
    /// A configuration-bound primitive parameter.
    pub fn config(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ParamSource::Config,
        }
    }

    /// A service parameter with the given declared type.
    pub fn service(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ParamSource::Service(declared_type.into()),
        }
    }
}

/// How a handler parameter is filled at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamGoal {
    /// A path capture, passed through as text.
    Text,
    /// The untyped request body.
    Untyped,
    /// The request body bound to the data descriptor registered under the
    /// given key.
    Data(String),
}

/// One declared handler parameter, in declaration order.
#[derive(Debug, Clone)]
pub struct HandlerParam {
    /// The parameter name; path captures bind by this name.
    pub name: String,
    /// How the parameter is filled.
    pub goal: ParamGoal,
}

impl HandlerParam {
    /// A text parameter (path capture).
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goal: ParamGoal::Text,
        }
    }

    /// An untyped body parameter.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goal: ParamGoal::Untyped,
        }
    }

    /// A typed body parameter bound against a registered data descriptor.
    pub fn data(name: impl Into<String>, type_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goal: ParamGoal::Data(type_key.into()),
        }
    }
}

/// The type-erased invocation of one verb handler.
pub type InvokeFn = Arc<dyn Fn(SharedInstance, Args) -> Result<Reply, HandlerError> + Send + Sync>;

/// One verb-named handler method of a controller.
#[derive(Clone)]
pub struct HandlerSpec {
    /// The lowercased verb name this handler answers to.
    pub name: String,
    /// Declared parameters, in declaration order.
    pub params: Vec<HandlerParam>,
    /// The invocation closure.
    pub invoke: InvokeFn,
}

impl HandlerSpec {
    /// Build a handler for the concrete controller type `C`.
    ///
    /// The closure receives the resolved controller and the positional
    /// arguments; the verb is lowercased once here so dispatch never has to.
    pub fn new<C, F>(verb: impl Into<String>, params: Vec<HandlerParam>, handler: F) -> Self
    where
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, &mut Args) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        let name = verb.into().to_lowercase();
        Self {
            name,
            params,
            invoke: Arc::new(move |instance, mut args| {
                let controller = instance.downcast::<C>().map_err(|_| {
                    HandlerError::Other(
                        format!("controller is not a '{}'", std::any::type_name::<C>()).into(),
                    )
                })?;
                handler(controller, &mut args)
            }),
        }
    }
}

/// The type-erased entry point of a command service.
pub type CommandEntryFn =
    Arc<dyn Fn(SharedInstance, &[String]) -> Result<(), crate::error::BoxError> + Send + Sync>;

/// Casts a resolved instance to its [`BeforeAction`] trait object.
pub type BeforeActionCastFn =
    Arc<dyn Fn(SharedInstance) -> Option<Arc<dyn BeforeAction>> + Send + Sync>;

/// The immutable wiring record for one discoverable type.
#[derive(Clone)]
pub struct ServiceDescriptor {
    id: String,
    kind: ServiceKind,
    interfaces: Vec<String>,
    params: Vec<CtorParam>,
    autowire: bool,
    construct: Option<ConstructFn>,
    handlers: Vec<HandlerSpec>,
    command_entry: Option<CommandEntryFn>,
    before_action: Option<BeforeActionCastFn>,
}

impl ServiceDescriptor {
    fn with_kind(id: impl Into<String>, kind: ServiceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            interfaces: Vec::new(),
            params: Vec::new(),
            autowire: false,
            construct: None,
            handlers: Vec::new(),
            command_entry: None,
            before_action: None,
        }
    }

    /// A plain service descriptor.
    pub fn service(id: impl Into<String>) -> Self {
        Self::with_kind(id, ServiceKind::Service)
    }

    /// A controller descriptor bound to one route template.
    pub fn controller(id: impl Into<String>, route: impl Into<String>) -> Self {
        Self::with_kind(
            id,
            ServiceKind::Controller {
                route: route.into(),
            },
        )
    }

    /// A command descriptor bound to a `namespace:name` identifier.
    pub fn command(
        id: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            id,
            ServiceKind::Command {
                namespace: namespace.into(),
                name: name.into(),
            },
        )
    }

    /// Record an implemented interface name.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Append a constructor parameter. Order of calls is positional order.
    pub fn param(mut self, param: CtorParam) -> Self {
        self.params.push(param);
        self
    }

    /// Mark the descriptor autowired and supply its construct function.
    ///
    /// The function receives resolved dependencies in declared order and
    /// returns the concrete instance; type erasure happens here.
    pub fn autowire<T, F>(mut self, construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut Dependencies) -> Result<T, crate::error::ResolveError> + Send + Sync + 'static,
    {
        self.autowire = true;
        self.construct = Some(Arc::new(move |deps| {
            Ok(Arc::new(construct(deps)?) as SharedInstance)
        }));
        self
    }

    /// Append a verb handler (controllers only).
    pub fn handler(mut self, handler: HandlerSpec) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Register the command entry point for the concrete type `T`.
    pub fn run_as<T: Command>(mut self) -> Self {
        self.command_entry = Some(Arc::new(|instance, args| {
            let command = instance
                .downcast::<T>()
                .map_err(|_| -> crate::error::BoxError {
                    format!("command is not a '{}'", std::any::type_name::<T>()).into()
                })?;
            command.run(args)
        }));
        self
    }

    /// Mark the concrete type `T` usable as a pre-hook.
    pub fn before_action_as<T: BeforeAction>(mut self) -> Self {
        self.before_action = Some(Arc::new(|instance| {
            instance
                .downcast::<T>()
                .ok()
                .map(|typed| typed as Arc<dyn BeforeAction>)
        }));
        self
    }

    /// The service identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The capability kind.
    pub fn kind(&self) -> &ServiceKind {
        &self.kind
    }

    /// Implemented interface names.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Ordered constructor parameters.
    pub fn params(&self) -> &[CtorParam] {
        &self.params
    }

    /// Whether constructor injection is enabled for this descriptor.
    pub fn is_autowire(&self) -> bool {
        self.autowire
    }

    /// The construct function, if one was registered.
    pub fn construct_fn(&self) -> Option<ConstructFn> {
        self.construct.clone()
    }

    /// The controller handler table.
    pub fn handlers(&self) -> &[HandlerSpec] {
        &self.handlers
    }

    /// The command entry closure, if any.
    pub fn command_entry(&self) -> Option<CommandEntryFn> {
        self.command_entry.clone()
    }

    /// The pre-hook caster, if any.
    pub fn before_action_cast(&self) -> Option<BeforeActionCastFn> {
        self.before_action.clone()
    }
}
