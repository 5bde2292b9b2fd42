//! Error types for Fennec.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`FennecError`] - Top-level error type for all Fennec operations
//! - [`BuildError`] - Fatal wiring errors raised while building factory plans
//! - [`ResolveError`] - Errors raised while resolving services at runtime
//! - [`HttpError`] - Request-scoped errors carrying an HTTP status code
//! - [`BindError`] - Errors raised while binding untyped values to typed fields
//! - [`CliError`] - Errors raised by the command runner
//! - [`SecretError`] - Errors raised by the secret-box helper

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Fennec operations.
#[derive(Error, Debug)]
pub enum FennecError {
    /// A fatal error occurred while building the container plans.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// An error occurred while resolving a service.
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// An HTTP-class error occurred during dispatch.
    #[error("http error: {0}")]
    Http(#[from] HttpError),

    /// An error occurred while binding a request body.
    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    /// An error occurred while running a CLI command.
    #[error("cli error: {0}")]
    Cli(#[from] CliError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Fatal errors raised while turning service descriptors into factory plans.
///
/// Every variant aborts startup: a misconfigured object graph must never
/// silently degrade into partial wiring.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A constructor parameter names an interface with more than one
    /// registered implementation.
    #[error("interface '{interface}' has multiple implementations: {candidates:?}")]
    AmbiguousBinding {
        /// The ambiguous interface name.
        interface: String,
        /// Every service id implementing the interface.
        candidates: Vec<String>,
    },

    /// A constructor parameter names a type that is neither a registered
    /// service, a known interface, nor a bootstrap entry.
    #[error("service '{service}' depends on unknown type '{dependency}'")]
    UnknownDependency {
        /// The service declaring the dependency.
        service: String,
        /// The unresolvable declared type.
        dependency: String,
    },

    /// The descriptor is not marked for constructor injection. Manual factory
    /// wiring is not supported.
    #[error("service '{0}' is not autowired")]
    NotAutowired(String),

    /// An eager (`lazy = false`) container was requested.
    #[error("eager container construction is not supported")]
    EagerNotSupported,

    /// Two descriptors share the same service id.
    #[error("duplicate service id '{0}'")]
    DuplicateService(String),

    /// Two controllers declare the same route template.
    #[error("duplicate route template '{0}'")]
    DuplicateRoute(String),

    /// Two commands declare the same `namespace:name` identifier.
    #[error("duplicate command id '{0}'")]
    DuplicateCommand(String),

    /// Two data descriptors share the same type key.
    #[error("duplicate data type '{0}'")]
    DuplicateDataType(String),

    /// A command descriptor has no registered entry point.
    #[error("command '{0}' has no entry point")]
    MissingEntryPoint(String),

    /// A route template could not be parsed.
    #[error("invalid route template '{template}': {reason}")]
    InvalidRoute {
        /// The offending template string.
        template: String,
        /// Why parsing rejected it.
        reason: String,
    },
}

/// Errors raised while resolving services through the container.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No factory plan exists for the requested identifier.
    #[error("service '{0}' was not found")]
    ServiceNotFound(String),

    /// A dependency chain revisited an identifier that is still being
    /// resolved.
    #[error("dependency cycle detected: {}", chain.join(" -> "))]
    CycleDetected {
        /// The in-progress resolution chain, ending at the revisited id.
        chain: Vec<String>,
    },

    /// A primitive constructor parameter had no configuration value.
    #[error("missing configuration parameter '{0}'")]
    MissingConfig(String),

    /// A resolved instance could not be downcast to the expected type.
    #[error("instance '{id}' is not a '{expected}'")]
    WrongInstanceType {
        /// The resolved service id.
        id: String,
        /// The type the caller asked for.
        expected: &'static str,
    },

    /// A construct function failed.
    #[error("construction of '{id}' failed: {source}")]
    Construction {
        /// The service being constructed.
        id: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },

    /// A construct function consumed more arguments than its plan declared.
    #[error("construction of '{0}' ran out of declared dependencies")]
    DependencyExhausted(String),

    /// The owning container was dropped while a handle was still in use.
    #[error("container is no longer alive")]
    ContainerGone,
}

/// Request-scoped errors carrying an HTTP status code.
///
/// These are caught centrally by the dispatcher, rendered as a minimal
/// response body, and never propagate past the request boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// No route matched the request path (404).
    #[error("not found")]
    NotFound,

    /// The matched controller has no handler for the request verb (405).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The request body or parameters were malformed (400).
    #[error("{0}")]
    BadRequest(String),
}

impl HttpError {
    /// The HTTP status code this error renders as.
    pub fn status(&self) -> u16 {
        match self {
            HttpError::NotFound => 404,
            HttpError::MethodNotAllowed => 405,
            HttpError::BadRequest(_) => 400,
        }
    }

    /// Optional human-readable detail for the response body.
    pub fn message(&self) -> Option<&str> {
        match self {
            HttpError::BadRequest(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Errors raised while binding untyped values to typed parameters and fields.
///
/// [`BindError::TypeMismatch`] and [`BindError::MissingArgument`] are distinct
/// variants: callers that treat a mismatch as a client error (400) must not
/// swallow a missing required argument, and never need to parse messages to
/// tell the two apart.
#[derive(Error, Debug)]
pub enum BindError {
    /// An optional body key has no matching setter on the target type.
    #[error("unknown body argument '{0}'")]
    UnknownArgument(String),

    /// A value could not be coerced to the declared parameter type.
    #[error("parameter '{parameter}' expected to be '{expected}', '{given}' given")]
    TypeMismatch {
        /// The offending parameter name.
        parameter: String,
        /// The declared type text.
        expected: String,
        /// The type text of the value actually given.
        given: String,
    },

    /// A required argument was absent.
    #[error("missing required argument '{parameter}'")]
    MissingArgument {
        /// The absent parameter name.
        parameter: String,
    },

    /// No data descriptor is registered under the given type key.
    #[error("no bindable type registered as '{0}'")]
    UnknownType(String),

    /// Nested binding exceeded the maximum recursion depth.
    #[error("binding exceeded maximum depth of {limit}")]
    DepthExceeded {
        /// The configured depth limit.
        limit: usize,
    },
}

/// Errors raised by a handler invocation.
///
/// The dispatcher translates argument mismatches into `BadRequest` but lets
/// missing-argument and internal failures propagate unmodified; keeping the
/// categories as separate variants is what makes that translation structural.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// An argument could not be bound or coerced.
    #[error(transparent)]
    Argument(#[from] BindError),

    /// The handler raised an HTTP-class error itself.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The handler failed for an internal reason.
    #[error(transparent)]
    Other(BoxError),
}

/// Errors raised by the command runner.
#[derive(Error, Debug)]
pub enum CliError {
    /// No command name was supplied on the command line.
    #[error("not enough parameters, missing command name")]
    MissingCommand,

    /// The supplied command id is not registered.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// The command itself failed.
    #[error("command '{name}' failed: {source}")]
    Failed {
        /// The command id that failed.
        name: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },
}

/// Errors raised by the secret-box helper.
#[derive(Error, Debug)]
pub enum SecretError {
    /// The key material has the wrong length.
    #[error("secret key must be exactly 32 bytes")]
    BadKey,

    /// The sealed payload is not valid base64 or is truncated.
    #[error("sealed payload is malformed")]
    Malformed,

    /// Decryption failed. No further detail is exposed.
    #[error("could not open sealed payload")]
    Opaque,
}

// Convenience conversions
impl From<BoxError> for FennecError {
    fn from(err: BoxError) -> Self {
        FennecError::Custom(err)
    }
}
