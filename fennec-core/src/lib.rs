//! # fennec-core
//!
//! Core types for the Fennec application core: the descriptor model that
//! replaces runtime reflection, the configuration stores, the HTTP boundary
//! types, the body-binding descriptor model, and the error taxonomy.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! embedding applications that register descriptors but don't need the full
//! `fennec-std` machinery.
//!
//! # The descriptor table
//!
//! Everything the container and dispatcher do is driven by two read-only
//! tables built once at boot:
//!
//! - [`ServiceDescriptor`]: per discoverable type, its capability kind
//!   (Service / Controller / Command), implemented interfaces, ordered
//!   constructor parameters, a construct function, and kind-specific payload.
//! - [`DataDescriptor`]: per bindable data-object type, the required
//!   constructor fields, a positional construct function, and optional
//!   setter-bound fields.
//!
//! No resolution code ever inspects a live type; discovery is an external
//! collaborator that merely produces these tables.
//!
//! # Error Types
//!
//! - [`FennecError`] - Top-level error type
//! - [`BuildError`] - Fatal wiring errors (boot time)
//! - [`ResolveError`] - Container resolution errors
//! - [`HttpError`] - Status-bearing request errors
//! - [`BindError`] - Body/argument binding errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bind;
mod config;
mod descriptor;
mod error;
mod http;
mod service;

// Re-exports
pub use bind::{
    ApplyFn, BoundBody, BoundValue, BoxedData, ConstructDataFn, DataDescriptor, FieldShape,
    FieldSpec, FieldValues, SetterSpec, value_type_name,
};
pub use config::{AppConfig, ConfigValue, ContainerConfig};
pub use descriptor::{
    BeforeActionCastFn, CommandEntryFn, CtorParam, HandlerParam, HandlerSpec, InvokeFn, ParamGoal,
    ParamSource, ServiceDescriptor, ServiceKind,
};
pub use error::{
    BindError, BoxError, BuildError, CliError, FennecError, HandlerError, HttpError, ResolveError,
    SecretError,
};
pub use http::{Args, HandlerArg, HttpRequest, HttpResponse, Payload, Reply, Response};
pub use service::{
    ActionContext, BeforeAction, CONFIG_ID, CONTAINER_ID, Command, ConstructFn, Dependencies,
    Dependency, SharedInstance,
};
