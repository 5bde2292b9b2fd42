//! # fennec - Descriptor-Driven Application Core
//!
//! `fennec` is a small application core built around an explicit descriptor
//! table: every injectable type declares its wiring once, at boot, and the
//! container, HTTP dispatcher, and CLI runner only ever read that table.
//! There is no runtime reflection and no global state; a container lives
//! exactly as long as the request it serves.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fennec::{App, HandlerParam, HandlerSpec, ServiceDescriptor};
//!
//! struct PingController;
//!
//! let app = App::builder()
//!     .service(
//!         ServiceDescriptor::controller("PingController", "/ping")
//!             .autowire(|_| Ok(PingController))
//!             .handler(HandlerSpec::new::<PingController, _>(
//!                 "GET",
//!                 Vec::new(),
//!                 |_, _| Ok("pong".into()),
//!             )),
//!     )
//!     .build()?;
//!
//! let response = app.handle_http(&fennec::HttpRequest::new("GET", "/ping"));
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod app;

pub use app::{App, AppBuilder};

pub use fennec_core::{
    // Hooks and commands
    ActionContext,
    // Configuration
    AppConfig,
    // Handler arguments
    Args,
    BeforeAction,
    // Errors
    BindError,
    // Body binding
    BoundBody,
    BoundValue,
    BoxError,
    BuildError,
    CONFIG_ID,
    CONTAINER_ID,
    CliError,
    Command,
    ConfigValue,
    ContainerConfig,
    // Descriptors
    CtorParam,
    DataDescriptor,
    Dependencies,
    FennecError,
    FieldShape,
    FieldValues,
    HandlerError,
    HandlerParam,
    HandlerSpec,
    HttpError,
    // HTTP boundary
    HttpRequest,
    HttpResponse,
    Payload,
    Reply,
    ResolveError,
    Response,
    SecretError,
    ServiceDescriptor,
    ServiceKind,
    SharedInstance,
};

pub use fennec_std::binder::{Binder, BinderBuilder};
pub use fennec_std::cli::CommandRunner;
pub use fennec_std::di::{Container, ContainerHandle, FactoryBuilder, Plans};
pub use fennec_std::http::{Dispatcher, RouteTable, RouteTemplate};
pub use fennec_std::secret::SecretBox;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use fennec_std::testing::*;
}

/// Prelude module - common imports for Fennec.
///
/// # Usage
///
/// ```rust,ignore
/// use fennec::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // The facade
        App,
        AppConfig,
        // Hooks and commands
        BeforeAction,
        BoxError,
        Command,
        ContainerConfig,
        // Descriptors
        CtorParam,
        DataDescriptor,
        FieldShape,
        HandlerParam,
        HandlerSpec,
        HttpError,
        // HTTP boundary
        HttpRequest,
        HttpResponse,
        Reply,
        Response,
        ServiceDescriptor,
    };
}
