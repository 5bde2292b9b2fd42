//! The application facade.
//!
//! [`App`] owns everything built once at boot (factory plans, data
//! descriptors, configuration) and hands out per-request containers. The two
//! entry points mirror the two front doors of an application: HTTP requests
//! via [`App::handle_http`] and the command line via [`App::run_command`].
//!
//! Boot is fail-fast: any wiring defect in the registered descriptors aborts
//! [`AppBuilder::build`] with a [`BuildError`] before a single request is
//! served.

use fennec_core::{
    AppConfig, BuildError, CliError, ContainerConfig, DataDescriptor, HttpRequest, HttpResponse,
    ServiceDescriptor,
};
use fennec_std::binder::BinderBuilder;
use fennec_std::cli::CommandRunner;
use fennec_std::di::{Container, FactoryBuilder, Plans};
use fennec_std::http::Dispatcher;
use std::sync::Arc;

/// Collects descriptors and configuration, then boots an [`App`].
pub struct AppBuilder {
    services: Vec<ServiceDescriptor>,
    data_types: Vec<DataDescriptor>,
    config: AppConfig,
    policy: ContainerConfig,
}

impl AppBuilder {
    fn new() -> Self {
        Self {
            services: Vec::new(),
            data_types: Vec::new(),
            config: AppConfig::new(),
            policy: ContainerConfig::singleton(),
        }
    }

    /// Register a service, controller, or command descriptor.
    pub fn service(mut self, descriptor: ServiceDescriptor) -> Self {
        self.services.push(descriptor);
        self
    }

    /// Register a bindable data-object type.
    pub fn data_type(mut self, descriptor: DataDescriptor) -> Self {
        self.data_types.push(descriptor);
        self
    }

    /// Set the application configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the container instancing policy.
    pub fn container_config(mut self, policy: ContainerConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the wiring and boot the application.
    pub fn build(self) -> Result<App, BuildError> {
        let plans = Arc::new(FactoryBuilder::new(self.services).build()?);
        let mut binder = BinderBuilder::new();
        for descriptor in self.data_types {
            binder.register(descriptor)?;
        }
        let binder = Arc::new(binder.build());
        tracing::info!("application booted");
        Ok(App {
            dispatcher: Dispatcher::new(plans.clone(), binder),
            runner: CommandRunner::new(plans.clone()),
            plans,
            config: Arc::new(self.config),
            policy: self.policy,
        })
    }
}

/// A booted application.
pub struct App {
    plans: Arc<Plans>,
    dispatcher: Dispatcher,
    runner: CommandRunner,
    config: Arc<AppConfig>,
    policy: ContainerConfig,
}

impl App {
    /// Start collecting descriptors for a new application.
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// A fresh container scoped to one request or invocation.
    pub fn container(&self) -> Container {
        Container::new(self.plans.clone(), self.policy, self.config.clone())
    }

    /// Handle one HTTP request.
    ///
    /// Every outcome becomes a response: client errors are rendered by the
    /// dispatcher, internal failures are logged and collapse to a 500 whose
    /// body carries detail only when debug mode is on.
    pub fn handle_http(&self, request: &HttpRequest) -> HttpResponse {
        let container = self.container();
        match self.dispatcher.dispatch(&container, request) {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    error = %err,
                    "request failed"
                );
                if self.config.is_debug() {
                    HttpResponse::text(500, format!("Error 500: {err}"))
                } else {
                    HttpResponse::text(500, "Error 500")
                }
            }
        }
    }

    /// Run one CLI invocation from the raw argv.
    pub fn run_command(&self, argv: &[String]) -> Result<(), CliError> {
        let container = self.container();
        self.runner.run(&container, argv)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("plans", &self.plans)
            .field("policy", &self.policy)
            .finish()
    }
}
