//! The factory builder.
//!
//! Consumes the full descriptor set once, at boot, and emits read-only
//! [`Plans`]: per-service factory plans (ordered requirement list plus
//! construct function), the route table, and the command table.
//!
//! All validation happens here and every failure is fatal: ambiguous
//! interface bindings, unknown dependency types, non-autowired descriptors
//! and duplicate identifiers abort startup instead of degrading into partial
//! wiring.

use crate::http::router::{RouteEntry, RouteTable, RouteTemplate};
use fennec_core::{
    BeforeActionCastFn, BuildError, CommandEntryFn, ConstructFn, CtorParam, ParamSource,
    ServiceDescriptor, ServiceKind,
};
use indexmap::IndexMap;

/// One resolved constructor requirement, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Resolve another service by id.
    Service(String),
    /// Look up a configuration parameter by name.
    Config(String),
}

/// The generated construction plan for one service.
pub struct FactoryPlan {
    /// Ordered requirements, resolved before construction.
    pub requirements: Vec<Requirement>,
    /// The construct function.
    pub construct: ConstructFn,
    /// Present when the service can act as a pre-hook.
    pub before_action: Option<BeforeActionCastFn>,
}

/// A registered CLI command.
pub struct CommandBinding {
    /// The backing service id.
    pub service_id: String,
    /// The type-erased entry point.
    pub entry: CommandEntryFn,
}

/// Everything the factory builder emits. Built once, read-only thereafter.
pub struct Plans {
    plans: IndexMap<String, FactoryPlan>,
    aliases: IndexMap<String, String>,
    routes: RouteTable,
    commands: IndexMap<String, CommandBinding>,
}

impl Plans {
    /// The factory plan for a service id, if one was generated.
    pub fn plan(&self, id: &str) -> Option<&FactoryPlan> {
        self.plans.get(id)
    }

    /// Resolve an interface name to its single implementation id.
    pub fn alias(&self, id: &str) -> Option<&str> {
        self.aliases.get(id).map(String::as_str)
    }

    /// Whether a plan (or unambiguous interface alias) exists for the id.
    pub fn contains(&self, id: &str) -> bool {
        self.plans.contains_key(id) || self.aliases.contains_key(id)
    }

    /// The route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Look up a command by its `namespace:name` identifier.
    pub fn command(&self, id: &str) -> Option<&CommandBinding> {
        self.commands.get(id)
    }
}

impl std::fmt::Debug for Plans {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plans")
            .field("services", &self.plans.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .field("routes", &self.routes.len())
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds [`Plans`] from the full descriptor set.
pub struct FactoryBuilder {
    descriptors: Vec<ServiceDescriptor>,
}

impl FactoryBuilder {
    /// Start from a descriptor set, in discovery order.
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Generate the plans, route table and command table.
    pub fn build(self) -> Result<Plans, BuildError> {
        let interfaces = self.map_interfaces();

        let mut plans: IndexMap<String, FactoryPlan> = IndexMap::new();
        let mut routes = RouteTable::new();
        let mut commands: IndexMap<String, CommandBinding> = IndexMap::new();

        for descriptor in &self.descriptors {
            let id = descriptor.id().to_string();

            let construct = match (descriptor.is_autowire(), descriptor.construct_fn()) {
                (true, Some(construct)) => construct,
                _ => return Err(BuildError::NotAutowired(id)),
            };

            let mut requirements = Vec::with_capacity(descriptor.params().len());
            for param in descriptor.params() {
                requirements.push(self.requirement(descriptor, param, &interfaces)?);
            }

            match descriptor.kind() {
                ServiceKind::Service => {}
                ServiceKind::Controller { route } => {
                    let template = RouteTemplate::parse(route)?;
                    let mut handlers = IndexMap::new();
                    for handler in descriptor.handlers() {
                        handlers.insert(handler.name.clone(), handler.clone());
                    }
                    routes.insert(RouteEntry {
                        template,
                        service_id: id.clone(),
                        handlers,
                    })?;
                }
                ServiceKind::Command { namespace, name } => {
                    let command_id = format!("{namespace}:{name}");
                    let entry = descriptor
                        .command_entry()
                        .ok_or_else(|| BuildError::MissingEntryPoint(command_id.clone()))?;
                    if commands.contains_key(&command_id) {
                        return Err(BuildError::DuplicateCommand(command_id));
                    }
                    commands.insert(
                        command_id,
                        CommandBinding {
                            service_id: id.clone(),
                            entry,
                        },
                    );
                }
            }

            let plan = FactoryPlan {
                requirements,
                construct,
                before_action: descriptor.before_action_cast(),
            };
            if plans.insert(id.clone(), plan).is_some() {
                return Err(BuildError::DuplicateService(id));
            }
        }

        // Interfaces with exactly one implementation resolve directly;
        // ambiguous ones only fail when a parameter references them, and
        // never get an alias.
        let mut aliases = IndexMap::new();
        for (interface, implementors) in &interfaces {
            if let [only] = implementors.as_slice() {
                aliases.insert(interface.clone(), only.clone());
            }
        }

        tracing::debug!(
            services = plans.len(),
            routes = routes.len(),
            commands = commands.len(),
            "factory plans built"
        );

        Ok(Plans {
            plans,
            aliases,
            routes,
            commands,
        })
    }

    fn map_interfaces(&self) -> IndexMap<String, Vec<String>> {
        let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
        for descriptor in &self.descriptors {
            for interface in descriptor.interfaces() {
                map.entry(interface.clone())
                    .or_default()
                    .push(descriptor.id().to_string());
            }
        }
        map
    }

    fn requirement(
        &self,
        descriptor: &ServiceDescriptor,
        param: &CtorParam,
        interfaces: &IndexMap<String, Vec<String>>,
    ) -> Result<Requirement, BuildError> {
        let declared = match &param.source {
            ParamSource::Config => return Ok(Requirement::Config(param.name.clone())),
            ParamSource::Service(declared) => declared,
        };

        if let Some(implementors) = interfaces.get(declared) {
            return match implementors.as_slice() {
                [only] => Ok(Requirement::Service(only.clone())),
                _ => Err(BuildError::AmbiguousBinding {
                    interface: declared.clone(),
                    candidates: implementors.clone(),
                }),
            };
        }

        let known = self.descriptors.iter().any(|d| d.id() == declared)
            || declared == fennec_core::CONFIG_ID
            || declared == fennec_core::CONTAINER_ID;
        if known {
            Ok(Requirement::Service(declared.clone()))
        } else {
            Err(BuildError::UnknownDependency {
                service: descriptor.id().to_string(),
                dependency: declared.clone(),
            })
        }
    }
}
