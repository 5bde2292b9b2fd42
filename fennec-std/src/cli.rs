//! CLI command dispatch.
//!
//! Commands are ordinary container-managed services registered under a
//! `namespace:name` identifier. The runner takes the raw argv: the first
//! argument after the program name selects the command, everything after it
//! is passed through positionally.

use crate::di::{Container, Plans};
use fennec_core::CliError;
use std::sync::Arc;

/// Resolves and runs registered commands.
pub struct CommandRunner {
    plans: Arc<Plans>,
}

impl CommandRunner {
    /// Create a runner over built plans.
    pub fn new(plans: Arc<Plans>) -> Self {
        Self { plans }
    }

    /// Run the command selected by `argv`.
    ///
    /// `argv[0]` is the program name and is ignored; `argv[1]` is the
    /// `namespace:name` command id; the rest are the command's positional
    /// arguments.
    pub fn run(&self, container: &Container, argv: &[String]) -> Result<(), CliError> {
        let Some(id) = argv.get(1) else {
            tracing::error!("no command given");
            return Err(CliError::MissingCommand);
        };
        let Some(binding) = self.plans.command(id) else {
            tracing::error!(command = %id, "unknown command");
            return Err(CliError::UnknownCommand(id.clone()));
        };

        let instance =
            container
                .get(&binding.service_id)
                .map_err(|source| CliError::Failed {
                    name: id.clone(),
                    source: Box::new(source),
                })?;

        tracing::info!(command = %id, "running command");
        (binding.entry)(instance, &argv[2..]).map_err(|source| CliError::Failed {
            name: id.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CommandRunner;
    use crate::di::{Container, FactoryBuilder};
    use fennec_core::{
        AppConfig, BoxError, CliError, Command, ContainerConfig, ServiceDescriptor,
    };
    use std::sync::Arc;
    use std::sync::Mutex;

    struct Seed {
        seen: Mutex<Vec<String>>,
    }

    impl Command for Seed {
        fn run(&self, args: &[String]) -> Result<(), BoxError> {
            if args.iter().any(|arg| arg == "--fail") {
                return Err("seed data rejected".into());
            }
            self.seen
                .lock()
                .map_err(|_| -> BoxError { "state poisoned".into() })?
                .extend(args.iter().cloned());
            Ok(())
        }
    }

    fn fixture() -> (CommandRunner, Container) {
        let descriptors = vec![ServiceDescriptor::command("Seed", "db", "seed")
            .autowire(|_| {
                Ok(Seed {
                    seen: Mutex::new(Vec::new()),
                })
            })
            .run_as::<Seed>()];
        let plans = Arc::new(FactoryBuilder::new(descriptors).build().unwrap());
        let runner = CommandRunner::new(plans.clone());
        let container = Container::new(
            plans,
            ContainerConfig::singleton(),
            Arc::new(AppConfig::new()),
        );
        (runner, container)
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn runs_the_selected_command_with_positional_args() {
        let (runner, container) = fixture();
        runner
            .run(&container, &argv(&["app", "db:seed", "users", "10"]))
            .unwrap();
        let seed = container.get_as::<Seed>("Seed").unwrap();
        assert_eq!(*seed.seen.lock().unwrap(), vec!["users", "10"]);
    }

    #[test]
    fn missing_command_argument_is_reported() {
        let (runner, container) = fixture();
        let err = runner.run(&container, &argv(&["app"])).unwrap_err();
        assert!(matches!(err, CliError::MissingCommand));
    }

    #[test]
    fn unknown_command_id_is_reported() {
        let (runner, container) = fixture();
        let err = runner
            .run(&container, &argv(&["app", "db:wipe"]))
            .unwrap_err();
        assert!(matches!(err, CliError::UnknownCommand(id) if id == "db:wipe"));
    }

    #[test]
    fn command_failures_carry_the_command_name() {
        let (runner, container) = fixture();
        let err = runner
            .run(&container, &argv(&["app", "db:seed", "--fail"]))
            .unwrap_err();
        match err {
            CliError::Failed { name, source } => {
                assert_eq!(name, "db:seed");
                assert_eq!(source.to_string(), "seed data rejected");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
