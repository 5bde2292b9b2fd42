//! Dependency injection: plan building and runtime resolution.

pub mod container;
pub mod factory;

pub use container::{Container, ContainerHandle};
pub use factory::{CommandBinding, FactoryBuilder, FactoryPlan, Plans, Requirement};
