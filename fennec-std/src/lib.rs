//! # fennec-std
//!
//! Standard implementations for the Fennec application core.
//!
//! This crate provides:
//! - **Plan building**: [`di::FactoryBuilder`] turns service descriptors into
//!   immutable factory plans
//! - **Resolution**: [`di::Container`], the per-request service container
//! - **HTTP dispatch**: [`http::Dispatcher`], route matching and body binding
//! - **Typed binding**: [`binder::Binder`] for recursive body-to-object binding
//! - **CLI dispatch**: [`cli::CommandRunner`]
//! - **Secrets**: [`secret::SecretBox`], authenticated string sealing

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use fennec_core;

// Modules
pub mod binder;
pub mod cli;
pub mod di;
pub mod http;
pub mod secret;
pub mod testing;
