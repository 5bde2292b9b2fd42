//! Testing utilities for Fennec.
//!
//! This module provides utilities to make testing controllers, pre-hooks,
//! and commands easier.
//!
//! # Features
//!
//! - [`RecordingAction`]: A pre-hook that records every invocation it sees
//! - [`DenyingAction`]: A pre-hook that rejects every request with a fixed error
//! - [`RecordingCommand`]: A command that records the arguments it was run with

use fennec_core::{ActionContext, BeforeAction, BoxError, Command, HttpError};
use std::sync::Mutex;

// ============================================================================
// Recording Action
// ============================================================================

/// One observed pre-hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedCall {
    /// The controller service id the request matched.
    pub controller: String,
    /// The lowercased verb the handler was selected by.
    pub method: String,
    /// Whether a bound body was present.
    pub had_body: bool,
}

/// A pre-hook that records every invocation and lets all of them through.
///
/// Useful for verifying hook ordering and the context hooks receive.
#[derive(Default)]
pub struct RecordingAction {
    calls: Mutex<Vec<ObservedCall>>,
}

impl RecordingAction {
    /// Create a recorder with no observed calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation observed so far, in order.
    pub fn calls(&self) -> Vec<ObservedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// The number of invocations observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

impl BeforeAction for RecordingAction {
    fn before(&self, ctx: ActionContext<'_>) -> Result<(), HttpError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ObservedCall {
                controller: ctx.controller.to_string(),
                method: ctx.method.to_string(),
                had_body: ctx.body.is_some(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Denying Action
// ============================================================================

/// A pre-hook that rejects every request with a fixed message.
pub struct DenyingAction {
    message: String,
}

impl DenyingAction {
    /// Create a hook that rejects with the given `BadRequest` message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl BeforeAction for DenyingAction {
    fn before(&self, _ctx: ActionContext<'_>) -> Result<(), HttpError> {
        Err(HttpError::BadRequest(self.message.clone()))
    }
}

// ============================================================================
// Recording Command
// ============================================================================

/// A command that records the positional arguments of every run.
#[derive(Default)]
pub struct RecordingCommand {
    runs: Mutex<Vec<Vec<String>>>,
}

impl RecordingCommand {
    /// Create a command with no recorded runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// The arguments of every run so far, in order.
    pub fn runs(&self) -> Vec<Vec<String>> {
        self.runs.lock().map(|runs| runs.clone()).unwrap_or_default()
    }
}

impl Command for RecordingCommand {
    fn run(&self, args: &[String]) -> Result<(), BoxError> {
        self.runs
            .lock()
            .map_err(|_| -> BoxError { "recording state poisoned".into() })?
            .push(args.to_vec());
        Ok(())
    }
}
