//! Request dispatch.
//!
//! The [`Dispatcher`] drives one request end to end: route match, controller
//! resolution, verb lookup, body binding, pre-hooks, handler invocation and
//! response marshaling. It is deliberately synchronous; one request maps to
//! one container and one response write.
//!
//! Failures split two ways. Request-scoped failures ([`HttpError`]: no route,
//! no verb handler, malformed client input) are rendered as a minimal
//! `text/plain` response and never leave this module. Everything else (a
//! broken service graph, a missing required body field, a handler's own
//! error) propagates as [`FennecError`] for the embedding application to
//! turn into its 500 of choice. The distinction is structural: a
//! [`BindError::TypeMismatch`] or [`BindError::UnknownArgument`] is the
//! client's fault (400), a [`BindError::MissingArgument`] is not.

use crate::binder::Binder;
use crate::di::{Container, Plans};
use crate::http::body::request_body;
use fennec_core::{
    ActionContext, Args, BindError, BoundBody, FennecError, HandlerArg, HandlerError, HandlerSpec,
    HttpError, HttpRequest, HttpResponse, ParamGoal, Payload, Reply,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

enum Failure {
    Http(HttpError),
    Internal(FennecError),
}

impl From<HttpError> for Failure {
    fn from(err: HttpError) -> Self {
        Failure::Http(err)
    }
}

fn classify(err: BindError) -> Failure {
    match err {
        err @ (BindError::TypeMismatch { .. } | BindError::UnknownArgument(_)) => {
            Failure::Http(HttpError::BadRequest(err.to_string()))
        }
        other => Failure::Internal(FennecError::Bind(other)),
    }
}

/// Dispatches HTTP requests against built plans.
pub struct Dispatcher {
    plans: Arc<Plans>,
    binder: Arc<Binder>,
}

impl Dispatcher {
    /// Create a dispatcher over built plans and registered data types.
    pub fn new(plans: Arc<Plans>, binder: Arc<Binder>) -> Self {
        Self { plans, binder }
    }

    /// Handle one request through the given per-request container.
    ///
    /// `Ok` covers every request-scoped outcome, client errors included;
    /// `Err` means the application itself is broken mid-request.
    pub fn dispatch(
        &self,
        container: &Container,
        request: &HttpRequest,
    ) -> Result<HttpResponse, FennecError> {
        match self.run(container, request) {
            Ok(reply) => marshal(reply),
            Err(Failure::Http(err)) => {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    status = err.status(),
                    "request rejected"
                );
                Ok(render_error(&err))
            }
            Err(Failure::Internal(err)) => Err(err),
        }
    }

    fn run(&self, container: &Container, request: &HttpRequest) -> Result<Reply, Failure> {
        let matched = self.plans.routes().match_path(&request.path)?;
        let verb = request.method.to_lowercase();
        let handler = matched
            .entry
            .handlers
            .get(&verb)
            .ok_or(HttpError::MethodNotAllowed)?;

        let body = self.bind_body(request, &verb, handler)?;
        self.run_before_actions(container, &matched.entry.service_id, &verb, body.as_ref())?;

        let args = assemble_args(handler, &matched.captures, body);
        let instance = container
            .get(&matched.entry.service_id)
            .map_err(|err| Failure::Internal(FennecError::Resolve(err)))?;

        tracing::debug!(
            controller = %matched.entry.service_id,
            %verb,
            "invoking handler"
        );
        (handler.invoke)(instance, args).map_err(|err| match err {
            HandlerError::Http(http) => Failure::Http(http),
            HandlerError::Argument(bind) => classify(bind),
            HandlerError::Other(other) => Failure::Internal(FennecError::Custom(other)),
        })
    }

    /// Bind the request body when the handler implies a body parameter.
    ///
    /// GET requests never carry a bound body, whatever the handler declares.
    fn bind_body(
        &self,
        request: &HttpRequest,
        verb: &str,
        handler: &HandlerSpec,
    ) -> Result<Option<BoundBody>, Failure> {
        if verb == "get" {
            return Ok(None);
        }
        let goal = handler
            .params
            .iter()
            .find_map(|param| match &param.goal {
                ParamGoal::Text => None,
                other => Some(other),
            });
        let Some(goal) = goal else {
            return Ok(None);
        };

        let payload = request_body(request).unwrap_or(Value::Null);
        match goal {
            ParamGoal::Untyped => Ok(Some(BoundBody::Untyped(payload))),
            ParamGoal::Data(type_key) => {
                let value = self
                    .binder
                    .bind(type_key, &payload)
                    .map_err(classify)?;
                Ok(Some(BoundBody::Data {
                    type_key: type_key.clone(),
                    value,
                }))
            }
            ParamGoal::Text => Ok(None),
        }
    }

    /// Run configured pre-hooks in order; the first failure wins.
    fn run_before_actions(
        &self,
        container: &Container,
        controller: &str,
        verb: &str,
        body: Option<&BoundBody>,
    ) -> Result<(), Failure> {
        for hook_id in container.config().before_actions() {
            let plan_id = self.plans.alias(hook_id).unwrap_or(hook_id);
            let cast = self
                .plans
                .plan(plan_id)
                .and_then(|plan| plan.before_action.clone())
                .ok_or_else(|| {
                    Failure::Internal(FennecError::Custom(
                        format!("configured pre-hook '{hook_id}' is not a before-action").into(),
                    ))
                })?;
            let instance = container
                .get(hook_id)
                .map_err(|err| Failure::Internal(FennecError::Resolve(err)))?;
            let hook = cast(instance).ok_or_else(|| {
                Failure::Internal(FennecError::Custom(
                    format!("pre-hook '{hook_id}' resolved to an unexpected type").into(),
                ))
            })?;

            hook.before(ActionContext {
                controller,
                method: verb,
                body,
            })?;
        }
        Ok(())
    }
}

/// Fill the handler's declared parameters positionally.
///
/// Path captures bind by name; the bound body fills the first non-text slot.
fn assemble_args(
    handler: &HandlerSpec,
    captures: &IndexMap<String, String>,
    body: Option<BoundBody>,
) -> Args {
    let mut body = body;
    let mut values = Vec::with_capacity(handler.params.len());
    for param in &handler.params {
        match &param.goal {
            ParamGoal::Text => {
                if let Some(capture) = captures.get(&param.name) {
                    values.push((param.name.clone(), HandlerArg::Text(capture.clone())));
                }
            }
            ParamGoal::Untyped | ParamGoal::Data(_) => {
                if let Some(bound) = body.take() {
                    values.push((param.name.clone(), HandlerArg::Body(bound)));
                }
            }
        }
    }
    Args::new(values)
}

fn marshal(reply: Reply) -> Result<HttpResponse, FennecError> {
    match reply {
        Reply::Plain(text) => Ok(HttpResponse::text(200, text)),
        Reply::Envelope(response) => match response.payload {
            Payload::Text(text) => Ok(HttpResponse::text(response.status, text)),
            Payload::Json(value) => {
                let body = serde_json::to_string(&value)
                    .map_err(|err| FennecError::Custom(Box::new(err)))?;
                Ok(HttpResponse::json(response.status, body))
            }
        },
    }
}

fn render_error(err: &HttpError) -> HttpResponse {
    let status = err.status();
    let body = match err.message() {
        Some(message) => format!("Error {status}: {message}"),
        None => format!("Error {status}"),
    };
    HttpResponse::text(status, body)
}
