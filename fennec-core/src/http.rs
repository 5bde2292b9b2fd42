//! HTTP boundary types.
//!
//! The core never touches sockets: a request arrives as an [`HttpRequest`]
//! value and leaves as a single [`HttpResponse`] write. Handlers return a
//! [`Reply`]: either a bare value (emitted as `text/plain`) or a [`Response`]
//! envelope whose status code is honored and whose structured payload is
//! JSON-serialized.

use crate::bind::BoundBody;
use crate::error::BindError;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

/// An incoming HTTP request, as handed over by the outer server boundary.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// The HTTP verb, as received (any casing).
    pub method: String,
    /// The request path, query string still attached.
    pub path: String,
    /// Decoded form fields, in submission order. Non-empty form fields take
    /// precedence over the raw body.
    pub form: Vec<(String, String)>,
    /// The raw request body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request with the given verb and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            form: Vec::new(),
            body: None,
        }
    }

    /// Append a decoded form field.
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Attach a raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// The single synchronous response write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The numeric status code.
    pub status: u16,
    /// The content type of the body.
    pub content_type: &'static str,
    /// The response body.
    pub body: String,
}

impl HttpResponse {
    /// A `text/plain` response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }

    /// An `application/json` response.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }
}

/// The body of a [`Response`] envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Literal text, emitted as `text/plain`.
    Text(String),
    /// A structured value, JSON-serialized as `application/json`.
    Json(Value),
}

/// A typed response envelope returned by a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The status code to write.
    pub status: u16,
    /// The envelope body.
    pub payload: Payload,
}

impl Response {
    /// An envelope with a literal text payload.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            payload: Payload::Text(body.into()),
        }
    }

    /// An envelope with an already-structured payload.
    pub fn json_value(status: u16, value: Value) -> Self {
        Self {
            status,
            payload: Payload::Json(value),
        }
    }

    /// An envelope with a serializable payload.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::json_value(status, serde_json::to_value(value)?))
    }
}

/// What a handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A bare return value, echoed as `text/plain` with status 200.
    Plain(String),
    /// A typed response envelope.
    Envelope(Response),
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Reply::Plain(value)
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Reply::Plain(value.to_string())
    }
}

impl From<Response> for Reply {
    fn from(value: Response) -> Self {
        Reply::Envelope(value)
    }
}

/// One positional handler argument.
pub enum HandlerArg {
    /// A path capture, URL-decoded.
    Text(String),
    /// The bound request body.
    Body(BoundBody),
}

/// The ordered arguments of one handler invocation.
///
/// The dispatcher fills this positionally: path captures in route order, then
/// the bound body at its declared slot. Handler glue consumes arguments by
/// name; every coercion failure is structural
/// ([`BindError::TypeMismatch`] vs [`BindError::MissingArgument`]).
pub struct Args {
    values: Vec<(String, HandlerArg)>,
}

impl Args {
    /// Build from ordered (name, argument) pairs.
    pub fn new(values: Vec<(String, HandlerArg)>) -> Self {
        Self { values }
    }

    fn take(&mut self, name: &str) -> Option<HandlerArg> {
        let index = self.values.iter().position(|(entry, _)| entry == name)?;
        Some(self.values.remove(index).1)
    }

    fn missing(name: &str) -> BindError {
        BindError::MissingArgument {
            parameter: name.to_string(),
        }
    }

    /// Take a path capture as text.
    pub fn take_text(&mut self, name: &str) -> Result<String, BindError> {
        match self.take(name) {
            Some(HandlerArg::Text(text)) => Ok(text),
            Some(HandlerArg::Body(_)) => Err(BindError::TypeMismatch {
                parameter: name.to_string(),
                expected: "string".to_string(),
                given: "body".to_string(),
            }),
            None => Err(Self::missing(name)),
        }
    }

    /// Take a path capture and parse it into `T`.
    ///
    /// A failed parse is a [`BindError::TypeMismatch`] carrying the expected
    /// type text; absence stays a [`BindError::MissingArgument`].
    pub fn take_parsed<T: FromStr>(&mut self, name: &str) -> Result<T, BindError> {
        let text = self.take_text(name)?;
        text.parse::<T>().map_err(|_| BindError::TypeMismatch {
            parameter: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            given: "string".to_string(),
        })
    }

    /// Take the bound body as a typed data object.
    pub fn take_data<T: Send + 'static>(&mut self, name: &str) -> Result<T, BindError> {
        match self.take(name) {
            Some(HandlerArg::Body(BoundBody::Data { value, .. })) => {
                value.downcast::<T>().map(|inner| *inner).map_err(|_| {
                    BindError::TypeMismatch {
                        parameter: name.to_string(),
                        expected: std::any::type_name::<T>().to_string(),
                        given: "foreign instance".to_string(),
                    }
                })
            }
            Some(HandlerArg::Body(BoundBody::Untyped(value))) => Err(BindError::TypeMismatch {
                parameter: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
                given: crate::bind::value_type_name(&value).to_string(),
            }),
            Some(HandlerArg::Text(_)) => Err(BindError::TypeMismatch {
                parameter: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
                given: "string".to_string(),
            }),
            None => Err(Self::missing(name)),
        }
    }

    /// Take the bound body as the raw untyped value.
    pub fn take_untyped(&mut self, name: &str) -> Result<Value, BindError> {
        match self.take(name) {
            Some(HandlerArg::Body(BoundBody::Untyped(value))) => Ok(value),
            Some(_) => Err(BindError::TypeMismatch {
                parameter: name.to_string(),
                expected: "value".to_string(),
                given: "typed body".to_string(),
            }),
            None => Err(Self::missing(name)),
        }
    }

    /// Take an argument that may be absent.
    pub fn take_opt_text(&mut self, name: &str) -> Option<String> {
        match self.take(name) {
            Some(HandlerArg::Text(text)) => Some(text),
            _ => None,
        }
    }
}
