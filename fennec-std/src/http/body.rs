//! Request body extraction.
//!
//! Handlers never see the transport encoding: the dispatcher calls
//! [`request_body`] to turn whatever the request carried into a single JSON
//! value before binding. Form fields win over a raw body when both are
//! present, matching how HTML form submissions arrive.

use crate::http::router::url_decode;
use fennec_core::HttpRequest;
use serde_json::{Map, Value};

/// Extract the request payload as a JSON value.
///
/// Precedence:
/// 1. Form fields, when any were submitted, become a string-valued object.
/// 2. Otherwise the raw body is parsed as JSON.
/// 3. A raw body that is not valid JSON counts as no payload at all.
/// 4. No form and no body yields `None`.
pub fn request_body(request: &HttpRequest) -> Option<Value> {
    if !request.form.is_empty() {
        let mut fields = Map::new();
        for (key, value) in &request.form {
            fields.insert(url_decode(key), Value::String(url_decode(value)));
        }
        return Some(Value::Object(fields));
    }
    let raw = request.body.as_deref()?;
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}
