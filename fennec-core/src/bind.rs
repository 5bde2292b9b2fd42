//! Descriptor model for typed body binding.
//!
//! Data-object types are described once, at registration time, by a
//! [`DataDescriptor`]: the ordered required constructor fields, a positional
//! construct function, and the optional setter-bound fields. The binder in
//! `fennec-std` walks these descriptors recursively; nothing here inspects
//! live types.
//!
//! Required fields come from the constructor and are matched
//! case-insensitively against body keys; every remaining body key must match
//! a registered setter or binding fails with
//! [`BindError::UnknownArgument`](crate::error::BindError::UnknownArgument).

use crate::error::BindError;
use indexmap::IndexMap;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// A constructed, type-erased data object.
pub type BoxedData = Box<dyn Any + Send>;

/// The bound request body handed to a handler or pre-hook.
pub enum BoundBody {
    /// The raw untyped body, for handlers that declare an untyped parameter.
    Untyped(Value),
    /// A fully bound instance of a registered data type.
    Data {
        /// The data descriptor key the body was bound against.
        type_key: String,
        /// The bound instance.
        value: BoxedData,
    },
}

impl BoundBody {
    /// The descriptor key for typed bodies.
    pub fn type_key(&self) -> Option<&str> {
        match self {
            BoundBody::Untyped(_) => None,
            BoundBody::Data { type_key, .. } => Some(type_key),
        }
    }
}

/// The declared shape of a bindable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// A primitive value taken raw from the body.
    Scalar,
    /// A nested data object, bound recursively via the named descriptor.
    Nested(String),
    /// A list of primitive values.
    ScalarList,
    /// A list of nested data objects, each bound via the named descriptor.
    NestedList(String),
}

/// One required constructor field of a bindable type.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// The field name, matched case-insensitively against body keys.
    pub name: String,
    /// The declared shape.
    pub shape: FieldShape,
}

/// A value resolved for one field during binding.
pub enum BoundValue {
    /// A raw body value, passed through untouched.
    Raw(Value),
    /// A recursively bound nested object.
    Object(BoxedData),
    /// A recursively bound list of nested objects, in input order.
    ObjectList(Vec<BoxedData>),
    /// The body had no value under this field's name.
    Absent,
}

/// Type text for a raw JSON value, used in mismatch errors.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl BoundValue {
    /// Whether the body carried no value for this field.
    pub fn is_absent(&self) -> bool {
        matches!(self, BoundValue::Absent)
    }

    fn mismatch(parameter: &str, expected: &str, given: &str) -> BindError {
        BindError::TypeMismatch {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            given: given.to_string(),
        }
    }

    fn given_text(&self) -> &'static str {
        match self {
            BoundValue::Raw(value) => value_type_name(value),
            BoundValue::Object(_) => "object",
            BoundValue::ObjectList(_) => "array",
            BoundValue::Absent => "nothing",
        }
    }

    /// Coerce to a string, failing structurally on absence or mismatch.
    pub fn into_string(self, parameter: &str) -> Result<String, BindError> {
        match self {
            BoundValue::Raw(Value::String(text)) => Ok(text),
            BoundValue::Absent => Err(BindError::MissingArgument {
                parameter: parameter.to_string(),
            }),
            other => Err(Self::mismatch(parameter, "string", other.given_text())),
        }
    }

    /// Coerce to an optional string; absence yields `None`.
    pub fn into_opt_string(self, parameter: &str) -> Result<Option<String>, BindError> {
        match self {
            BoundValue::Absent | BoundValue::Raw(Value::Null) => Ok(None),
            other => other.into_string(parameter).map(Some),
        }
    }

    /// Coerce to a signed integer.
    pub fn into_i64(self, parameter: &str) -> Result<i64, BindError> {
        match self {
            BoundValue::Raw(Value::Number(number)) => number
                .as_i64()
                .ok_or_else(|| Self::mismatch(parameter, "integer", "number")),
            BoundValue::Absent => Err(BindError::MissingArgument {
                parameter: parameter.to_string(),
            }),
            other => Err(Self::mismatch(parameter, "integer", other.given_text())),
        }
    }

    /// Coerce to a boolean.
    pub fn into_bool(self, parameter: &str) -> Result<bool, BindError> {
        match self {
            BoundValue::Raw(Value::Bool(flag)) => Ok(flag),
            BoundValue::Absent => Err(BindError::MissingArgument {
                parameter: parameter.to_string(),
            }),
            other => Err(Self::mismatch(parameter, "boolean", other.given_text())),
        }
    }

    /// Coerce to a list of strings.
    pub fn into_string_list(self, parameter: &str) -> Result<Vec<String>, BindError> {
        match self {
            BoundValue::Raw(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => Ok(text),
                    other => Err(Self::mismatch(parameter, "string", value_type_name(&other))),
                })
                .collect(),
            BoundValue::Absent => Err(BindError::MissingArgument {
                parameter: parameter.to_string(),
            }),
            other => Err(Self::mismatch(parameter, "array", other.given_text())),
        }
    }

    /// Take the raw value without coercion; absence yields `Value::Null`.
    pub fn into_raw(self, parameter: &str) -> Result<Value, BindError> {
        match self {
            BoundValue::Raw(value) => Ok(value),
            BoundValue::Absent => Ok(Value::Null),
            other => Err(Self::mismatch(parameter, "value", other.given_text())),
        }
    }

    /// Take a recursively bound nested object of the concrete type `T`.
    pub fn into_object<T: Send + 'static>(self, parameter: &str) -> Result<T, BindError> {
        match self {
            BoundValue::Object(boxed) => boxed.downcast::<T>().map(|inner| *inner).map_err(|_| {
                Self::mismatch(parameter, std::any::type_name::<T>(), "foreign instance")
            }),
            BoundValue::Absent => Err(BindError::MissingArgument {
                parameter: parameter.to_string(),
            }),
            other => Err(Self::mismatch(
                parameter,
                std::any::type_name::<T>(),
                other.given_text(),
            )),
        }
    }

    /// Take an optional nested object; absence and explicit null yield `None`.
    pub fn into_opt_object<T: Send + 'static>(
        self,
        parameter: &str,
    ) -> Result<Option<T>, BindError> {
        match self {
            BoundValue::Absent | BoundValue::Raw(Value::Null) => Ok(None),
            other => other.into_object::<T>(parameter).map(Some),
        }
    }

    /// Take a recursively bound list of nested objects, preserving order.
    pub fn into_object_list<T: Send + 'static>(
        self,
        parameter: &str,
    ) -> Result<Vec<T>, BindError> {
        match self {
            BoundValue::ObjectList(items) => items
                .into_iter()
                .map(|boxed| {
                    boxed.downcast::<T>().map(|inner| *inner).map_err(|_| {
                        Self::mismatch(parameter, std::any::type_name::<T>(), "foreign instance")
                    })
                })
                .collect(),
            BoundValue::Absent => Err(BindError::MissingArgument {
                parameter: parameter.to_string(),
            }),
            other => Err(Self::mismatch(parameter, "array", other.given_text())),
        }
    }
}

/// Positional access to the resolved required fields of one construct call.
pub struct FieldValues {
    values: IndexMap<String, BoundValue>,
}

impl FieldValues {
    /// Build from resolved (name, value) pairs in declaration order.
    pub fn new(values: IndexMap<String, BoundValue>) -> Self {
        Self { values }
    }

    /// Take a field by name; unknown or already-taken fields are absent.
    pub fn take(&mut self, name: &str) -> BoundValue {
        self.values.swap_remove(name).unwrap_or(BoundValue::Absent)
    }

    /// Take a required string field.
    pub fn take_string(&mut self, name: &str) -> Result<String, BindError> {
        self.take(name).into_string(name)
    }

    /// Take an optional string field.
    pub fn take_opt_string(&mut self, name: &str) -> Result<Option<String>, BindError> {
        self.take(name).into_opt_string(name)
    }

    /// Take a required integer field.
    pub fn take_i64(&mut self, name: &str) -> Result<i64, BindError> {
        self.take(name).into_i64(name)
    }

    /// Take a required boolean field.
    pub fn take_bool(&mut self, name: &str) -> Result<bool, BindError> {
        self.take(name).into_bool(name)
    }

    /// Take a required nested object field.
    pub fn take_object<T: Send + 'static>(&mut self, name: &str) -> Result<T, BindError> {
        self.take(name).into_object::<T>(name)
    }

    /// Take an optional nested object field.
    pub fn take_opt_object<T: Send + 'static>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, BindError> {
        self.take(name).into_opt_object::<T>(name)
    }

    /// Take a required list of nested objects.
    pub fn take_object_list<T: Send + 'static>(&mut self, name: &str) -> Result<Vec<T>, BindError> {
        self.take(name).into_object_list::<T>(name)
    }
}

/// The function that builds a data object from its resolved required fields.
pub type ConstructDataFn =
    Arc<dyn Fn(&mut FieldValues) -> Result<BoxedData, BindError> + Send + Sync>;

/// A type-erased setter application.
pub type ApplyFn =
    Arc<dyn Fn(&mut (dyn Any + Send), BoundValue) -> Result<(), BindError> + Send + Sync>;

/// One optional setter-bound field of a bindable type.
#[derive(Clone)]
pub struct SetterSpec {
    /// The field key, matched case-insensitively against body keys.
    pub key: String,
    /// The declared shape.
    pub shape: FieldShape,
    /// Applies the resolved value to a constructed instance.
    pub apply: ApplyFn,
}

/// The binding descriptor for one data-object type.
///
/// Built once at registration; the binder only ever reads it.
#[derive(Clone)]
pub struct DataDescriptor {
    key: String,
    required: Vec<FieldSpec>,
    setters: Vec<SetterSpec>,
    construct: Option<ConstructDataFn>,
}

impl DataDescriptor {
    /// Start a descriptor for the type registered under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            required: Vec::new(),
            setters: Vec::new(),
            construct: None,
        }
    }

    /// Declare a required constructor field. Order of calls is the
    /// constructor's positional order.
    pub fn required(mut self, name: impl Into<String>, shape: FieldShape) -> Self {
        self.required.push(FieldSpec {
            name: name.into(),
            shape,
        });
        self
    }

    /// Set the positional construct function.
    pub fn construct<T, F>(mut self, construct: F) -> Self
    where
        T: Send + 'static,
        F: Fn(&mut FieldValues) -> Result<T, BindError> + Send + Sync + 'static,
    {
        self.construct = Some(Arc::new(move |fields| {
            construct(fields).map(|value| Box::new(value) as BoxedData)
        }));
        self
    }

    /// Declare an optional setter-bound field on the concrete type `T`.
    pub fn setter<T, F>(mut self, key: impl Into<String>, shape: FieldShape, apply: F) -> Self
    where
        T: Send + 'static,
        F: Fn(&mut T, BoundValue) -> Result<(), BindError> + Send + Sync + 'static,
    {
        let key = key.into();
        let field = key.clone();
        self.setters.push(SetterSpec {
            key,
            shape,
            apply: Arc::new(move |instance, value| {
                let typed =
                    instance
                        .downcast_mut::<T>()
                        .ok_or_else(|| BindError::TypeMismatch {
                            parameter: field.clone(),
                            expected: std::any::type_name::<T>().to_string(),
                            given: "foreign instance".to_string(),
                        })?;
                apply(typed, value)
            }),
        });
        self
    }

    /// The registration key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The ordered required fields.
    pub fn required_fields(&self) -> &[FieldSpec] {
        &self.required
    }

    /// The registered setters.
    pub fn setters(&self) -> &[SetterSpec] {
        &self.setters
    }

    /// The construct function; descriptors without one build no instances.
    pub fn construct_fn(&self) -> Option<&ConstructDataFn> {
        self.construct.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundValue, FieldValues};
    use crate::error::BindError;
    use indexmap::IndexMap;
    use serde_json::json;

    #[test]
    fn absent_required_field_is_structurally_missing() {
        let mut fields = FieldValues::new(IndexMap::new());
        let err = fields.take_string("name").unwrap_err();
        assert!(matches!(err, BindError::MissingArgument { parameter } if parameter == "name"));
    }

    #[test]
    fn wrong_raw_type_is_structurally_a_mismatch() {
        let err = BoundValue::Raw(json!(7)).into_string("name").unwrap_err();
        match err {
            BindError::TypeMismatch {
                parameter,
                expected,
                given,
            } => {
                assert_eq!(parameter, "name");
                assert_eq!(expected, "string");
                assert_eq!(given, "number");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn optional_takes_accept_absence() {
        let mut fields = FieldValues::new(IndexMap::new());
        assert_eq!(fields.take_opt_string("nick").unwrap(), None);
    }
}
