//! Recursive typed body binding.
//!
//! A [`Binder`] holds the registered [`DataDescriptor`]s and turns a parsed
//! request body into a constructed data object:
//!
//! 1. Required constructor fields are resolved in declared order, matching
//!    body keys case-insensitively, then handed positionally to the
//!    descriptor's construct function.
//! 2. Every leftover body key must match a registered setter
//!    (case-insensitively again); anything else fails with
//!    [`BindError::UnknownArgument`].
//!
//! Fields declared [`FieldShape::Nested`] or [`FieldShape::NestedList`]
//! recurse into the named descriptor; recursion depth is capped at
//! [`DEFAULT_MAX_DEPTH`] so a self-referential payload fails with
//! [`BindError::DepthExceeded`] instead of blowing the stack.

use fennec_core::{
    BindError, BoundValue, BoxedData, BuildError, DataDescriptor, FieldShape, FieldValues,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// The default recursion cap for nested binding.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Collects data descriptors and produces an immutable [`Binder`].
pub struct BinderBuilder {
    types: IndexMap<String, DataDescriptor>,
    max_depth: usize,
}

impl BinderBuilder {
    /// Start an empty builder with the default depth cap.
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Register a data descriptor under its own key.
    pub fn register(&mut self, descriptor: DataDescriptor) -> Result<&mut Self, BuildError> {
        let key = descriptor.key().to_string();
        if self.types.contains_key(&key) {
            return Err(BuildError::DuplicateDataType(key));
        }
        self.types.insert(key, descriptor);
        Ok(self)
    }

    /// Override the recursion cap.
    pub fn max_depth(&mut self, limit: usize) -> &mut Self {
        self.max_depth = limit;
        self
    }

    /// Finish building.
    pub fn build(self) -> Binder {
        Binder {
            types: self.types,
            max_depth: self.max_depth,
        }
    }
}

impl Default for BinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BinderBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinderBuilder")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Binds parsed request bodies to registered data types.
pub struct Binder {
    types: IndexMap<String, DataDescriptor>,
    max_depth: usize,
}

impl Binder {
    /// Whether a descriptor is registered under the key.
    pub fn knows(&self, type_key: &str) -> bool {
        self.types.contains_key(type_key)
    }

    /// Bind a body to the type registered under `type_key`.
    pub fn bind(&self, type_key: &str, body: &Value) -> Result<BoxedData, BindError> {
        self.bind_at(type_key, body, 0)
    }

    fn bind_at(&self, type_key: &str, body: &Value, depth: usize) -> Result<BoxedData, BindError> {
        if depth >= self.max_depth {
            return Err(BindError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        let descriptor = self
            .types
            .get(type_key)
            .ok_or_else(|| BindError::UnknownType(type_key.to_string()))?;

        // A non-object body binds like an empty one: required fields come up
        // absent and the construct function decides which of them that kills.
        let empty = Map::new();
        let entries = body.as_object().unwrap_or(&empty);

        let mut required = IndexMap::new();
        for field in descriptor.required_fields() {
            let value = match lookup(entries, &field.name) {
                Some(raw) => self.resolve(&field.name, &field.shape, raw, depth)?,
                None => BoundValue::Absent,
            };
            required.insert(field.name.clone(), value);
        }

        let construct = descriptor
            .construct_fn()
            .ok_or_else(|| BindError::UnknownType(type_key.to_string()))?;
        let mut fields = FieldValues::new(required);
        let mut instance = construct(&mut fields)?;

        for (key, raw) in entries {
            if consumed_by_required(descriptor, key) {
                continue;
            }
            let setter = descriptor
                .setters()
                .iter()
                .find(|setter| setter.key.eq_ignore_ascii_case(key))
                .ok_or_else(|| BindError::UnknownArgument(key.clone()))?;
            let value = self.resolve(&setter.key, &setter.shape, raw, depth)?;
            (setter.apply)(instance.as_mut(), value)?;
        }

        Ok(instance)
    }

    fn resolve(
        &self,
        name: &str,
        shape: &FieldShape,
        raw: &Value,
        depth: usize,
    ) -> Result<BoundValue, BindError> {
        match shape {
            FieldShape::Scalar | FieldShape::ScalarList => Ok(BoundValue::Raw(raw.clone())),
            FieldShape::Nested(nested_key) => match raw {
                // An empty object carries nothing bindable; treat it as raw so
                // optional takes can map it to absence.
                Value::Object(map) if !map.is_empty() => Ok(BoundValue::Object(
                    self.bind_at(nested_key, raw, depth + 1)?,
                )),
                _ => Ok(BoundValue::Raw(raw.clone())),
            },
            FieldShape::NestedList(nested_key) => match raw {
                Value::Array(items) => {
                    let mut bound = Vec::with_capacity(items.len());
                    for item in items {
                        bound.push(self.bind_at(nested_key, item, depth + 1)?);
                    }
                    Ok(BoundValue::ObjectList(bound))
                }
                _ => Err(BindError::TypeMismatch {
                    parameter: name.to_string(),
                    expected: "array".to_string(),
                    given: fennec_core::value_type_name(raw).to_string(),
                }),
            },
        }
    }
}

fn lookup<'a>(entries: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn consumed_by_required(descriptor: &DataDescriptor, key: &str) -> bool {
    descriptor
        .required_fields()
        .iter()
        .any(|field| field.name.eq_ignore_ascii_case(key))
}
