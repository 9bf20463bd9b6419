//! Variable binding — the per-event values a plan is rendered against.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RenderError;

/// Name → value mapping supplied per render call.
///
/// Owned by the caller and only read during rendering. [`Vars::get`] and
/// friends are for host code that reads the binding directly; they fail with
/// [`RenderError::UndefinedVariable`] or [`RenderError::TypeMismatch`] instead
/// of returning a silent default. Rendering never goes through them: an
/// undefined reference inside a template surfaces as [`RenderError::Field`]
/// naming the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vars(BTreeMap<String, Value>);

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any value that serializes to a mapping.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, RenderError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(RenderError::TypeMismatch {
                name: "<root>".to_string(),
                expected: "mapping",
                found: kind(&other),
            }),
        }
    }

    /// Bind `name`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder form of [`Vars::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Value, RenderError> {
        self.0.get(name).ok_or_else(|| RenderError::UndefinedVariable {
            name: name.to_string(),
        })
    }

    pub fn get_str(&self, name: &str) -> Result<&str, RenderError> {
        let value = self.get(name)?;
        value.as_str().ok_or_else(|| RenderError::TypeMismatch {
            name: name.to_string(),
            expected: "string",
            found: kind(value),
        })
    }

    /// Typed lookup through serde, e.g. `vars.get_as::<u32>("replicas")`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, RenderError> {
        let value = self.get(name)?;
        serde_json::from_value(value.clone()).map_err(|_| RenderError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
            found: kind(value),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(&self.0).map_err(RenderError::from)
    }
}

impl From<serde_json::Map<String, Value>> for Vars {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Vars {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
