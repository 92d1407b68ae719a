use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A typed domain key for one resource instance, distinct from the raw
/// path segment it was parsed from.
///
/// The resource-type tag is what makes identifiers safe to pass around:
/// an identifier minted for `"room"` can never be bound where a
/// `"shelf"` identifier is expected.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    resource: Arc<str>,
    value: Value,
}

impl Identifier {
    /// Create an identifier for the given resource type.
    ///
    /// Important: This function will panic if serialization of the value
    /// into JSON fails. Use [`Identifier::try_new`] if you want to handle
    /// the error. This is done for convenience as identifier values are
    /// plain keys and serialization errors should be rare.
    pub fn new(resource: impl Into<Arc<str>>, value: impl Serialize) -> Self {
        Self::try_new(resource, value).expect("identifier value should serialize to JSON")
    }

    pub fn try_new(
        resource: impl Into<Arc<str>>,
        value: impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        Ok(Identifier {
            resource: resource.into(),
            value,
        })
    }

    pub(crate) fn from_value(resource: Arc<str>, value: Value) -> Self {
        Identifier { resource, value }
    }

    /// The resource type this identifier belongs to.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Deserialize the identifier value into a concrete key type.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.value.clone())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.value)
    }
}

/// Converts a raw path segment into the identifier value for one
/// resource type. Implemented by the host and registered per resource
/// on the [ActionManager](crate::manager::ActionManager); a `None`
/// return means the segment does not denote an instance of the type.
pub trait IdentifierConverter: Send + Sync + 'static {
    fn convert(&self, segment: &str) -> Option<Value>;
}

impl<F> IdentifierConverter for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
{
    fn convert(&self, segment: &str) -> Option<Value> {
        (self)(segment)
    }
}

/// Converter for identifier types that parse from the segment with
/// `FromStr`, e.g. `parse::<i64>()` for numeric keys.
pub fn parse<T>() -> impl IdentifierConverter
where
    T: FromStr + Serialize + Send + Sync + 'static,
{
    move |segment: &str| {
        segment
            .parse::<T>()
            .ok()
            .and_then(|value| serde_json::to_value(value).ok())
    }
}

/// Per-resource converter registry. Populated during wiring, frozen
/// afterwards.
#[derive(Default)]
pub(crate) struct Converters {
    map: HashMap<Arc<str>, Arc<dyn IdentifierConverter>>,
}

impl Converters {
    pub fn insert(&mut self, resource: Arc<str>, converter: impl IdentifierConverter) {
        self.map.insert(resource, Arc::new(converter));
    }

    pub fn get(&self, resource: &str) -> Option<&Arc<dyn IdentifierConverter>> {
        self.map.get(resource)
    }

    pub fn contains(&self, resource: &str) -> bool {
        self.map.contains_key(resource)
    }
}
