use kube::core::ObjectMeta;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

/// Kind of the Example resource
pub const KIND: &str = "Example";

/// apiVersion of the v1 schema
pub const V1_API_VERSION: &str = "conversion.example.com/v1";

/// apiVersion of the v2 schema
pub const V2_API_VERSION: &str = "conversion.example.com/v2";

/// Value given to `spec.field2` when an object is raised from v1 to v2
pub const DEFAULT_FIELD2: &str = "default-v2-value";

/// Status payload, carried through conversion without being interpreted
pub type RawStatus = Box<RawValue>;

/// Deserialize a field, treating an explicit `null` like a missing key
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Example resource at `conversion.example.com/v1`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExampleV1 {
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,

    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: ExampleV1Spec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RawStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExampleV1Spec {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub field1: String,
}

/// Example resource at `conversion.example.com/v2`
///
/// Adds `spec.field2`, which has no v1 counterpart.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExampleV2 {
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,

    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: ExampleV2Spec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RawStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExampleV2Spec {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub field1: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub field2: String,
}

impl ExampleV1 {
    /// Build a v1 object with its type metadata filled in
    pub fn new(metadata: ObjectMeta, spec: ExampleV1Spec, status: Option<RawStatus>) -> Self {
        Self {
            api_version: V1_API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata,
            spec,
            status,
        }
    }
}

impl ExampleV2 {
    /// Build a v2 object with its type metadata filled in
    pub fn new(metadata: ObjectMeta, spec: ExampleV2Spec, status: Option<RawStatus>) -> Self {
        Self {
            api_version: V2_API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata,
            spec,
            status,
        }
    }
}

/// An Example object at one of the known schema versions
#[derive(Clone, Debug)]
pub enum VersionedExample {
    V1(ExampleV1),
    V2(ExampleV2),
}

impl VersionedExample {
    pub fn api_version(&self) -> &str {
        match self {
            VersionedExample::V1(obj) => &obj.api_version,
            VersionedExample::V2(obj) => &obj.api_version,
        }
    }

    /// Serialize into a raw JSON payload for a ConversionReview response
    pub fn to_raw(&self) -> Result<Box<RawValue>, serde_json::Error> {
        match self {
            VersionedExample::V1(obj) => serde_json::value::to_raw_value(obj),
            VersionedExample::V2(obj) => serde_json::value::to_raw_value(obj),
        }
    }
}

impl From<ExampleV1> for VersionedExample {
    fn from(obj: ExampleV1) -> Self {
        VersionedExample::V1(obj)
    }
}

impl From<ExampleV2> for VersionedExample {
    fn from(obj: ExampleV2) -> Self {
        VersionedExample::V2(obj)
    }
}

#[cfg(test)]
#[path = "example_test.rs"]
mod tests;
