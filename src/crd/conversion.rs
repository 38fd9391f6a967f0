//! Version conversion between v1 and v2 Example objects
//!
//! ## Conversion rules:
//! - v1 -> v2: Keep `field1`, set `field2` to [`DEFAULT_FIELD2`]
//! - v2 -> v1: Keep `field1`, drop `field2` (it does not exist in v1)
//!
//! Metadata and status move across unchanged in both directions.

use super::example::{
    null_as_default, ExampleV1, ExampleV1Spec, ExampleV2, ExampleV2Spec, VersionedExample,
    DEFAULT_FIELD2, V1_API_VERSION, V2_API_VERSION,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to read object type metadata: {0}")]
    TypeMeta(#[source] serde_json::Error),

    #[error("failed to decode {api_version} object: {source}")]
    Decode {
        api_version: String,
        source: serde_json::Error,
    },

    #[error("failed to encode converted object: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Type metadata read ahead of a full decode
///
/// Only `apiVersion` matters for picking a path. A missing or null value
/// reads as empty and the object passes through unchanged.
#[derive(Debug, Deserialize)]
struct ObjectTypes {
    #[serde(rename = "apiVersion", default, deserialize_with = "null_as_default")]
    api_version: String,
}

/// What has to happen to an object to reach the desired version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPath {
    V1ToV2,
    V2ToV1,
    /// Already at the desired version, or a version pair we don't know
    Passthrough,
}

impl ConversionPath {
    pub fn resolve(source: &str, desired: &str) -> Self {
        match (source, desired) {
            (V1_API_VERSION, V2_API_VERSION) => ConversionPath::V1ToV2,
            (V2_API_VERSION, V1_API_VERSION) => ConversionPath::V2ToV1,
            _ => ConversionPath::Passthrough,
        }
    }
}

/// Convert a v1 object to v2
pub fn convert_to_v2(obj: ExampleV1) -> ExampleV2 {
    ExampleV2::new(
        obj.metadata,
        ExampleV2Spec {
            field1: obj.spec.field1,
            field2: DEFAULT_FIELD2.to_string(),
        },
        obj.status,
    )
}

/// Convert a v2 object to v1
///
/// Lossy: `field2` has nowhere to go in v1 and is discarded.
pub fn convert_to_v1(obj: ExampleV2) -> ExampleV1 {
    ExampleV1::new(
        obj.metadata,
        ExampleV1Spec {
            field1: obj.spec.field1,
        },
        obj.status,
    )
}

/// Convert one serialized object to `desired_api_version`
///
/// Only the type metadata is read first. The object is decoded into a
/// concrete version only when a conversion applies; otherwise the original
/// payload is handed back untouched.
pub fn convert_object(
    object: Box<RawValue>,
    desired_api_version: &str,
) -> Result<Box<RawValue>, ConversionError> {
    let types: ObjectTypes =
        serde_json::from_str(object.get()).map_err(ConversionError::TypeMeta)?;

    let converted: VersionedExample =
        match ConversionPath::resolve(&types.api_version, desired_api_version) {
            ConversionPath::V1ToV2 => convert_to_v2(decode(&object, &types)?).into(),
            ConversionPath::V2ToV1 => convert_to_v1(decode(&object, &types)?).into(),
            ConversionPath::Passthrough => return Ok(object),
        };

    debug!(
        from = %types.api_version,
        to = %converted.api_version(),
        "Converted object"
    );
    converted.to_raw().map_err(ConversionError::Encode)
}

fn decode<T: DeserializeOwned>(
    object: &RawValue,
    types: &ObjectTypes,
) -> Result<T, ConversionError> {
    serde_json::from_str(object.get()).map_err(|source| ConversionError::Decode {
        api_version: types.api_version.clone(),
        source,
    })
}

#[cfg(test)]
#[path = "conversion_test.rs"]
mod tests;
