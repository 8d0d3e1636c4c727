//! Pluggable build policies.
//!
//! The three user-extensible points of a build: the digest algorithm, the
//! manifest transform, and the manifest formatter. Each is a closed set of
//! built-in variants plus a custom async function variant. Custom functions
//! return dynamic JSON values, mirroring the untyped callables a host build
//! tool hands over; their resolved values are validated at the stage
//! boundary.

pub mod digest;
pub mod format;
pub mod transform;

pub use digest::{CustomDigest, DigestAlgorithm, Digester};
pub use format::{CustomFormat, Formatter};
pub use transform::{CustomTransform, Transformer};

use serde_json::Value;

/// Human-readable JSON type name, used in policy validation errors.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
