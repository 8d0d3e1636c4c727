//! Digest computation policies.
//!
//! Built-in algorithms produce lowercase hexadecimal digests. A custom
//! digest function may produce any string; non-string resolved values are
//! rejected at the boundary with `InvalidAlgorithmResult`.

use crate::error::BusterError;
use crate::policy::json_type_name;
use async_trait::async_trait;
use md5::{Digest, Md5};
use serde::Deserialize;
use serde_json::Value;
use sha1::Sha1;
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Built-in digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Blake3,
}

impl DigestAlgorithm {
    /// Lowercase hex digest of `content`.
    pub fn digest(&self, content: &str) -> String {
        match self {
            Self::Md5 => hex::encode(Md5::digest(content.as_bytes())),
            Self::Sha1 => hex::encode(Sha1::digest(content.as_bytes())),
            Self::Sha256 => hex::encode(Sha256::digest(content.as_bytes())),
            Self::Blake3 => blake3::hash(content.as_bytes()).to_hex().to_string(),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = BusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            other => Err(BusterError::Config(format!(
                "unknown digest algorithm: {}",
                other
            ))),
        }
    }
}

/// A user-supplied digest function.
///
/// The resolved value may be any JSON value; the hashing stage validates
/// that it is a string.
#[async_trait]
pub trait CustomDigest: Send + Sync {
    async fn digest(&self, content: &str) -> Result<Value, BusterError>;
}

/// Digest policy: a named built-in algorithm or a custom function.
#[derive(Clone)]
pub enum Digester {
    Named(DigestAlgorithm),
    Custom(Arc<dyn CustomDigest>),
}

impl Digester {
    /// Wrap a synchronous closure as a custom digest function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, BusterError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(FnDigest(f)))
    }

    /// Compute and validate the digest of `content`.
    pub async fn digest(&self, content: &str) -> Result<String, BusterError> {
        match self {
            Self::Named(algo) => Ok(algo.digest(content)),
            Self::Custom(f) => match f.digest(content).await? {
                Value::String(s) => Ok(s),
                other => Err(BusterError::InvalidAlgorithmResult(
                    json_type_name(&other).to_string(),
                )),
            },
        }
    }
}

impl Default for Digester {
    fn default() -> Self {
        Self::Named(DigestAlgorithm::Md5)
    }
}

impl fmt::Debug for Digester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(algo) => f.debug_tuple("Named").field(algo).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

struct FnDigest<F>(F);

#[async_trait]
impl<F> CustomDigest for FnDigest<F>
where
    F: Fn(&str) -> Result<Value, BusterError> + Send + Sync,
{
    async fn digest(&self, content: &str) -> Result<Value, BusterError> {
        (self.0)(content)
    }
}
