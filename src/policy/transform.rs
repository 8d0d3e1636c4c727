//! Manifest transform policies.
//!
//! Applied to an isolated snapshot of the aggregated hash store before
//! formatting. The default is identity: the store becomes a JSON object of
//! relative path to hash.

use crate::error::BusterError;
use crate::types::HashStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A user-supplied transform over the aggregated hash store.
#[async_trait]
pub trait CustomTransform: Send + Sync {
    async fn transform(&self, hashes: HashStore) -> Result<Value, BusterError>;
}

/// Transform policy applied between aggregation and formatting.
#[derive(Clone, Default)]
pub enum Transformer {
    /// Pass the store through as a JSON object (the default).
    #[default]
    Identity,
    Custom(Arc<dyn CustomTransform>),
}

impl Transformer {
    /// Wrap a synchronous closure as a custom transform.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(HashStore) -> Result<Value, BusterError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(FnTransform(f)))
    }

    pub async fn apply(&self, hashes: HashStore) -> Result<Value, BusterError> {
        match self {
            Self::Identity => Ok(Value::Object(
                hashes
                    .into_iter()
                    .map(|(path, hash)| (path, Value::String(hash)))
                    .collect::<Map<String, Value>>(),
            )),
            Self::Custom(f) => f.transform(hashes).await,
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

struct FnTransform<F>(F);

#[async_trait]
impl<F> CustomTransform for FnTransform<F>
where
    F: Fn(HashStore) -> Result<Value, BusterError> + Send + Sync,
{
    async fn transform(&self, hashes: HashStore) -> Result<Value, BusterError> {
        (self.0)(hashes)
    }
}
