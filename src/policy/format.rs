//! Manifest formatter policies.
//!
//! The formatter turns the transformed manifest value into the text written
//! to the manifest file. The default is compact JSON. A custom formatter
//! must resolve to a string, else the run fails with
//! `InvalidFormatterResult`.

use crate::error::BusterError;
use crate::policy::json_type_name;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A user-supplied formatter for the transformed manifest value.
#[async_trait]
pub trait CustomFormat: Send + Sync {
    async fn format(&self, manifest: Value) -> Result<Value, BusterError>;
}

/// Formatter policy producing the manifest file's text.
#[derive(Clone, Default)]
pub enum Formatter {
    /// Compact JSON (the default).
    #[default]
    Json,
    Custom(Arc<dyn CustomFormat>),
}

impl Formatter {
    /// Wrap a synchronous closure as a custom formatter.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BusterError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(FnFormat(f)))
    }

    /// Produce and validate the manifest text.
    pub async fn format(&self, manifest: Value) -> Result<String, BusterError> {
        match self {
            Self::Json => serde_json::to_string(&manifest)
                .map_err(|e| BusterError::Policy(format!("JSON serialization failed: {}", e))),
            Self::Custom(f) => match f.format(manifest).await? {
                Value::String(s) => Ok(s),
                other => Err(BusterError::InvalidFormatterResult(
                    json_type_name(&other).to_string(),
                )),
            },
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("Json"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

struct FnFormat<F>(F);

#[async_trait]
impl<F> CustomFormat for FnFormat<F>
where
    F: Fn(Value) -> Result<Value, BusterError> + Send + Sync,
{
    async fn format(&self, manifest: Value) -> Result<Value, BusterError> {
        (self.0)(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_formatter_is_compact_json() {
        let text = Formatter::Json
            .format(json!({"js/app.js": "abc123"}))
            .await
            .unwrap();
        assert_eq!(text, r#"{"js/app.js":"abc123"}"#);
    }

    #[tokio::test]
    async fn test_custom_formatter_can_pretty_print() {
        let formatter = Formatter::from_fn(|manifest| {
            let pretty = serde_json::to_string_pretty(&manifest)
                .map_err(|e| BusterError::Policy(e.to_string()))?;
            Ok(Value::String(pretty))
        });
        let text = formatter.format(json!({"a": "1"})).await.unwrap();
        assert!(text.contains('\n'));
    }

    #[tokio::test]
    async fn test_custom_formatter_rejects_non_string() {
        let formatter = Formatter::from_fn(|manifest| Ok(manifest));
        let err = formatter.format(json!({"a": "1"})).await.unwrap_err();
        assert!(matches!(err, BusterError::InvalidFormatterResult(ref t) if t == "object"));
    }
}
