//! Task options: the declarative configuration surface of a build.
//!
//! Mirrors the option block a host build tool merges per target. Policy
//! functions (custom digest, transform, formatter) are attached
//! programmatically on [`crate::ManifestBuilder`]; everything here
//! deserializes from task files with environment overrides.

use crate::error::BusterError;
use crate::policy::DigestAlgorithm;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Per-run build options, immutable once the run starts.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskOptions {
    /// Manifest file name, resolved against the working directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Named digest algorithm. A custom digest function attached on the
    /// builder takes precedence over this.
    #[serde(default = "default_algo")]
    pub algo: DigestAlgorithm,

    /// Signed digest truncation: positive keeps leading characters,
    /// negative keeps trailing characters, zero keeps the whole digest.
    #[serde(default)]
    pub length: i64,

    /// Root that manifest keys are relativized against, joined under the
    /// working directory.
    #[serde(default = "default_relative_path")]
    pub relative_path: String,

    /// Separator joining concatenated sources. Line endings in it are
    /// normalized to the host convention once per run.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_file_name() -> String {
    "busters.json".to_string()
}

fn default_algo() -> DigestAlgorithm {
    DigestAlgorithm::Md5
}

fn default_relative_path() -> String {
    ".".to_string()
}

fn default_separator() -> String {
    "\n".to_string()
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            algo: default_algo(),
            length: 0,
            relative_path: default_relative_path(),
            separator: default_separator(),
        }
    }
}

impl TaskOptions {
    /// Load options from a task file with `BUSTER_*` environment overrides.
    ///
    /// The file format is inferred from the extension (TOML, JSON, or YAML).
    pub fn from_file(path: &Path) -> Result<Self, BusterError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("BUSTER").try_parsing(true))
            .build()
            .map_err(|e| BusterError::Config(format!("failed to load task options: {}", e)))?;
        settings
            .try_deserialize()
            .map_err(|e| BusterError::Config(format!("invalid task options: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // BUSTER_* variables are process-global; tests touching the
    // environment overlay take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_match_task_contract() {
        let options = TaskOptions::default();
        assert_eq!(options.file_name, "busters.json");
        assert_eq!(options.algo, DigestAlgorithm::Md5);
        assert_eq!(options.length, 0);
        assert_eq!(options.relative_path, ".");
        assert_eq!(options.separator, "\n");
    }

    #[test]
    fn test_deserialize_partial_options_fills_defaults() {
        let options: TaskOptions =
            serde_json::from_str(r#"{"algo": "sha256", "length": -6}"#).unwrap();
        assert_eq!(options.algo, DigestAlgorithm::Sha256);
        assert_eq!(options.length, -6);
        assert_eq!(options.file_name, "busters.json");
        assert_eq!(options.separator, "\n");
    }

    #[test]
    fn test_deserialize_rejects_unknown_algorithm() {
        let result = serde_json::from_str::<TaskOptions>(r#"{"algo": "crc32"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_reads_toml_task_options() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buster.toml");
        std::fs::write(
            &path,
            "file_name = \"assets.json\"\nalgo = \"sha1\"\nlength = 8\n",
        )
        .unwrap();

        let options = TaskOptions::from_file(&path).unwrap();
        assert_eq!(options.file_name, "assets.json");
        assert_eq!(options.algo, DigestAlgorithm::Sha1);
        assert_eq!(options.length, 8);
        assert_eq!(options.relative_path, ".");
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buster.toml");
        std::fs::write(&path, "length = 8\nfile_name = \"assets.json\"\n").unwrap();

        std::env::set_var("BUSTER_LENGTH", "-6");
        let result = TaskOptions::from_file(&path);
        std::env::remove_var("BUSTER_LENGTH");

        let options = result.unwrap();
        assert_eq!(options.length, -6);
        // untouched file values survive the overlay
        assert_eq!(options.file_name, "assets.json");
    }
}
