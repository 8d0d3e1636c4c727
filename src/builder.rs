//! Manifest build orchestration.
//!
//! Runs the four stages of a build: sequential concatenation per file
//! group, eager concurrent hashing fan-out, an all-or-nothing fan-in
//! barrier, then transform, format, and the manifest write.

use crate::concat;
use crate::error::BusterError;
use crate::hashing;
use crate::options::TaskOptions;
use crate::policy::{Digester, Formatter, Transformer};
use crate::types::{FileGroup, HashEntry, ManifestTable};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Outcome of a successful build.
#[derive(Debug)]
pub struct RunSummary {
    /// Path the manifest was written to.
    pub manifest_path: PathBuf,
    /// Destination files written, in file-group order.
    pub destinations: Vec<PathBuf>,
}

/// Builds destination files and their cache-busting manifest.
///
/// Policies default from [`TaskOptions`]; custom digest, transform, and
/// formatter functions are attached with the `with_*` builder methods.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    options: TaskOptions,
    digester: Digester,
    transformer: Transformer,
    formatter: Formatter,
}

impl ManifestBuilder {
    pub fn new(options: TaskOptions) -> Self {
        let digester = Digester::Named(options.algo);
        Self {
            options,
            digester,
            transformer: Transformer::default(),
            formatter: Formatter::default(),
        }
    }

    /// Replace the digest policy, e.g. with a custom digest function.
    pub fn with_digester(mut self, digester: Digester) -> Self {
        self.digester = digester;
        self
    }

    /// Replace the transform applied to the aggregated store.
    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = transformer;
        self
    }

    /// Replace the formatter producing the manifest text.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Run the full build for `groups`.
    ///
    /// Destination files are written as each group is concatenated; the
    /// manifest is written only after every hashing job succeeds. On
    /// failure, already-written destinations remain on disk and the
    /// manifest file is untouched.
    pub async fn run(&self, groups: &[FileGroup]) -> Result<RunSummary, BusterError> {
        match self.run_inner(groups).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                error!(error = %e, "manifest build failed");
                Err(e)
            }
        }
    }

    async fn run_inner(&self, groups: &[FileGroup]) -> Result<RunSummary, BusterError> {
        let separator = concat::normalize_line_endings(&self.options.separator);

        let mut destinations = Vec::with_capacity(groups.len());
        let mut jobs: Vec<JoinHandle<Result<HashEntry, BusterError>>> =
            Vec::with_capacity(groups.len());

        for group in groups {
            let payload = concat::concatenate(group, &separator)?;
            destinations.push(payload.destination_path.clone());

            // Hash eagerly, concurrent with the remaining concatenation.
            jobs.push(tokio::spawn(hashing::hash_payload(
                payload,
                self.digester.clone(),
                self.options.length,
                self.options.relative_path.clone(),
            )));
        }

        let entries = await_all(jobs).await?;

        let mut table = ManifestTable::new();
        for entry in entries {
            table.insert(&self.options.file_name, entry);
        }
        let snapshot = table.snapshot(&self.options.file_name);
        let entry_count = snapshot.len();

        let transformed = self.transformer.apply(snapshot).await?;
        let formatted = self.formatter.format(transformed).await?;

        let manifest_path = Path::new(".").join(&self.options.file_name);
        concat::write_with_parents(&manifest_path, &formatted)?;
        info!(path = %manifest_path.display(), entries = entry_count, "manifest written");

        Ok(RunSummary {
            manifest_path,
            destinations,
        })
    }
}

/// Fan-in barrier: every job settles before any result is used.
///
/// The first failure (in submission order) aborts the run and the
/// remaining results are discarded.
async fn await_all(
    jobs: Vec<JoinHandle<Result<HashEntry, BusterError>>>,
) -> Result<Vec<HashEntry>, BusterError> {
    let settled = futures::future::join_all(jobs).await;

    let mut entries = Vec::with_capacity(settled.len());
    let mut first_failure = None;
    for result in settled {
        match result {
            Ok(Ok(entry)) => entries.push(entry),
            Ok(Err(e)) => {
                first_failure.get_or_insert(e);
            }
            Err(join_error) => {
                first_failure.get_or_insert(BusterError::Task(join_error));
            }
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => Ok(entries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_await_all_collects_in_submission_order() {
        let jobs: Vec<JoinHandle<Result<HashEntry, BusterError>>> = vec![
            tokio::spawn(async {
                tokio::task::yield_now().await;
                Ok(HashEntry {
                    relative_path: "slow.js".to_string(),
                    hash: "1".to_string(),
                })
            }),
            tokio::spawn(async {
                Ok(HashEntry {
                    relative_path: "fast.js".to_string(),
                    hash: "2".to_string(),
                })
            }),
        ];
        let entries = await_all(jobs).await.unwrap();
        assert_eq!(entries[0].relative_path, "slow.js");
        assert_eq!(entries[1].relative_path, "fast.js");
    }

    #[tokio::test]
    async fn test_await_all_first_failure_wins() {
        let jobs: Vec<JoinHandle<Result<HashEntry, BusterError>>> = vec![
            tokio::spawn(async { Err(BusterError::Policy("first".to_string())) }),
            tokio::spawn(async { Err(BusterError::Policy("second".to_string())) }),
            tokio::spawn(async {
                Ok(HashEntry {
                    relative_path: "ok.js".to_string(),
                    hash: "3".to_string(),
                })
            }),
        ];
        let err = await_all(jobs).await.unwrap_err();
        assert!(matches!(err, BusterError::Policy(ref msg) if msg == "first"));
    }
}
