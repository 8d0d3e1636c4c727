//! Hashing stage: digest each destination payload into a manifest entry.
//!
//! Jobs are spawned eagerly in file-group order and run concurrently; the
//! builder owns the fan-in barrier. Each job computes the digest, applies
//! the signed slicing policy, and relativizes the destination path into the
//! manifest key.

use crate::error::BusterError;
use crate::policy::Digester;
use crate::types::{DestinationPayload, HashEntry};
use std::path::{Component, Path, PathBuf};

/// Truncate a digest according to the signed `length` policy.
///
/// Positive keeps the leading `length` characters, negative keeps the
/// trailing `|length|`, zero keeps the digest unchanged. A length exceeding
/// the digest saturates to the whole or empty string.
pub fn slice_hash(hash: &str, length: i64) -> String {
    if length == 0 {
        return hash.to_string();
    }
    let chars: Vec<char> = hash.chars().collect();
    if length > 0 {
        let keep = (length as usize).min(chars.len());
        chars[..keep].iter().collect()
    } else {
        let keep = (length.unsigned_abs() as usize).min(chars.len());
        chars[chars.len() - keep..].iter().collect()
    }
}

/// Manifest key for a destination: the path made relative to
/// `base.join(relative_root)`, with backslash separators rewritten to
/// forward slashes so keys are identical across host platforms.
pub fn relative_key(base: &Path, relative_root: &str, destination: &Path) -> String {
    let anchor = base.join(relative_root);
    let relative = lexical_relative(&anchor, destination);
    relative.to_string_lossy().replace('\\', "/")
}

/// Lexical equivalent of making `target` relative to `anchor`, without
/// touching the filesystem.
fn lexical_relative(anchor: &Path, target: &Path) -> PathBuf {
    let anchor_parts = normalized_components(anchor);
    let target_parts = normalized_components(target);
    let common = anchor_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..anchor_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

fn normalized_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Hash one payload into its manifest entry.
///
/// The digest is validated by the digester (a custom function must resolve
/// to a string), then sliced and keyed. The payload's working-directory
/// context is the `cwd` captured at concatenation time.
pub async fn hash_payload(
    payload: DestinationPayload,
    digester: Digester,
    length: i64,
    relative_root: String,
) -> Result<HashEntry, BusterError> {
    let digest = digester.digest(&payload.content).await?;
    let hash = slice_hash(&digest, length);
    let relative_path = relative_key(&payload.base_path, &relative_root, &payload.destination_path);
    Ok(HashEntry {
        relative_path,
        hash,
    })
}
