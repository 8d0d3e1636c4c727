//! Buster: Cache-Busting Manifest Builder
//!
//! Concatenates groups of source files into destination files, hashes each
//! written destination, and emits a manifest mapping relative asset paths to
//! content fingerprints. Downstream consumers use the manifest to generate
//! versioned asset URLs.

pub mod builder;
pub mod concat;
pub mod error;
pub mod hashing;
pub mod logging;
pub mod options;
pub mod policy;
pub mod types;

pub use builder::{ManifestBuilder, RunSummary};
pub use error::BusterError;
pub use options::TaskOptions;
pub use policy::{DigestAlgorithm, Digester, Formatter, Transformer};
pub use types::{FileGroup, HashEntry, HashStore, ManifestTable};
