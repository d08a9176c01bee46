//! Module implement the storage-schema records kept in the backend's
//! metadata bucket.
//!
//! The storage version is a semantic version persisted alongside the
//! revision log, read and written independently of the key index. Only
//! `{major, minor}` carry schema-compatibility meaning, the stored form
//! is normalized to `major.minor.0`.

use semver::Version;

use crate::backend::Meta;

/// Metadata bucket key under which the storage version is persisted.
pub const STORAGE_VERSION_KEY: &[u8] = b"storageVersion";

/// Persist `version` into the metadata bucket, normalized to
/// `major.minor.0`.
pub fn set_storage_version<M>(meta: &mut M, version: &Version)
where
    M: Meta,
{
    let norm = Version::new(version.major, version.minor, 0);
    meta.set_meta(STORAGE_VERSION_KEY, norm.to_string().as_bytes());
}

/// Read the storage version from the metadata bucket. Return None when
/// the record is absent or does not parse as a semantic version.
pub fn read_storage_version<M>(meta: &M) -> Option<Version>
where
    M: Meta,
{
    let bytes = meta.get_meta(STORAGE_VERSION_KEY)?;
    let text = std::str::from_utf8(&bytes).ok()?;
    Version::parse(text).ok()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
