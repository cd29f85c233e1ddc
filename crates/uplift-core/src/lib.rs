//! Core resolver pipeline for Uplift.
//!
//! This crate decides whether a newer release of the hosting artifact
//! exists in its source repository and assembles everything the host's
//! installer needs to act on it:
//! - Fail-soft metadata loading from the host manifest.
//! - Version ordering for release tags.
//! - Pure package (archive URL + headers) resolution.
//! - Update descriptor construction and the three-outcome check.
//! - Post-install relocation of the extracted tree.
//! - Read-only configuration diagnostics.

mod check;
mod descriptor;
mod diagnostics;
mod metadata;
mod package;
mod relocate;
mod version;

/// Resolver orchestration, check outcomes, and artifact details.
pub use check::{ArtifactDetails, CheckOutcome, Resolver};
/// Update descriptor model and builder.
pub use descriptor::{build_descriptor, UpdateDescriptor};
/// Configuration precondition reporting.
pub use diagnostics::{explain, Warning};
/// Manifest keys and the fail-soft metadata loader.
pub use metadata::{
    load_metadata, KEY_DIRECTORY, KEY_SLUG, KEY_SOURCE, KEY_TESTED, KEY_VERSION,
};
/// Pure archive reference builder.
pub use package::resolve_download;
/// Staged-to-canonical directory relocation.
pub use relocate::Relocator;
/// Release tag ordering helpers.
pub use version::{is_newer, strip_version_prefix};
