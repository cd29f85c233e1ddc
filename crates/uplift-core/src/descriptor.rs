use uplift_backend::{ArtifactMetadata, PackageRef, ReleaseInfo, RepositoryRef};

use crate::package::resolve_download;
use crate::version::{is_newer, strip_version_prefix};

/// Everything the host's install pipeline needs to fetch and apply one
/// update. Constructed only when the release is strictly newer than the
/// installed version; consumed once by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDescriptor {
    pub slug: String,
    pub current_version: String,
    pub new_version: String,
    pub package: PackageRef,
    pub tested: String,
    pub homepage: String,
}

/// Map a fetched release onto an [`UpdateDescriptor`], or `None` when the
/// release does not order after the installed version.
///
/// Idempotent and side-effect-free: identical inputs produce identical
/// descriptors, and the download itself is never performed here.
#[must_use]
pub fn build_descriptor(
    metadata: &ArtifactMetadata,
    repo: &RepositoryRef,
    release: &ReleaseInfo,
) -> Option<UpdateDescriptor> {
    if !is_newer(&release.tag, &metadata.installed_version) {
        return None;
    }

    Some(UpdateDescriptor {
        slug: metadata.slug.clone(),
        current_version: strip_version_prefix(&metadata.installed_version).to_string(),
        new_version: strip_version_prefix(&release.tag).to_string(),
        package: resolve_download(repo, &release.tag),
        tested: metadata.tested_up_to.clone(),
        homepage: metadata.source_url.clone(),
    })
}
