use chrono::{DateTime, Utc};
use log::{debug, warn};

use uplift_backend::{ArtifactMetadata, NetworkError, ReleaseTransport, RepositoryRef};

use crate::descriptor::{build_descriptor, UpdateDescriptor};
use crate::diagnostics::{explain, Warning};
use crate::version::strip_version_prefix;

/// The exactly-three user-visible outcomes of one update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    UpdateAvailable(UpdateDescriptor),
    UpToDate,
    CheckFailed { reason: String },
}

/// Descriptive artifact metadata for the host's information extension
/// point, sourced from the same release response as the update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDetails {
    pub slug: String,
    pub latest_version: String,
    pub homepage: String,
    pub author: Option<String>,
    pub changelog: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// One resolver instance per installed artifact.
///
/// Holds the immutable `(metadata, repository)` pair for its lifetime; no
/// component mutates shared state between checks, so concurrent checks
/// interleave safely.
#[derive(Debug, Clone)]
pub struct Resolver {
    metadata: ArtifactMetadata,
    repo: RepositoryRef,
}

impl Resolver {
    /// Build a resolver with an explicitly assigned repository reference
    /// (the manual-override path; authoritative over anything parsed).
    #[must_use]
    pub fn new(metadata: ArtifactMetadata, repo: RepositoryRef) -> Self {
        Self { metadata, repo }
    }

    /// Build a resolver by deriving the repository from the metadata's
    /// declared source URL. A URL that does not resolve leaves the
    /// repository unconfigured; checks then no-op and diagnostics explain
    /// why.
    #[must_use]
    pub fn from_metadata(metadata: ArtifactMetadata) -> Self {
        let repo = RepositoryRef::from_source_url(&metadata.source_url)
            .unwrap_or_else(|_| RepositoryRef::unconfigured());
        Self { metadata, repo }
    }

    #[must_use]
    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn repository(&self) -> &RepositoryRef {
        &self.repo
    }

    /// The preconditions currently blocking update checks, if any.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        explain(&self.metadata, &self.repo)
    }

    /// Run one update check against the release transport.
    ///
    /// Never touches the network with an unconfigured reference, and
    /// never escalates a transport failure: connectivity problems come
    /// back as `CheckFailed`, which stays distinct from `UpToDate`.
    pub async fn check(&self, transport: &dyn ReleaseTransport) -> CheckOutcome {
        if !self.repo.is_configured() {
            debug!("Update check skipped: repository is not configured");
            return CheckOutcome::CheckFailed {
                reason: "source repository is not configured".to_string(),
            };
        }
        if self.metadata.installed_version.is_empty() {
            debug!("Update check skipped: installed version is unknown");
            return CheckOutcome::CheckFailed {
                reason: "installed version is unknown".to_string(),
            };
        }

        let release = match transport.fetch_latest(&self.repo).await {
            Ok(release) => release,
            Err(error) => {
                warn!(
                    "Update check failed for {}/{}: {error}",
                    self.repo.organization, self.repo.project
                );
                return CheckOutcome::CheckFailed {
                    reason: error.to_string(),
                };
            }
        };

        match build_descriptor(&self.metadata, &self.repo, &release) {
            Some(descriptor) => {
                debug!(
                    "Update available: {} -> {}",
                    descriptor.current_version, descriptor.new_version
                );
                CheckOutcome::UpdateAvailable(descriptor)
            }
            None => CheckOutcome::UpToDate,
        }
    }

    /// Fetch descriptive metadata for the host's information extension
    /// point.
    ///
    /// # Errors
    /// Fails with a `NetworkError` when the repository is unconfigured or
    /// the release request fails; no additional network contract beyond
    /// the latest-release call.
    pub async fn details(
        &self,
        transport: &dyn ReleaseTransport,
    ) -> Result<ArtifactDetails, NetworkError> {
        if !self.repo.is_configured() {
            return Err(NetworkError::request(
                "fetch artifact details",
                "source repository is not configured",
            ));
        }

        let release = transport.fetch_latest(&self.repo).await?;
        Ok(ArtifactDetails {
            slug: self.metadata.slug.clone(),
            latest_version: strip_version_prefix(&release.tag).to_string(),
            homepage: self.metadata.source_url.clone(),
            author: release.author,
            changelog: release.notes,
            last_updated: release.published_at,
        })
    }
}
