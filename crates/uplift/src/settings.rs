use serde::{Deserialize, Serialize};
use std::path::Path;

use uplift_backend::{ArtifactMetadata, RepositoryRef};

use crate::paths::AppPaths;

fn default_cache_ttl() -> u64 {
    6
}

/// Persisted resolver configuration: the manual repository override, the
/// tracked branch, the access token, and cache/logging knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub organization: Option<String>,

    #[serde(default)]
    pub project: Option<String>,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_hours: u64,

    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization: None,
            project: None,
            branch: None,
            access_token: None,
            cache_ttl_hours: default_cache_ttl(),
            debug_logging: false,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        let Ok(paths) = AppPaths::new() else {
            return Self::default();
        };
        Self::load_from(&paths.settings_file()).unwrap_or_default()
    }

    fn load_from(path: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// The manually assigned repository, when both halves are present.
    /// All-or-nothing, like URL parsing: a lone organization or project
    /// configures nothing.
    #[must_use]
    pub fn repository_override(&self) -> Option<RepositoryRef> {
        match (self.organization.as_deref(), self.project.as_deref()) {
            (Some(organization), Some(project))
                if !organization.is_empty() && !project.is_empty() =>
            {
                Some(RepositoryRef::new(organization, project))
            }
            _ => None,
        }
    }

    /// Resolve the repository reference for a check: the manual override
    /// is authoritative; otherwise the metadata's source URL is parsed.
    /// Branch and token assignments apply to whichever reference wins.
    #[must_use]
    pub fn repository_for(&self, metadata: &ArtifactMetadata) -> RepositoryRef {
        let mut repo = self.repository_override().unwrap_or_else(|| {
            RepositoryRef::from_source_url(&metadata.source_url)
                .unwrap_or_else(|_| RepositoryRef::unconfigured())
        });

        if let Some(branch) = self.branch.as_deref().filter(|branch| !branch.is_empty()) {
            repo = repo.with_branch(branch);
        }
        if let Some(token) = self.access_token.as_deref().filter(|token| !token.is_empty()) {
            repo = repo.with_access_token(token);
        }
        repo
    }
}
