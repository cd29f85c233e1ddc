use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Hosting domain recognized by [`RepositoryRef::from_source_url`].
pub const HOSTING_DOMAIN: &str = "github.com";

const DEFAULT_BRANCH: &str = "main";

/// Declared metadata of the installed artifact, read once from the host.
///
/// Missing fields are empty strings, never errors; downstream code treats
/// an empty string as "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactMetadata {
    pub installed_version: String,
    pub source_url: String,
    pub tested_up_to: String,
    pub slug: String,
    pub dir_name: String,
}

/// Normalized `(host, organization, project)` identity of the source
/// repository, plus the branch and optional access token.
///
/// Either fully resolved or the [`RepositoryRef::unconfigured`] sentinel;
/// callers gate on [`RepositoryRef::is_configured`] rather than individual
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub host: String,
    pub organization: String,
    pub project: String,
    pub branch: String,
    pub access_token: Option<String>,
}

impl RepositoryRef {
    #[must_use]
    pub fn new(organization: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            host: HOSTING_DOMAIN.to_string(),
            organization: organization.into(),
            project: project.into(),
            branch: DEFAULT_BRANCH.to_string(),
            access_token: None,
        }
    }

    /// The sentinel value used when no repository could be derived.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            host: String::new(),
            organization: String::new(),
            project: String::new(),
            branch: DEFAULT_BRANCH.to_string(),
            access_token: None,
        }
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Whether this reference identifies a real `organization/project`.
    ///
    /// Necessary and sufficient for any release request to be attempted.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.organization.is_empty() && !self.project.is_empty()
    }

    /// Base URL of the provider API for this repository's host.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("https://api.{}", self.host)
    }

    /// Derive a reference from the artifact's declared source URL.
    ///
    /// All-or-nothing: both the organization and the project segment must
    /// resolve, otherwise the whole parse fails.
    ///
    /// # Errors
    /// `MissingUrl` for an empty input, `UnsupportedHost` when the URL does
    /// not point at [`HOSTING_DOMAIN`], `MalformedUrl` when the path lacks
    /// the `organization/project` segments.
    pub fn from_source_url(source_url: &str) -> Result<Self, ConfigError> {
        let url = source_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        let host = host.strip_prefix("www.").unwrap_or(host);

        if !host.eq_ignore_ascii_case(HOSTING_DOMAIN) {
            return Err(ConfigError::UnsupportedHost {
                url: url.to_string(),
            });
        }

        // Drop query/fragment before splitting the path.
        let path = path.split(['?', '#']).next().unwrap_or("");
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let organization = segments.next();
        let project = segments
            .next()
            .map(|segment| segment.trim_end_matches(".git"))
            .filter(|segment| !segment.is_empty());

        match (organization, project) {
            (Some(organization), Some(project)) => Ok(Self::new(organization, project)),
            _ => Err(ConfigError::MalformedUrl {
                url: url.to_string(),
            }),
        }
    }
}

/// One downloadable asset attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub name: String,
    pub download_url: String,
    pub size: Option<u64>,
}

/// The latest published release of a repository, as reported by a
/// [`crate::ReleaseTransport`]. Ephemeral; recomputed on each check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub tag: String,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<AssetRef>,
    pub notes: Option<String>,
    pub author: Option<String>,
}

/// A downloadable archive reference: URL plus the headers the download
/// request must carry. Header values already passed the credential-scope
/// guard for this URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

/// Outcome of the host's download-and-extract step. The staged directory
/// is host-owned until relocation; its name is provider-assigned and
/// unpredictable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub staged_path: PathBuf,
}
