use std::fmt;

use uplift_backend::{ArtifactMetadata, ConfigError, RepositoryRef};

/// One unmet precondition blocking update checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    MissingSourceUrl,
    UnsupportedHost,
    MalformedUrl,
    MissingVersion,
}

impl Warning {
    /// Stable machine-readable reason code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingSourceUrl => "missing-source-url",
            Self::UnsupportedHost => "unsupported-host",
            Self::MalformedUrl => "malformed-url",
            Self::MissingVersion => "missing-version",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSourceUrl => {
                write!(f, "The artifact metadata declares no source repository URL")
            }
            Self::UnsupportedHost => {
                write!(f, "The declared source URL does not point at a supported host")
            }
            Self::MalformedUrl => write!(
                f,
                "The declared source URL is missing its organization/project segments"
            ),
            Self::MissingVersion => {
                write!(f, "The artifact metadata declares no installed version")
            }
        }
    }
}

/// Enumerate the preconditions currently blocking update checks.
///
/// Pure and read-only; never fails. An empty list means the resolver is
/// fully configured.
#[must_use]
pub fn explain(metadata: &ArtifactMetadata, repo: &RepositoryRef) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if !repo.is_configured() {
        match RepositoryRef::from_source_url(&metadata.source_url) {
            Err(ConfigError::MissingUrl) => warnings.push(Warning::MissingSourceUrl),
            Err(ConfigError::UnsupportedHost { .. }) => warnings.push(Warning::UnsupportedHost),
            // A parseable URL alongside an unconfigured ref means the ref
            // was deliberately reset; report the URL shape anyway.
            Err(ConfigError::MalformedUrl { .. }) | Ok(_) => warnings.push(Warning::MalformedUrl),
        }
    }

    if metadata.installed_version.is_empty() {
        warnings.push(Warning::MissingVersion);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use uplift_backend::{ArtifactMetadata, RepositoryRef};

    use super::{explain, Warning};

    fn metadata(version: &str, source_url: &str) -> ArtifactMetadata {
        ArtifactMetadata {
            installed_version: version.to_string(),
            source_url: source_url.to_string(),
            tested_up_to: String::new(),
            slug: "widget".to_string(),
            dir_name: String::new(),
        }
    }

    #[test]
    fn fully_configured_yields_no_warnings() {
        let metadata = metadata("1.0.0", "https://github.com/acme/widget");
        let repo = RepositoryRef::new("acme", "widget");
        assert!(explain(&metadata, &repo).is_empty());
    }

    #[test]
    fn missing_source_url_is_reported() {
        let metadata = metadata("1.0.0", "");
        let warnings = explain(&metadata, &RepositoryRef::unconfigured());
        assert_eq!(warnings, vec![Warning::MissingSourceUrl]);
    }

    #[test]
    fn foreign_host_is_reported() {
        let metadata = metadata("1.0.0", "https://example.com/acme/widget");
        let warnings = explain(&metadata, &RepositoryRef::unconfigured());
        assert_eq!(warnings, vec![Warning::UnsupportedHost]);
    }

    #[test]
    fn missing_version_is_reported_alongside_url_problems() {
        let metadata = metadata("", "https://github.com/acme");
        let warnings = explain(&metadata, &RepositoryRef::unconfigured());
        assert_eq!(
            warnings,
            vec![Warning::MalformedUrl, Warning::MissingVersion]
        );
    }

    #[test]
    fn manual_override_suppresses_url_warnings() {
        let metadata = metadata("1.0.0", "");
        let repo = RepositoryRef::new("acme", "widget");
        assert!(explain(&metadata, &repo).is_empty());
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [
            Warning::MissingSourceUrl.code(),
            Warning::UnsupportedHost.code(),
            Warning::MalformedUrl.code(),
            Warning::MissingVersion.code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
