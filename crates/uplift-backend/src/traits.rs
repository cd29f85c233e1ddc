use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{InstallError, NetworkError};
use crate::types::{InstallResult, PackageRef, ReleaseInfo, RepositoryRef};

/// Read-only key/value metadata supplied by the host. The manifest format
/// itself is host-owned; the resolver only looks up well-known keys.
pub trait MetadataProvider {
    fn get(&self, key: &str) -> Option<String>;
}

impl MetadataProvider for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// One call against the remote repository's release API.
///
/// Implementations must honor a bounded request timeout and report it as
/// [`NetworkError::Timeout`]; callers treat every error here as "no
/// information available", which stays distinct from "no update".
#[async_trait]
pub trait ReleaseTransport: Send + Sync {
    async fn fetch_latest(&self, repo: &RepositoryRef) -> Result<ReleaseInfo, NetworkError>;
}

/// The host's download-and-extract step. Receives the package reference
/// produced by the resolver and returns where the extracted tree was
/// staged. Must not touch the artifact's canonical install path.
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, package: &PackageRef) -> Result<InstallResult, InstallError>;
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct CannedTransport {
        release: ReleaseInfo,
    }

    #[async_trait]
    impl ReleaseTransport for CannedTransport {
        async fn fetch_latest(&self, _repo: &RepositoryRef) -> Result<ReleaseInfo, NetworkError> {
            Ok(self.release.clone())
        }
    }

    #[tokio::test]
    async fn boxed_transport_returns_canned_release() {
        let transport: Box<dyn ReleaseTransport> = Box::new(CannedTransport {
            release: ReleaseInfo {
                tag: "v1.2.0".to_string(),
                published_at: None,
                assets: Vec::new(),
                notes: Some("changelog".to_string()),
                author: None,
            },
        });

        let release = transport
            .fetch_latest(&RepositoryRef::new("acme", "widget"))
            .await
            .expect("canned fetch should succeed");
        assert_eq!(release.tag, "v1.2.0");
    }

    #[test]
    fn hash_map_provider_returns_owned_values() {
        let mut manifest = HashMap::new();
        manifest.insert("Version".to_string(), "1.0.0".to_string());

        assert_eq!(
            MetadataProvider::get(&manifest, "Version").as_deref(),
            Some("1.0.0")
        );
        assert_eq!(MetadataProvider::get(&manifest, "Slug"), None);
    }
}
