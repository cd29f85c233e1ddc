use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use uplift_backend::{AssetRef, NetworkError, ReleaseInfo, ReleaseTransport, RepositoryRef};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Deserialize)]
struct RawRelease {
    tag_name: String,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<RawAsset>,
    body: Option<String>,
    author: Option<RawAuthor>,
}

#[derive(Deserialize)]
struct RawAsset {
    name: String,
    browser_download_url: String,
    size: Option<u64>,
}

#[derive(Deserialize)]
struct RawAuthor {
    login: String,
}

/// GitHub implementation of [`ReleaseTransport`]: one GET against the
/// latest-release endpoint per check, with bounded timeouts.
pub struct GithubReleases {
    client: reqwest::Client,
}

impl GithubReleases {
    /// Build the transport with its own HTTP client.
    ///
    /// # Errors
    /// Fails when the underlying TLS/client setup fails.
    pub fn new() -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("uplift/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| NetworkError::request_from("build release client", error))?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Whether a bearer credential may be attached to a request for `url`.
///
/// Only URLs addressing this repository's slice of the provider API
/// qualify; the token must never travel to an unrelated host (for example
/// through an asset redirect to a third-party CDN).
#[must_use]
pub fn authorizes(repo: &RepositoryRef, url: &str) -> bool {
    let prefix = format!(
        "{}/repos/{}/{}/",
        repo.api_base(),
        repo.organization,
        repo.project
    );
    url.starts_with(&prefix)
}

#[async_trait]
impl ReleaseTransport for GithubReleases {
    async fn fetch_latest(&self, repo: &RepositoryRef) -> Result<ReleaseInfo, NetworkError> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            repo.api_base(),
            repo.organization,
            repo.project
        );

        let mut request = self.client.get(&url).header("Accept", GITHUB_ACCEPT);
        if let Some(token) = &repo.access_token {
            if authorizes(repo, &url) {
                request = request.header("Authorization", format!("Bearer {token}"));
            }
        }

        debug!("Fetching latest release from {url}");
        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                NetworkError::Timeout {
                    operation: "fetch latest release",
                }
            } else {
                NetworkError::request_from("fetch latest release", error)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body_snippet = response
                .text()
                .await
                .ok()
                .map(|body| response_snippet(&body, 160))
                .unwrap_or_default();
            return Err(NetworkError::Status {
                status,
                body_snippet,
            });
        }

        let raw: RawRelease = response.json().await.map_err(NetworkError::malformed_body)?;
        release_from_raw(raw)
    }
}

fn release_from_raw(raw: RawRelease) -> Result<ReleaseInfo, NetworkError> {
    if raw.tag_name.is_empty() {
        return Err(NetworkError::MalformedBody {
            details: "release payload carries no tag".to_string(),
        });
    }

    Ok(ReleaseInfo {
        tag: raw.tag_name,
        published_at: raw.published_at,
        assets: raw
            .assets
            .into_iter()
            .map(|asset| AssetRef {
                name: asset.name,
                download_url: asset.browser_download_url,
                size: asset.size,
            })
            .collect(),
        notes: raw.body,
        author: raw.author.map(|author| author.login),
    })
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}

#[cfg(test)]
mod tests {
    use uplift_backend::{NetworkError, RepositoryRef};

    use super::{authorizes, release_from_raw, response_snippet, RawRelease};

    #[test]
    fn authorizes_only_this_repository_on_the_api_host() {
        let repo = RepositoryRef::new("acme", "widget").with_access_token("ghp_secret");

        assert!(authorizes(
            &repo,
            "https://api.github.com/repos/acme/widget/releases/latest"
        ));
        assert!(authorizes(
            &repo,
            "https://api.github.com/repos/acme/widget/zipball/v1.2.0"
        ));
        assert!(!authorizes(
            &repo,
            "https://api.github.com/repos/acme/other/releases/latest"
        ));
        assert!(!authorizes(
            &repo,
            "https://objects.example-cdn.com/repos/acme/widget/zipball/v1.2.0"
        ));
        assert!(!authorizes(&repo, "https://api.github.com/rate_limit"));
    }

    #[test]
    fn maps_release_payload_onto_release_info() {
        let raw: RawRelease = serde_json::from_str(
            r#"{
                "tag_name": "v1.2.0",
                "published_at": "2026-05-01T12:00:00Z",
                "body": "Fixes a crash on startup",
                "author": { "login": "acme" },
                "assets": [
                    {
                        "name": "widget-1.2.0.zip",
                        "browser_download_url": "https://github.com/acme/widget/releases/download/v1.2.0/widget-1.2.0.zip",
                        "size": 123456
                    }
                ]
            }"#,
        )
        .expect("canned payload should deserialize");

        let release = release_from_raw(raw).expect("payload should map");
        assert_eq!(release.tag, "v1.2.0");
        assert_eq!(release.author.as_deref(), Some("acme"));
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "widget-1.2.0.zip");
        assert_eq!(release.assets[0].size, Some(123456));
    }

    #[test]
    fn tolerates_minimal_release_payload() {
        let raw: RawRelease = serde_json::from_str(r#"{ "tag_name": "v1.2.0" }"#)
            .expect("minimal payload should deserialize");

        let release = release_from_raw(raw).expect("minimal payload should map");
        assert!(release.assets.is_empty());
        assert!(release.notes.is_none());
        assert!(release.published_at.is_none());
    }

    #[test]
    fn empty_tag_is_a_malformed_body() {
        let raw: RawRelease =
            serde_json::from_str(r#"{ "tag_name": "" }"#).expect("payload should deserialize");
        assert!(matches!(
            release_from_raw(raw),
            Err(NetworkError::MalformedBody { .. })
        ));
    }

    #[test]
    fn snippet_is_bounded_and_prefixed() {
        assert_eq!(response_snippet("", 10), "");
        assert_eq!(response_snippet("rate limit exceeded", 10), ": rate limi");
    }
}
