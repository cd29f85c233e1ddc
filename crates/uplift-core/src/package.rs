use uplift_backend::{PackageRef, RepositoryRef};

const ARCHIVE_ACCEPT: &str = "application/vnd.github+json";

/// Build the downloadable archive reference for a release tag or branch.
///
/// Pure and deterministic: the same `(repo, tag_or_branch)` always yields
/// the same URL, with auth headers present iff the reference carries an
/// access token. Performs no I/O.
#[must_use]
pub fn resolve_download(repo: &RepositoryRef, tag_or_branch: &str) -> PackageRef {
    let url = format!(
        "{}/repos/{}/{}/zipball/{}",
        repo.api_base(),
        repo.organization,
        repo.project,
        tag_or_branch
    );

    let headers = match &repo.access_token {
        Some(token) => vec![
            ("Authorization", format!("Bearer {token}")),
            ("Accept", ARCHIVE_ACCEPT.to_string()),
        ],
        None => Vec::new(),
    };

    PackageRef { url, headers }
}

#[cfg(test)]
mod tests {
    use uplift_backend::RepositoryRef;

    use super::resolve_download;

    #[test]
    fn builds_zipball_url_from_repository_identity() {
        let repo = RepositoryRef::new("acme", "widget");
        let package = resolve_download(&repo, "v1.2.0");

        assert_eq!(
            package.url,
            "https://api.github.com/repos/acme/widget/zipball/v1.2.0"
        );
        assert!(package.headers.is_empty());
    }

    #[test]
    fn attaches_auth_headers_iff_token_is_set() {
        let repo = RepositoryRef::new("acme", "widget").with_access_token("ghp_secret");
        let package = resolve_download(&repo, "develop");

        assert_eq!(
            package.headers,
            vec![
                ("Authorization", "Bearer ghp_secret".to_string()),
                ("Accept", "application/vnd.github+json".to_string()),
            ]
        );
    }

    #[test]
    fn is_deterministic_for_identical_inputs() {
        let repo = RepositoryRef::new("acme", "widget").with_access_token("ghp_secret");
        assert_eq!(
            resolve_download(&repo, "v1.2.0"),
            resolve_download(&repo, "v1.2.0")
        );
    }
}
