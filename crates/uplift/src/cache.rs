use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use uplift_backend::{NetworkError, ReleaseInfo, ReleaseTransport, RepositoryRef};

/// The last release response for one repository, persisted between runs
/// so near-simultaneous checks collapse into a single network call.
#[derive(Serialize, Deserialize)]
pub struct CachedRelease {
    pub key: String,
    pub release: ReleaseInfo,
    pub cached_at: DateTime<Utc>,
}

/// TTL-based disk cache keyed by `organization/project`. Purely an
/// optimization: correctness never depends on it, only request volume.
pub struct ReleaseCache {
    path: PathBuf,
    ttl: Duration,
}

impl ReleaseCache {
    #[must_use]
    pub fn new(path: PathBuf, ttl_hours: u64) -> Self {
        // Clamp to a year so an absurd setting cannot overflow the duration.
        let hours = i64::try_from(ttl_hours).unwrap_or(i64::MAX).min(24 * 365);
        Self {
            path,
            ttl: Duration::hours(hours),
        }
    }

    /// The cached release for `key`, if present and within the TTL.
    #[must_use]
    pub fn load_fresh(&self, key: &str) -> Option<ReleaseInfo> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        let cached: CachedRelease = serde_json::from_str(&data).ok()?;
        if cached.key != key {
            return None;
        }
        if Utc::now().signed_duration_since(cached.cached_at) >= self.ttl {
            return None;
        }
        Some(cached.release)
    }

    pub fn store(&self, key: &str, release: &ReleaseInfo) {
        let cached = CachedRelease {
            key: key.to_string(),
            release: release.clone(),
            cached_at: Utc::now(),
        };
        if let Ok(data) = serde_json::to_vec(&cached) {
            let _ = write_atomic(&self.path, &data);
        }
    }
}

/// Host-owned caching layer in front of a [`ReleaseTransport`]. A fresh
/// cache entry answers without touching the network; a miss delegates and
/// stores the result.
pub struct CachedTransport<T> {
    inner: T,
    cache: ReleaseCache,
}

impl<T> CachedTransport<T> {
    pub fn new(inner: T, cache: ReleaseCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<T: ReleaseTransport> ReleaseTransport for CachedTransport<T> {
    async fn fetch_latest(&self, repo: &RepositoryRef) -> Result<ReleaseInfo, NetworkError> {
        let key = format!("{}/{}", repo.organization, repo.project);
        if let Some(release) = self.cache.load_fresh(&key) {
            debug!("Serving cached release for {key}");
            return Ok(release);
        }

        let release = self.inner.fetch_latest(repo).await?;
        self.cache.store(&key, &release);
        Ok(release)
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "cache path has no parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("cache");
    let pid = std::process::id();

    let mut tmp_path = None;
    for attempt in 0..16_u8 {
        let candidate = parent.join(format!(".{file_name}.{pid}.{attempt}.tmp"));
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(mut file) => {
                file.write_all(data)?;
                file.sync_all()?;
                tmp_path = Some(candidate);
                break;
            }
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(error) => return Err(error),
        }
    }

    let Some(tmp_path) = tmp_path else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "failed to create unique cache temp file",
        ));
    };

    if let Err(error) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(error);
    }

    Ok(())
}
