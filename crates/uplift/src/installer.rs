use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;

use uplift_backend::{InstallError, InstallResult, Installer, PackageRef};

/// Downloads a release archive and extracts it into a staging directory
/// under `staging_root`. The staged tree keeps its provider-assigned name
/// (typically `org-project-<sha>`); relocation to the canonical name is a
/// separate step.
pub struct ZipInstaller {
    client: reqwest::Client,
    staging_root: PathBuf,
}

impl ZipInstaller {
    /// # Errors
    /// Fails when the HTTP client cannot be built.
    pub fn new(staging_root: PathBuf) -> Result<Self, InstallError> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(concat!("uplift/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| InstallError::Download {
                url: String::new(),
                details: format!("failed to build download client: {error}"),
            })?;
        Ok(Self {
            client,
            staging_root,
        })
    }

    fn sweep_stale(&self) {
        let Ok(entries) = std::fs::read_dir(&self.staging_root) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && entry.file_name().to_string_lossy().starts_with(".tmp") {
                debug!("Cleaning up stale staging dir: {}", path.display());
                let _ = std::fs::remove_dir_all(&path);
            }
        }
    }
}

#[async_trait]
impl Installer for ZipInstaller {
    async fn install(&self, package: &PackageRef) -> Result<InstallResult, InstallError> {
        std::fs::create_dir_all(&self.staging_root)
            .map_err(|error| InstallError::io("create staging root", error))?;
        self.sweep_stale();
        let staging = tempfile::tempdir_in(&self.staging_root)
            .map_err(|error| InstallError::io("create staging directory", error))?;

        let archive_path = staging.path().join("package.zip");
        download_archive(&self.client, package, &archive_path).await?;

        let extract_dir = staging.path().join("extracted");
        std::fs::create_dir_all(&extract_dir)
            .map_err(|error| InstallError::io("create extraction directory", error))?;
        extract_zip(&archive_path, &extract_dir)?;

        let staged_path = staged_root(&extract_dir)?;
        info!("Package staged at {}", staged_path.display());

        // The staged tree outlives this call; the relocation step consumes
        // it and the stale staging dirs are swept on the next install.
        let _ = staging.keep();
        Ok(InstallResult { staged_path })
    }
}

async fn download_archive(
    client: &reqwest::Client,
    package: &PackageRef,
    dest: &Path,
) -> Result<(), InstallError> {
    let mut request = client.get(&package.url);
    for (name, value) in &package.headers {
        request = request.header(*name, value);
    }

    debug!("Downloading package from {}", package.url);
    let response = request.send().await.map_err(|error| InstallError::Download {
        url: package.url.clone(),
        details: error.to_string(),
    })?;

    if !response.status().is_success() {
        return Err(InstallError::DownloadStatus {
            url: package.url.clone(),
            status: response.status().as_u16(),
        });
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|error| InstallError::io("create download file", error))?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|error| InstallError::Download {
            url: package.url.clone(),
            details: error.to_string(),
        })?;
        file.write_all(&chunk)
            .await
            .map_err(|error| InstallError::io("write download data", error))?;
        downloaded += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|error| InstallError::io("flush download file", error))?;

    info!("Download complete: {downloaded} bytes");
    Ok(())
}

fn extract_zip(zip_path: &Path, dest: &Path) -> Result<(), InstallError> {
    let file = std::fs::File::open(zip_path)
        .map_err(|error| InstallError::io("open downloaded archive", error))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|error| InstallError::Archive {
        details: error.to_string(),
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|error| InstallError::Archive {
            details: error.to_string(),
        })?;
        let Some(name) = entry.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path");
            continue;
        };
        let out_path = dest.join(name);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)
                .map_err(|error| InstallError::io("create extracted directory", error))?;
        } else {
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|error| InstallError::io("create extraction parent", error))?;
            }
            let mut outfile = std::fs::File::create(&out_path)
                .map_err(|error| InstallError::io("create extracted file", error))?;
            std::io::copy(&mut entry, &mut outfile)
                .map_err(|error| InstallError::io("extract archive entry", error))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    let _ =
                        std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode));
                }
            }
        }
    }

    debug!("Extraction complete to {}", dest.display());
    Ok(())
}

/// Provider archives wrap their content in a single top-level directory
/// named after the ref; that directory is the staged tree. An archive
/// without that shape stages the extraction directory itself.
fn staged_root(extract_dir: &Path) -> Result<PathBuf, InstallError> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(extract_dir)
        .map_err(|error| InstallError::io("read extraction directory", error))?
    {
        let entry = entry.map_err(|error| InstallError::io("read extraction entry", error))?;
        entries.push(entry.path());
    }

    match entries.as_slice() {
        [single] if single.is_dir() => Ok(single.clone()),
        _ => Ok(extract_dir.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::{extract_zip, staged_root};

    fn write_zip(zip_path: &std::path::Path, entries: &[(&str, Option<&[u8]>)]) {
        let file = std::fs::File::create(zip_path).expect("zip file should be created");
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default().unix_permissions(0o644);
        for (name, content) in entries {
            match content {
                Some(content) => {
                    writer
                        .start_file(*name, options)
                        .expect("file entry should be started");
                    writer
                        .write_all(content)
                        .expect("file entry should be written");
                }
                None => {
                    writer
                        .add_directory(*name, options)
                        .expect("directory entry should be written");
                }
            }
        }
        writer.finish().expect("zip archive should be finalized");
    }

    #[test]
    fn extracts_provider_shaped_archive_and_finds_root() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let zip_path = temp.path().join("package.zip");
        let extract_dir = temp.path().join("extracted");
        std::fs::create_dir_all(&extract_dir).expect("extract dir should be created");

        write_zip(
            &zip_path,
            &[
                ("acme-widget-ab12cd3/", None),
                ("acme-widget-ab12cd3/widget.txt", Some(b"v2")),
                ("acme-widget-ab12cd3/src/lib.rs", Some(b"pub fn run() {}")),
            ],
        );

        extract_zip(&zip_path, &extract_dir).expect("archive should extract");
        let staged = staged_root(&extract_dir).expect("staged root should resolve");

        assert!(staged.ends_with("acme-widget-ab12cd3"));
        assert_eq!(
            std::fs::read(staged.join("widget.txt")).expect("staged file should exist"),
            b"v2"
        );
    }

    #[test]
    fn flat_archive_stages_the_extraction_directory() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let zip_path = temp.path().join("package.zip");
        let extract_dir = temp.path().join("extracted");
        std::fs::create_dir_all(&extract_dir).expect("extract dir should be created");

        write_zip(
            &zip_path,
            &[("a.txt", Some(b"a".as_slice())), ("b.txt", Some(b"b"))],
        );

        extract_zip(&zip_path, &extract_dir).expect("archive should extract");
        let staged = staged_root(&extract_dir).expect("staged root should resolve");
        assert_eq!(staged, extract_dir);
    }

    #[test]
    fn unsafe_entries_are_skipped() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let zip_path = temp.path().join("unsafe.zip");
        let extract_dir = temp.path().join("extracted");
        std::fs::create_dir_all(&extract_dir).expect("extract dir should be created");

        write_zip(&zip_path, &[("../outside.txt", Some(b"nope".as_slice()))]);

        extract_zip(&zip_path, &extract_dir).expect("extraction should not fail");
        assert!(!temp.path().join("outside.txt").exists());
    }
}
