use std::path::{Path, PathBuf};

use log::{info, warn};
use uplift_backend::{InstallResult, RelocateError};

/// Moves the extracted update tree from its provider-named staging
/// directory (for example `widget-abc123`) to the artifact's canonical
/// directory name.
///
/// The move is replace-never-merge: any pre-existing tree at the final
/// path is renamed aside first and restored if the move fails, so the
/// install path ends either untouched or fully replaced.
#[derive(Debug, Clone)]
pub struct Relocator {
    dir_name: String,
}

impl Relocator {
    #[must_use]
    pub fn new(dir_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
        }
    }

    /// Relocate the staged tree next to itself under the canonical name.
    ///
    /// # Errors
    /// Fails when no directory name is configured, the staged directory is
    /// missing, or a filesystem operation fails. A failed move restores
    /// the previous install before returning the error.
    pub fn relocate(&self, result: &InstallResult) -> Result<PathBuf, RelocateError> {
        if self.dir_name.is_empty() {
            return Err(RelocateError::MissingDirName);
        }

        let staged = result.staged_path.as_path();
        if !staged.is_dir() {
            return Err(RelocateError::MissingStaged {
                path: staged.display().to_string(),
            });
        }

        let parent = staged
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or_else(|| RelocateError::NoParent {
                path: staged.display().to_string(),
            })?;
        let final_path = parent.join(&self.dir_name);

        if final_path == staged {
            info!("Staged tree already carries its canonical name: {}", final_path.display());
            return Ok(final_path);
        }

        let backup = parent.join(format!("{}.previous", self.dir_name));
        let had_previous = final_path.exists();
        if had_previous {
            if backup.exists() {
                std::fs::remove_dir_all(&backup)
                    .map_err(|error| RelocateError::io("remove stale backup", &backup, error))?;
            }
            std::fs::rename(&final_path, &backup).map_err(|error| {
                RelocateError::io("move previous install aside", &final_path, error)
            })?;
        }

        match move_dir(staged, &final_path) {
            Ok(()) => {
                if had_previous {
                    let _ = std::fs::remove_dir_all(&backup);
                }
                info!(
                    "Relocated {} -> {}",
                    staged.display(),
                    final_path.display()
                );
                Ok(final_path)
            }
            Err(error) => {
                if had_previous {
                    warn!("Relocation failed, restoring previous install: {error}");
                    let _ = std::fs::rename(&backup, &final_path);
                }
                Err(error)
            }
        }
    }
}

fn move_dir(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    if std::fs::rename(src, dest).is_ok() {
        return Ok(());
    }

    // Cross-device staging area: fall back to copy + remove.
    copy_dir_recursive(src, dest)?;
    std::fs::remove_dir_all(src)
        .map_err(|error| RelocateError::io("clean up staged directory", src, error))
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    std::fs::create_dir_all(dest)
        .map_err(|error| RelocateError::io("create directory", dest, error))?;

    for entry in
        std::fs::read_dir(src).map_err(|error| RelocateError::io("read directory", src, error))?
    {
        let entry =
            entry.map_err(|error| RelocateError::io("read directory entry", src, error))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            std::fs::copy(&src_path, &dest_path)
                .map_err(|error| RelocateError::io("copy file", &src_path, error))?;
        }
    }
    Ok(())
}
