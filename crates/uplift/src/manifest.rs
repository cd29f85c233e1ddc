use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use uplift_backend::MetadataProvider;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A host manifest of `Key: Value` header lines.
///
/// Parsing is lenient: blank lines and `#` comments are skipped, keys and
/// values are trimmed, unknown keys are kept but ignored by the loader,
/// and the first occurrence of a key wins.
pub struct ManifestFile {
    fields: HashMap<String, String>,
}

impl ManifestFile {
    /// Read and parse a manifest file.
    ///
    /// # Errors
    /// Fails only when the file cannot be read; content never errors.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut fields = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                continue;
            }
            fields
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
        Self { fields }
    }
}

impl MetadataProvider for ManifestFile {
    fn get(&self, key: &str) -> Option<String> {
        self.fields.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use uplift_backend::MetadataProvider;
    use uplift_core::{load_metadata, KEY_SOURCE, KEY_VERSION};

    use super::ManifestFile;

    const SAMPLE: &str = "\
# Widget release manifest
Slug: widget
Version: 1.1.5
Source: https://github.com/acme/widget
Tested: 6.4
Author: Acme Co.

Not a header line
";

    #[test]
    fn parses_header_lines_and_skips_noise() {
        let manifest = ManifestFile::parse(SAMPLE);
        assert_eq!(manifest.get(KEY_VERSION).as_deref(), Some("1.1.5"));
        assert_eq!(
            manifest.get(KEY_SOURCE).as_deref(),
            Some("https://github.com/acme/widget")
        );
        assert_eq!(manifest.get("Author").as_deref(), Some("Acme Co."));
        assert_eq!(manifest.get("Not a header line"), None);
    }

    #[test]
    fn first_occurrence_of_a_key_wins() {
        let manifest = ManifestFile::parse("Version: 1.0.0\nVersion: 9.9.9\n");
        assert_eq!(manifest.get("Version").as_deref(), Some("1.0.0"));
    }

    #[test]
    fn value_colons_are_preserved() {
        let manifest = ManifestFile::parse("Source: https://github.com/acme/widget\n");
        assert_eq!(
            manifest.get("Source").as_deref(),
            Some("https://github.com/acme/widget")
        );
    }

    #[test]
    fn feeds_the_metadata_loader() {
        let manifest = ManifestFile::parse(SAMPLE);
        let metadata = load_metadata(&manifest);
        assert_eq!(metadata.installed_version, "1.1.5");
        assert_eq!(metadata.slug, "widget");
        assert_eq!(metadata.dir_name, "");
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let result = ManifestFile::load(&temp.path().join("missing.txt"));
        assert!(result.is_err());
    }
}
