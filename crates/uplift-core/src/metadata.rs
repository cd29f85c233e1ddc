use uplift_backend::{ArtifactMetadata, MetadataProvider};

pub const KEY_VERSION: &str = "Version";
pub const KEY_SOURCE: &str = "Source";
pub const KEY_TESTED: &str = "Tested";
pub const KEY_SLUG: &str = "Slug";
pub const KEY_DIRECTORY: &str = "Directory";

/// Load the artifact's declared metadata from the host manifest.
///
/// Fails soft: any missing key becomes an empty string so that downstream
/// components can treat it as "not configured" instead of erroring.
pub fn load_metadata(provider: &dyn MetadataProvider) -> ArtifactMetadata {
    let field = |key: &str| {
        provider
            .get(key)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    ArtifactMetadata {
        installed_version: field(KEY_VERSION),
        source_url: field(KEY_SOURCE),
        tested_up_to: field(KEY_TESTED),
        slug: field(KEY_SLUG),
        dir_name: field(KEY_DIRECTORY),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn manifest(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn loads_declared_fields() {
        let provider = manifest(&[
            (KEY_VERSION, "1.1.5"),
            (KEY_SOURCE, "https://github.com/acme/widget"),
            (KEY_TESTED, "6.4"),
            (KEY_SLUG, "widget"),
            (KEY_DIRECTORY, "widget"),
        ]);

        let metadata = load_metadata(&provider);
        assert_eq!(metadata.installed_version, "1.1.5");
        assert_eq!(metadata.source_url, "https://github.com/acme/widget");
        assert_eq!(metadata.tested_up_to, "6.4");
        assert_eq!(metadata.slug, "widget");
        assert_eq!(metadata.dir_name, "widget");
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let provider = manifest(&[(KEY_VERSION, "1.0.0")]);

        let metadata = load_metadata(&provider);
        assert_eq!(metadata.installed_version, "1.0.0");
        assert_eq!(metadata.source_url, "");
        assert_eq!(metadata.slug, "");
    }

    #[test]
    fn values_are_trimmed() {
        let provider = manifest(&[(KEY_VERSION, "  1.0.0  ")]);
        assert_eq!(load_metadata(&provider).installed_version, "1.0.0");
    }
}
