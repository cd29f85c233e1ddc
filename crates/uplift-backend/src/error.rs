use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No source repository URL is configured")]
    MissingUrl,

    #[error("Source URL does not point at a supported host: {url}")]
    UnsupportedHost { url: String },

    #[error("Source URL is missing organization/project segments: {url}")]
    MalformedUrl { url: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Release request failed during {operation}: {details}")]
    Request {
        operation: &'static str,
        details: String,
    },

    #[error("Release request timed out during {operation}")]
    Timeout { operation: &'static str },

    #[error("Release endpoint returned HTTP {status}{body_snippet}")]
    Status { status: u16, body_snippet: String },

    #[error("Release response could not be parsed: {details}")]
    MalformedBody { details: String },
}

impl NetworkError {
    pub fn request(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Request {
            operation,
            details: details.into(),
        }
    }

    pub fn request_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::request(operation, error.to_string())
    }

    pub fn malformed_body<E>(error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::MalformedBody {
            details: error.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("No canonical directory name is configured for relocation")]
    MissingDirName,

    #[error("Staged directory does not exist: {path}")]
    MissingStaged { path: String },

    #[error("Staged directory has no usable parent: {path}")]
    NoParent { path: String },

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RelocateError {
    pub fn io(action: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.display().to_string(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Package download failed for {url}: {details}")]
    Download { url: String, details: String },

    #[error("Package download failed with HTTP {status} for {url}")]
    DownloadStatus { url: String, status: u16 },

    #[error("Package archive is invalid: {details}")]
    Archive { details: String },

    #[error("Package staging failed during {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}
