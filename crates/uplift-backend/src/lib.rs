mod error;
mod traits;
mod types;

pub use error::{ConfigError, InstallError, NetworkError, RelocateError};
pub use traits::{Installer, MetadataProvider, ReleaseTransport};
pub use types::{
    ArtifactMetadata, AssetRef, InstallResult, PackageRef, ReleaseInfo, RepositoryRef,
    HOSTING_DOMAIN,
};
