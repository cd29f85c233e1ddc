mod cache;
mod installer;
mod logging;
mod manifest;
mod paths;
mod settings;

use std::path::Path;
use std::process::ExitCode;

use log::error;
use serde_json::json;

use uplift_backend::{Installer, NetworkError, ReleaseTransport};
use uplift_core::{load_metadata, strip_version_prefix, CheckOutcome, Relocator, Resolver};
use uplift_github::GithubReleases;

use crate::cache::{CachedTransport, ReleaseCache};
use crate::installer::ZipInstaller;
use crate::manifest::ManifestFile;
use crate::paths::AppPaths;
use crate::settings::Settings;

const USAGE: &str = "Usage: uplift <check|info|diagnose|install> <manifest-file>";

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = Settings::load();
    logging::init_logging(settings.debug_logging);

    let (Some(command), Some(manifest_path)) = (args.first(), args.get(1)) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let resolver = match build_resolver(Path::new(manifest_path), &settings) {
        Ok(resolver) => resolver,
        Err(err) => {
            error!("{err}");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match command.as_str() {
        "check" => run_check(&resolver, &settings).await,
        "info" => run_info(&resolver, &settings).await,
        "diagnose" => run_diagnose(&resolver),
        "install" => run_install(&resolver, &settings).await,
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn build_resolver(
    manifest_path: &Path,
    settings: &Settings,
) -> Result<Resolver, manifest::ManifestError> {
    let manifest = ManifestFile::load(manifest_path)?;
    let metadata = load_metadata(&manifest);
    let repo = settings.repository_for(&metadata);
    Ok(Resolver::new(metadata, repo))
}

fn build_transport(settings: &Settings) -> Result<Box<dyn ReleaseTransport>, NetworkError> {
    let github = GithubReleases::new()?;
    match AppPaths::new() {
        Ok(paths) if paths.ensure_dirs().is_ok() => Ok(Box::new(CachedTransport::new(
            github,
            ReleaseCache::new(paths.release_cache_file(), settings.cache_ttl_hours),
        ))),
        _ => Ok(Box::new(github)),
    }
}

async fn run_check(resolver: &Resolver, settings: &Settings) -> ExitCode {
    let current = strip_version_prefix(&resolver.metadata().installed_version).to_string();
    let outcome = match build_transport(settings) {
        Ok(transport) => resolver.check(transport.as_ref()).await,
        Err(err) => CheckOutcome::CheckFailed {
            reason: err.to_string(),
        },
    };

    let payload = match &outcome {
        CheckOutcome::UpdateAvailable(descriptor) => json!({
            "has_update": true,
            "current_version": descriptor.current_version,
            "latest_version": descriptor.new_version,
            "message": format!(
                "Version {} is available (installed: {})",
                descriptor.new_version, descriptor.current_version
            ),
        }),
        CheckOutcome::UpToDate => json!({
            "has_update": false,
            "current_version": current,
            "latest_version": current,
            "message": "You are running the latest version",
        }),
        CheckOutcome::CheckFailed { reason } => json!({
            "has_update": false,
            "current_version": current,
            "latest_version": serde_json::Value::Null,
            "message": format!("Error checking for updates: {reason}"),
        }),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&payload).unwrap_or_default()
    );
    if matches!(outcome, CheckOutcome::CheckFailed { .. }) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run_info(resolver: &Resolver, settings: &Settings) -> ExitCode {
    let transport = match build_transport(settings) {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("Error fetching artifact details: {err}");
            return ExitCode::FAILURE;
        }
    };

    match resolver.details(transport.as_ref()).await {
        Ok(details) => {
            let payload = json!({
                "slug": details.slug,
                "latest_version": details.latest_version,
                "homepage": details.homepage,
                "author": details.author,
                "last_updated": details.last_updated.map(|ts| ts.to_rfc3339()),
                "changelog": details.changelog,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).unwrap_or_default()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error fetching artifact details: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_diagnose(resolver: &Resolver) -> ExitCode {
    let warnings = resolver.warnings();
    if warnings.is_empty() {
        println!("Update checks are fully configured.");
        return ExitCode::SUCCESS;
    }

    for warning in &warnings {
        println!("{}: {warning}", warning.code());
    }
    ExitCode::FAILURE
}

async fn run_install(resolver: &Resolver, settings: &Settings) -> ExitCode {
    let outcome = match build_transport(settings) {
        Ok(transport) => resolver.check(transport.as_ref()).await,
        Err(err) => CheckOutcome::CheckFailed {
            reason: err.to_string(),
        },
    };

    let descriptor = match outcome {
        CheckOutcome::UpdateAvailable(descriptor) => descriptor,
        CheckOutcome::UpToDate => {
            println!("Already up to date.");
            return ExitCode::SUCCESS;
        }
        CheckOutcome::CheckFailed { reason } => {
            eprintln!("Error checking for updates: {reason}");
            return ExitCode::FAILURE;
        }
    };

    let paths = match AppPaths::new() {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("Install failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = paths.ensure_dirs() {
        eprintln!("Install failed: {err}");
        return ExitCode::FAILURE;
    }

    let zip_installer = match ZipInstaller::new(paths.staging_dir()) {
        Ok(zip_installer) => zip_installer,
        Err(err) => {
            eprintln!("Install failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let result = match zip_installer.install(&descriptor.package).await {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Install failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let relocator = Relocator::new(canonical_dir_name(resolver));
    match relocator.relocate(&result) {
        Ok(final_path) => {
            println!(
                "Installed {} {} at {}",
                descriptor.slug,
                descriptor.new_version,
                final_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Install failed during relocation: {err}");
            ExitCode::FAILURE
        }
    }
}

fn canonical_dir_name(resolver: &Resolver) -> String {
    let metadata = resolver.metadata();
    if !metadata.dir_name.is_empty() {
        metadata.dir_name.clone()
    } else if !metadata.slug.is_empty() {
        metadata.slug.clone()
    } else {
        resolver.repository().project.clone()
    }
}
