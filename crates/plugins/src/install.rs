//! Package installation: directory scan, archive extraction, registration.

use std::path::{Component, Path, PathBuf};

use tracing::{error, info, warn};

use crate::{
    Error, Result,
    error::Context,
    manifest::PluginManifest,
    registry::{InstalledPlugin, PluginRegistry},
};

/// Install every package found directly under `root` (no recursion).
///
/// The directory is created if absent. A bad package is logged and skipped —
/// it never aborts the scan. Returns the number of successful installs.
pub async fn install_all(root: &Path, registry: &mut PluginRegistry) -> Result<usize> {
    tokio::fs::create_dir_all(root).await?;

    let mut packages = Vec::new();
    let mut dir = tokio::fs::read_dir(root)
        .await
        .with_context(|| format!("scan plugins dir {}", root.display()))?;
    while let Some(entry) = dir.next_entry().await? {
        let path = entry.path();
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if is_file && package_stem(&path).is_some() {
            packages.push(path);
        }
    }
    // Filesystem listing order is platform-dependent; sort for a stable
    // install (and therefore lazy-load) order.
    packages.sort();

    let mut count = 0;
    for path in packages {
        info!(package = %path.display(), "installing plugin");
        match install_package(&path, root).await {
            Ok(plugin) => {
                registry.register(plugin);
                count += 1;
            },
            Err(e) => {
                error!(package = %path.display(), error = %e, "plugin install failed");
            },
        }
    }
    Ok(count)
}

/// Extract one package next to its archive and load its manifest.
async fn install_package(package: &Path, root: &Path) -> Result<InstalledPlugin> {
    let stem = package_stem(package)
        .ok_or_else(|| Error::message(format!("not a plugin package: {}", package.display())))?;
    let target = root.join(stem);

    // Re-extract fresh on every boot.
    if tokio::fs::try_exists(&target).await? {
        tokio::fs::remove_dir_all(&target).await?;
    }
    tokio::fs::create_dir_all(&target).await?;

    extract_tarball(package, &target).await?;

    let manifest = PluginManifest::load(&target).await?;
    Ok(InstalledPlugin::new(manifest, target))
}

/// `foo.tar.gz` / `foo.tgz` → `foo`; anything else is not a package.
fn package_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(".tar.gz")
        .or_else(|| name.strip_suffix(".tgz"))
        .filter(|stem| !stem.is_empty())
}

async fn extract_tarball(package: &Path, target: &Path) -> Result<()> {
    let bytes = tokio::fs::read(package).await?;
    let target_owned = target.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let canonical_target = std::fs::canonicalize(&target_owned)?;
        let decoder = flate2::read::GzDecoder::new(&bytes[..]);
        let mut archive = tar::Archive::new(decoder);

        for entry in archive.entries()? {
            let mut entry = entry?;
            if entry.header().entry_type().is_symlink() || entry.header().entry_type().is_hard_link()
            {
                warn!("skipping symlink/hardlink archive entry");
                continue;
            }

            let path = entry.path()?.into_owned();
            let Some(sanitized) = sanitize_entry_path(&path)? else {
                continue;
            };

            let dest = target_owned.join(&sanitized);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
                let canonical_parent = std::fs::canonicalize(parent)?;
                if !canonical_parent.starts_with(&canonical_target) {
                    return Err(Error::unsafe_archive_path(path.display().to_string()));
                }
            }

            if entry.header().entry_type().is_dir() {
                std::fs::create_dir_all(&dest)?;
                continue;
            }

            entry.unpack(&dest)?;
        }
        Ok(())
    })
    .await
    .map_err(|e| Error::message(format!("extraction task failed: {e}")))?
}

/// Keep normal relative components only; `..`, roots, and prefixes are
/// rejected outright.
fn sanitize_entry_path(path: &Path) -> Result<Option<PathBuf>> {
    if path.as_os_str().is_empty() {
        return Ok(None);
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {},
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::unsafe_archive_path(path.display().to_string()));
            },
        }
    }
    Ok(Some(path.to_path_buf()))
}
