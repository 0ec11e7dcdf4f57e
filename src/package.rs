/*!
 * Installed package descriptors.
 *
 * A package is a directory produced by the package-management layer,
 * holding model artifacts next to a `metadata.json` descriptor. This module
 * only reads descriptors; downloading, installing, and removing packages
 * happens outside this crate.
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::errors::PackageError;
use crate::language_utils;

/// File name of the descriptor inside every package directory
pub const METADATA_FILE: &str = "metadata.json";

/// Kind of capability a package provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Translation model for one language pair
    #[default]
    Translate,
    /// Sentence-boundary-detection model
    Sbd,
    /// Anything else; tolerated in metadata but never consumed here
    #[serde(other)]
    Other,
}

/// Parsed contents of a package's metadata.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Version string of the package itself
    #[serde(default)]
    pub package_version: String,

    /// Source language code
    #[serde(default)]
    pub from_code: Option<String>,

    /// Source language display name
    #[serde(default)]
    pub from_name: Option<String>,

    /// Target language code
    #[serde(default)]
    pub to_code: Option<String>,

    /// Target language display name
    #[serde(default)]
    pub to_name: Option<String>,

    /// Capability kind, defaults to a translation package
    #[serde(rename = "type", default)]
    pub kind: PackageKind,

    /// Decoder prefix the model was trained with, empty when unused
    #[serde(default)]
    pub target_prefix: String,
}

/// An installed package: descriptor plus the directory it lives in
///
/// The directory is an opaque handle for the engine loader; this crate
/// never interprets the model artifacts inside it.
#[derive(Debug, Clone)]
pub struct Package {
    metadata: PackageMetadata,
    package_path: PathBuf,
}

impl Package {
    /// Creates a package from already-parsed metadata
    pub fn new(metadata: PackageMetadata, package_path: PathBuf) -> Self {
        Package {
            metadata,
            package_path,
        }
    }

    /// Reads the descriptor from `package_path/metadata.json`
    pub fn open(package_path: &Path) -> Result<Self, PackageError> {
        let metadata_path = package_path.join(METADATA_FILE);
        let raw = fs::read_to_string(&metadata_path)?;
        let metadata =
            serde_json::from_str(&raw).map_err(|source| PackageError::InvalidMetadata {
                path: package_path.to_path_buf(),
                source,
            })?;

        Ok(Package::new(metadata, package_path.to_path_buf()))
    }

    /// Capability kind of this package
    pub fn kind(&self) -> PackageKind {
        self.metadata.kind
    }

    /// Source language code, if the descriptor carries one
    pub fn from_code(&self) -> Option<&str> {
        self.metadata.from_code.as_deref().filter(|c| !c.is_empty())
    }

    /// Target language code, if the descriptor carries one
    pub fn to_code(&self) -> Option<&str> {
        self.metadata.to_code.as_deref().filter(|c| !c.is_empty())
    }

    /// Source language display name, resolved from the code when absent
    pub fn from_name(&self) -> String {
        self.display_name(self.metadata.from_name.as_deref(), self.from_code())
    }

    /// Target language display name, resolved from the code when absent
    pub fn to_name(&self) -> String {
        self.display_name(self.metadata.to_name.as_deref(), self.to_code())
    }

    /// Decoder prefix, empty when the model does not use one
    pub fn target_prefix(&self) -> &str {
        &self.metadata.target_prefix
    }

    /// Directory holding the model artifacts
    pub fn package_path(&self) -> &Path {
        &self.package_path
    }

    /// Short label for logs and load errors, the package directory name
    pub fn label(&self) -> String {
        self.package_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.package_path.display().to_string())
    }

    fn display_name(&self, name: Option<&str>, code: Option<&str>) -> String {
        match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => code
                .map(language_utils::display_name_or_code)
                .unwrap_or_default(),
        }
    }
}

/// Scans the packages directory for installed packages
///
/// Each package is a directory containing `metadata.json`. Unreadable or
/// invalid descriptors are logged and skipped so one broken package cannot
/// hide the rest. Results are in sorted path order, which keeps graph
/// builds reproducible across runs.
pub fn installed_packages(packages_dir: &Path) -> Vec<Package> {
    if !packages_dir.is_dir() {
        debug!(
            "Packages directory {} does not exist, no packages installed",
            packages_dir.display()
        );
        return Vec::new();
    }

    let mut packages = Vec::new();
    let walker = WalkDir::new(packages_dir)
        .max_depth(2)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("Skipping unreadable entry under {}: {}", packages_dir.display(), error);
                continue;
            }
        };

        if !entry.file_type().is_file() || entry.file_name() != METADATA_FILE {
            continue;
        }

        let Some(package_dir) = entry.path().parent() else {
            continue;
        };

        match Package::open(package_dir) {
            Ok(package) => {
                debug!(
                    "Found package {} ({:?}, {} -> {})",
                    package.label(),
                    package.kind(),
                    package.from_code().unwrap_or("?"),
                    package.to_code().unwrap_or("?")
                );
                packages.push(package);
            }
            Err(error) => {
                warn!("Skipping package at {}: {}", package_dir.display(), error);
            }
        }
    }

    packages
}
