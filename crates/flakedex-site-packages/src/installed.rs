use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use fs_err as fs;

use flakedex_metadata::Metadata;
use flakedex_normalize::PackageName;

use crate::{EntryPoints, Error};

/// A distribution that is installed in a virtual environment, discovered through its
/// `.dist-info` directory.
///
/// The `.dist-info` contents (`METADATA`, `entry_points.txt`) are read lazily and cached.
/// These are safe to cache as the `InstalledDist` is immutable after creation.
#[derive(Debug, Clone)]
pub struct InstalledDist {
    name: PackageName,
    version: String,
    path: PathBuf,
    metadata_cache: OnceLock<Metadata>,
    entry_points_cache: OnceLock<EntryPoints>,
}

impl InstalledDist {
    /// Try to parse a distribution from a `.dist-info` directory name (like
    /// `flake8_bugbear-24.2.6.dist-info`).
    ///
    /// Returns `Ok(None)` for directory entries that are not dist-info directories.
    ///
    /// See: <https://packaging.python.org/en/latest/specifications/recording-installed-packages/#recording-installed-packages>
    pub fn try_from_path(path: &Path) -> Result<Option<Self>, Error> {
        if !path.extension().is_some_and(|ext| ext == "dist-info") {
            return Ok(None);
        }
        let Some(file_stem) = path.file_stem() else {
            return Ok(None);
        };
        let Some(file_stem) = file_stem.to_str() else {
            return Ok(None);
        };
        let Some((name, version)) = file_stem.split_once('-') else {
            return Ok(None);
        };

        let name = PackageName::from_str(name)?;
        Ok(Some(Self {
            name,
            version: version.to_string(),
            path: path.to_path_buf(),
            metadata_cache: OnceLock::new(),
            entry_points_cache: OnceLock::new(),
        }))
    }

    /// The normalized name of the distribution.
    pub fn name(&self) -> &PackageName {
        &self.name
    }

    /// The version recorded in the `.dist-info` directory name.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The path to the `.dist-info` directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the `METADATA` file of the distribution. Computed at most once per record.
    pub fn read_metadata(&self) -> Result<&Metadata, Error> {
        if let Some(metadata) = self.metadata_cache.get() {
            return Ok(metadata);
        }

        let path = self.path.join("METADATA");
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingMetadata {
                    name: self.name.to_string(),
                    path,
                });
            }
            Err(err) => return Err(err.into()),
        };
        let metadata = Metadata::parse(&contents).map_err(|err| Error::MetadataParse {
            path: path.clone(),
            err: Box::new(err),
        })?;

        Ok(self.metadata_cache.get_or_init(|| metadata))
    }

    /// Read the `entry_points.txt` file of the distribution. Computed at most once per record.
    ///
    /// A distribution without an `entry_points.txt` has no entry points.
    pub fn read_entry_points(&self) -> Result<&EntryPoints, Error> {
        if let Some(entry_points) = self.entry_points_cache.get() {
            return Ok(entry_points);
        }

        let path = self.path.join("entry_points.txt");
        let entry_points = match fs::read_to_string(&path) {
            Ok(contents) => {
                EntryPoints::parse(&contents).map_err(|reason| Error::EntryPointsParse {
                    path: path.clone(),
                    reason,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => EntryPoints::default(),
            Err(err) => return Err(err.into()),
        };

        Ok(self.entry_points_cache.get_or_init(|| entry_points))
    }
}
