use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use fs_err as fs;
use tracing::debug;

use crate::Error;

/// The layout of a virtual environment, resolved from its on-disk structure alone.
///
/// No interpreter is ever executed: the `site-packages` directory is derived from the
/// conventional virtualenv layout (`Lib\site-packages` on Windows, `lib/python3.*/site-packages`
/// elsewhere).
#[derive(Debug, Clone)]
pub struct VirtualEnvironment {
    /// The absolute path to the root of the virtualenv, e.g., `/path/to/.venv`.
    root: PathBuf,
    /// The `site-packages` directory within the virtualenv.
    site_packages: PathBuf,
}

impl VirtualEnvironment {
    /// Locate a virtual environment, preferring an explicit path, then the active environment
    /// (`VIRTUAL_ENV`), then a `.venv` directory in the working directory.
    pub fn find(explicit: Option<&Path>) -> Result<Self, Error> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Some(dir) = env::var_os("VIRTUAL_ENV").filter(|value| !value.is_empty()) {
            debug!("Found active virtual environment (via VIRTUAL_ENV) at: {dir:?}");
            PathBuf::from(dir)
        } else {
            PathBuf::from(".venv")
        };
        Self::from_root(root)
    }

    /// Resolve the layout of the virtual environment rooted at the given path.
    pub fn from_root(root: PathBuf) -> Result<Self, Error> {
        if !root.is_dir() {
            return Err(Error::MissingEnvironment(root));
        }
        if !root.join("pyvenv.cfg").is_file() {
            return Err(Error::MissingPyVenvCfg(root));
        }
        let site_packages = site_packages_dir(&root)?;
        debug!(
            "Using site-packages directory at: {}",
            site_packages.display()
        );
        Ok(Self {
            root,
            site_packages,
        })
    }

    /// The root of the virtualenv.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `site-packages` directory of the virtualenv.
    pub fn site_packages(&self) -> &Path {
        &self.site_packages
    }
}

/// Resolve the `site-packages` directory from the virtualenv layout.
fn site_packages_dir(root: &Path) -> Result<PathBuf, Error> {
    if cfg!(windows) {
        let site_packages = root.join("Lib").join("site-packages");
        if site_packages.is_dir() {
            return Ok(site_packages);
        }
        return Err(Error::MissingSitePackages(root.to_path_buf()));
    }

    // Ex) `lib/python3.12/site-packages`, `lib/pypy3.10/site-packages`
    let lib = root.join("lib");
    let entries = match fs::read_dir(&lib) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingSitePackages(root.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    // Collect sorted candidates; `read_dir` is not stable across platforms.
    let candidates: BTreeSet<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("python") || name.starts_with("pypy"))
        })
        .map(|entry| entry.path().join("site-packages"))
        .filter(|path| path.is_dir())
        .collect();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingSitePackages(root.to_path_buf()))
}
