use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use fs_err as fs;
use rustc_hash::FxHashMap;
use tracing::warn;

use flakedex_normalize::PackageName;

use crate::{Error, InstalledDist, VirtualEnvironment};

/// An index over the distributions installed in an environment, keyed by normalized name.
#[derive(Debug)]
pub struct SitePackages {
    venv: VirtualEnvironment,
    /// The vector of all installed distributions. The `by_name` index indexes into this vector.
    distributions: Vec<InstalledDist>,
    /// The installed distributions, keyed by name. Although the Python runtime does not support
    /// it, it is possible for multiple distributions with the same name to be present in the
    /// virtual environment, which we handle gracefully.
    by_name: FxHashMap<PackageName, Vec<usize>>,
}

impl SitePackages {
    /// Build an index of installed distributions from the given environment.
    pub fn from_environment(venv: VirtualEnvironment) -> Result<Self, Error> {
        let mut distributions = Vec::new();
        let mut by_name: FxHashMap<PackageName, Vec<usize>> = FxHashMap::default();

        // Collect sorted directory paths; `read_dir` is not stable across platforms.
        let dist_likes: BTreeSet<PathBuf> = fs::read_dir(venv.site_packages())?
            .filter_map(|entry| match entry {
                Ok(entry) => match entry.file_type() {
                    Ok(file_type) => file_type.is_dir().then_some(Ok(entry.path())),
                    Err(err) => Some(Err(err)),
                },
                Err(err) => Some(Err(err)),
            })
            .collect::<Result<_, std::io::Error>>()?;

        for path in dist_likes {
            let dist = match InstalledDist::try_from_path(&path) {
                Ok(Some(dist)) => dist,
                Ok(None) => continue,
                Err(_)
                    if path.file_name().is_some_and(|name| {
                        name.to_str().is_some_and(|name| name.starts_with('~'))
                    }) =>
                {
                    // pip leaves `~`-prefixed directories behind when an install is interrupted.
                    warn!(
                        "Ignoring dangling temporary directory: `{}`",
                        path.display()
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            let idx = distributions.len();
            by_name
                .entry(dist.name().clone())
                .or_default()
                .push(idx);
            distributions.push(dist);
        }

        Ok(Self {
            venv,
            distributions,
            by_name,
        })
    }

    /// The environment the index was built from.
    pub fn environment(&self) -> &VirtualEnvironment {
        &self.venv
    }

    /// The `site-packages` directory the index was built from.
    pub fn directory(&self) -> &Path {
        self.venv.site_packages()
    }

    /// Returns an iterator over the installed distributions.
    pub fn iter(&self) -> impl Iterator<Item = &InstalledDist> {
        self.distributions.iter()
    }

    /// Returns the installed distributions for a given package name.
    pub fn get(&self, name: &PackageName) -> Vec<&InstalledDist> {
        let Some(indexes) = self.by_name.get(name) else {
            return Vec::new();
        };
        indexes
            .iter()
            .map(|&index| &self.distributions[index])
            .collect()
    }

    /// Returns the number of installed distributions.
    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    /// Returns `true` if no distributions are installed.
    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }
}
