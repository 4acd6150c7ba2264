//! Read-only access to a Python environment: locating the environment itself, and
//! enumerating the distributions installed into its `site-packages` directory.

use std::path::PathBuf;

use thiserror::Error;

pub use entry_points::{EntryPoint, EntryPoints};
pub use installed::InstalledDist;
pub use site_packages::SitePackages;
pub use virtualenv::VirtualEnvironment;

mod entry_points;
mod installed;
mod site_packages;
mod virtualenv;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    InvalidName(#[from] flakedex_normalize::InvalidNameError),

    #[error("No virtual environment found at `{}`", _0.display())]
    MissingEnvironment(PathBuf),

    #[error("Broken virtual environment `{}`: `pyvenv.cfg` is missing", _0.display())]
    MissingPyVenvCfg(PathBuf),

    #[error("Broken virtual environment `{}`: no `site-packages` directory", _0.display())]
    MissingSitePackages(PathBuf),

    #[error("Distribution `{name}` has no `METADATA` file: `{}`", path.display())]
    MissingMetadata { name: String, path: PathBuf },

    #[error("Failed to parse `METADATA` file: `{}`", path.display())]
    MetadataParse {
        path: PathBuf,
        #[source]
        err: Box<flakedex_metadata::MetadataError>,
    },

    #[error("Failed to parse `entry_points.txt`: `{}`: {reason}", path.display())]
    EntryPointsParse { path: PathBuf, reason: String },
}
