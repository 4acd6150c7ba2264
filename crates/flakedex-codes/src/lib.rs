//! Extraction of the diagnostic codes declared by installed flake8 plugins.
//!
//! flake8 plugins register the code prefixes they own as entry names in the
//! `flake8.extension` entry-point group; the messages themselves conventionally live in the
//! plugin sources as string literals of the form `"B001 message"`. Extraction resolves the
//! registered modules to their installed sources and collects every code-message literal
//! matching a registered prefix.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use fs_err as fs;
use regex::Regex;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use flakedex_normalize::PackageName;
use flakedex_site_packages::InstalledDist;

/// The entry-point group in which flake8 plugins register their checks, keyed by code prefix.
pub const EXTENSION_GROUP: &str = "flake8.extension";

/// The entry-point group in which flake8 plugins register report formatters.
pub const REPORT_GROUP: &str = "flake8.report";

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    SitePackages(#[from] flakedex_site_packages::Error),

    #[error("Failed to locate module `{module}` registered by `{package}`")]
    ModuleNotFound { module: String, package: PackageName },
}

/// Returns `true` if the distribution registers itself with flake8, either as a checker or as
/// a report formatter.
pub fn is_plugin(dist: &InstalledDist) -> Result<bool, Error> {
    let entry_points = dist.read_entry_points()?;
    Ok(entry_points.has_group(EXTENSION_GROUP) || entry_points.has_group(REPORT_GROUP))
}

/// Extract the diagnostic-code table of an installed plugin, ordered ascending by code.
///
/// Plugins that declare no checks (report formatters) have an empty table. A plugin whose
/// registered modules cannot be found on disk is an error: the environment is inconsistent,
/// and the report must not silently omit codes.
pub fn extract(
    dist: &InstalledDist,
    site_packages: &Path,
) -> Result<BTreeMap<String, String>, Error> {
    let entry_points = dist.read_entry_points()?;
    let extensions = entry_points.group(EXTENSION_GROUP);
    if extensions.is_empty() {
        return Ok(BTreeMap::new());
    }

    // Entry names in the extension group are the code prefixes the plugin owns (e.g. `B`,
    // `SIM`, `C4`). Entries with non-prefix names register option handlers and the like.
    static PREFIX_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Z]{1,3}[0-9]{0,4}$").unwrap());

    let prefixes: BTreeSet<&str> = extensions
        .iter()
        .map(|entry| entry.name.as_str())
        .filter(|name| PREFIX_REGEX.is_match(name))
        .collect();
    let modules: BTreeSet<&str> = extensions
        .iter()
        .map(|entry| entry.module.as_str())
        .collect();

    let mut table = BTreeMap::new();
    for module in modules {
        let Some(source) = resolve_module(site_packages, module) else {
            return Err(Error::ModuleNotFound {
                module: module.to_string(),
                package: dist.name().clone(),
            });
        };
        for file in source.files()? {
            scan_file(&file, &prefixes, &mut table)?;
        }
    }

    debug!(
        "Extracted {} codes from `{}`",
        table.len(),
        dist.name()
    );
    Ok(table)
}

/// The installed source location of a registered module.
enum ModuleSource {
    /// A single-file module, e.g. `site-packages/bugbear.py`.
    File(PathBuf),
    /// A package directory, e.g. `site-packages/flake8_simplify/`.
    Package(PathBuf),
}

impl ModuleSource {
    /// The Python source files belonging to the module, in stable order.
    fn files(&self) -> Result<Vec<PathBuf>, Error> {
        match self {
            Self::File(path) => Ok(vec![path.clone()]),
            Self::Package(path) => {
                let mut files = Vec::new();
                for entry in WalkDir::new(path).sort_by_file_name() {
                    let entry = entry?;
                    if entry.file_type().is_file()
                        && entry.path().extension().is_some_and(|ext| ext == "py")
                    {
                        files.push(entry.into_path());
                    }
                }
                Ok(files)
            }
        }
    }
}

/// Resolve a dotted module path against the `site-packages` directory, falling back to the
/// top-level package when the submodule itself is not found on disk.
fn resolve_module(site_packages: &Path, module: &str) -> Option<ModuleSource> {
    let relative: PathBuf = module.split('.').collect();
    let candidates = [
        relative.clone(),
        PathBuf::from(module.split('.').next().unwrap_or(module)),
    ];
    for candidate in candidates {
        let path = site_packages.join(&candidate);
        if path.is_dir() {
            return Some(ModuleSource::Package(path));
        }
        let file = path.with_extension("py");
        if file.is_file() {
            return Some(ModuleSource::File(file));
        }
    }
    None
}

/// Collect `"CODE message"` string literals matching one of the registered prefixes.
///
/// The first description seen for a code wins; files are visited in stable order, so the
/// result is deterministic.
fn scan_file(
    path: &Path,
    prefixes: &BTreeSet<&str>,
    table: &mut BTreeMap<String, String>,
) -> Result<(), Error> {
    static LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"["']([A-Z]{1,3}[0-9]{1,4})[:,]?\s+([^"'\n]+)["']"#).unwrap()
    });

    let contents = fs::read(path)?;
    let contents = String::from_utf8_lossy(&contents);

    for captures in LITERAL_REGEX.captures_iter(&contents) {
        let code = &captures[1];
        if !prefixes.iter().any(|prefix| code.starts_with(prefix)) {
            continue;
        }
        table
            .entry(code.to_string())
            .or_insert_with(|| captures[2].trim().to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests;
