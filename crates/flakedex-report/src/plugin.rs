use std::path::PathBuf;
use std::sync::OnceLock;

use flakedex_metadata::Metadata;
use flakedex_normalize::PackageName;
use flakedex_site_packages::InstalledDist;

use crate::Error;

/// A display-ready view of one installed plugin.
///
/// Wraps an [`InstalledDist`] and derives the fields the report renders. Derived fields are
/// pure functions of the distribution's metadata and are computed at most once per record;
/// the fetches behind them (the `METADATA` read, the code extraction) run on first access and
/// are cached for the record's lifetime.
#[derive(Debug)]
pub struct Plugin {
    dist: InstalledDist,
    site_packages: PathBuf,
    url: OnceLock<String>,
    short_url: OnceLock<String>,
    codes: OnceLock<Vec<(String, String)>>,
}

impl Plugin {
    /// Wrap an installed distribution. No metadata is read until a derived field is accessed.
    pub fn new(dist: InstalledDist, site_packages: impl Into<PathBuf>) -> Self {
        Self {
            dist,
            site_packages: site_packages.into(),
            url: OnceLock::new(),
            short_url: OnceLock::new(),
            codes: OnceLock::new(),
        }
    }

    /// The normalized name of the plugin. The sort key of the report.
    pub fn name(&self) -> &PackageName {
        self.dist.name()
    }

    fn metadata(&self) -> Result<&Metadata, Error> {
        Ok(self.dist.read_metadata()?)
    }

    /// The project URL: the declared home page, or the package-index project page when the
    /// home page is absent.
    pub fn url(&self) -> Result<&str, Error> {
        if let Some(url) = self.url.get() {
            return Ok(url);
        }
        let url = match &self.metadata()?.home_page {
            Some(home_page) => home_page.clone(),
            None => format!("https://pypi.org/project/{}", self.name()),
        };
        Ok(self.url.get_or_init(|| url))
    }

    /// The project URL with the scheme, a leading `github.com/`, and a trailing slash
    /// stripped, for compact display.
    pub fn short_url(&self) -> Result<&str, Error> {
        if let Some(short_url) = self.short_url.get() {
            return Ok(short_url);
        }
        let stripped = strip_url(self.url()?);
        Ok(self.short_url.get_or_init(|| stripped))
    }

    /// The declared license, if any.
    pub fn license(&self) -> Result<Option<&str>, Error> {
        Ok(self.metadata()?.license.as_deref())
    }

    /// The declared author, falling back to the maintainer.
    pub fn author(&self) -> Result<Option<&str>, Error> {
        let metadata = self.metadata()?;
        Ok(metadata.author.as_deref().or(metadata.maintainer.as_deref()))
    }

    /// The declared version.
    pub fn version(&self) -> Result<&str, Error> {
        Ok(&self.metadata()?.version)
    }

    /// The declared one-line summary, if any.
    pub fn summary(&self) -> Result<Option<&str>, Error> {
        Ok(self.metadata()?.summary.as_deref())
    }

    /// The diagnostic codes the plugin defines, with their descriptions, ascending by code.
    /// Extracted once and cached for the record's lifetime.
    pub fn codes(&self) -> Result<&[(String, String)], Error> {
        if let Some(codes) = self.codes.get() {
            return Ok(codes);
        }
        let table = flakedex_codes::extract(&self.dist, &self.site_packages)?;
        let codes = table.into_iter().collect::<Vec<_>>();
        Ok(self.codes.get_or_init(|| codes))
    }
}

/// Strip, in order, the `http://`, `https://`, and `github.com/` prefixes and a trailing `/`.
/// Each strip is a no-op when the affix is absent, and the whole chain is idempotent.
fn strip_url(url: &str) -> String {
    let url = url.strip_prefix("http://").unwrap_or(url);
    let url = url.strip_prefix("https://").unwrap_or(url);
    let url = url.strip_prefix("github.com/").unwrap_or(url);
    let url = url.strip_suffix('/').unwrap_or(url);
    url.to_string()
}
