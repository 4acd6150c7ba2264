//! Parsing for the subset of Python core metadata consumed by the report.
//!
//! The standard file format for metadata (including in wheels and installed projects) is based
//! on the format of email headers, parsed here with the `compat32`-equivalent behavior of
//! `mailparse`.
//!
//! See: <https://packaging.python.org/en/latest/specifications/core-metadata/>

use std::str::FromStr;

use mailparse::{MailHeaderMap, MailParseError};
use thiserror::Error;

use flakedex_normalize::{InvalidNameError, PackageName};

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error(transparent)]
    MailParse(#[from] MailParseError),
    #[error("Metadata field {0} not found")]
    FieldNotFound(&'static str),
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),
}

/// The fields of an installed distribution's `METADATA` file that feed the plugin report.
///
/// Legacy metadata writers record missing values as the literal string `UNKNOWN`; that
/// placeholder is filtered to `None` at parse time and never surfaces past this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// The normalized name of the distribution.
    pub name: PackageName,
    /// A string containing the distribution's version number.
    pub version: String,
    /// A one-line summary of what the distribution does.
    pub summary: Option<String>,
    /// A string containing the URL for the distribution's home page.
    ///
    /// Deprecated by PEP 753, but still the field installed plugins overwhelmingly carry.
    pub home_page: Option<String>,
    /// A string containing the author's name at a minimum; additional contact information may be
    /// provided.
    pub author: Option<String>,
    /// A string containing the maintainer's name at a minimum.
    ///
    /// Note that this field is intended for use when a project is being maintained by someone
    /// other than the original author: it should be omitted if it is identical to `author`.
    pub maintainer: Option<String>,
    /// Text indicating the license covering the distribution.
    pub license: Option<String>,
}

impl Metadata {
    /// Parse the report-relevant fields from a `METADATA` or `PKG-INFO` file.
    pub fn parse(content: &[u8]) -> Result<Self, MetadataError> {
        let headers = Headers::parse(content)?;

        let name = PackageName::from_owned(
            headers
                .get_first_value("Name")
                .ok_or(MetadataError::FieldNotFound("Name"))?,
        )?;
        let version = headers
            .get_first_value("Version")
            .ok_or(MetadataError::FieldNotFound("Version"))?;
        let summary = headers.get_first_value("Summary");
        let home_page = headers.get_first_value("Home-page");
        let author = headers.get_first_value("Author");
        let maintainer = headers.get_first_value("Maintainer");
        let license = headers.get_first_value("License");

        Ok(Self {
            name,
            version,
            summary,
            home_page,
            author,
            maintainer,
            license,
        })
    }
}

impl FromStr for Metadata {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metadata::parse(s.as_bytes())
    }
}

/// The headers of a distribution metadata file.
#[derive(Debug)]
struct Headers<'a>(Vec<mailparse::MailHeader<'a>>);

impl<'a> Headers<'a> {
    /// Parse the headers from the given metadata file content.
    fn parse(content: &'a [u8]) -> Result<Self, MailParseError> {
        let (headers, _) = mailparse::parse_headers(content)?;
        Ok(Self(headers))
    }

    /// Return the first value associated with the header with the given name.
    ///
    /// Header lookup is case-insensitive, so `Home-page` also matches the `Home-Page`
    /// spelling some metadata writers emit.
    fn get_first_value(&self, name: &str) -> Option<String> {
        self.0.get_first_header(name).and_then(|header| {
            let value = header.get_value();
            if value == "UNKNOWN" {
                None
            } else {
                Some(value)
            }
        })
    }
}
