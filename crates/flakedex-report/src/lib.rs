//! Display-ready plugin metadata records and the HTML report renderer.

use thiserror::Error;

pub use html::render;
pub use plugin::Plugin;

mod html;
mod plugin;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    SitePackages(#[from] flakedex_site_packages::Error),

    #[error(transparent)]
    Codes(#[from] flakedex_codes::Error),
}
