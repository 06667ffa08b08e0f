//! Discover stage composition.
//!
//! Stage 1 of the build pipeline: load the site config, run gallery
//! discovery, parse the markdown pages, and read the data tables, then
//! hand the combined [`Manifest`] to the process stage.
//!
//! Each concern lives in its own module ([`config`](crate::config),
//! [`gallery`](crate::gallery), [`content`](crate::content),
//! [`data`](crate::data)); this module only sequences them and folds
//! their error types into one.

use crate::config::{self, ConfigError};
use crate::content::{self, ContentError};
use crate::data::{self, DataError};
use crate::gallery::{self, DiscoverError};
use crate::manifest::Manifest;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("gallery discovery error: {0}")]
    Gallery(#[from] DiscoverError),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Run the discover stage over a content directory.
pub fn discover(source: &Path) -> Result<Manifest, StageError> {
    let site = config::load_config(source)?;
    let gallery = gallery::discover(source, &site.gallery)?;
    let pages = content::load_pages(source)?;
    let data = data::load_data(source)?;

    Ok(Manifest {
        site,
        gallery,
        pages,
        data,
    })
}
