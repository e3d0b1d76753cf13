//! CLI subcommands.

pub mod annotate;
pub mod batch;
pub mod extract;
pub mod import;

use std::path::Path;

use packscan_core::PackscanConfig;

/// Load the config file if one was given, defaults otherwise.
pub(crate) fn load_config(path: Option<&str>) -> anyhow::Result<PackscanConfig> {
    Ok(match path {
        Some(path) => PackscanConfig::from_file(Path::new(path))?,
        None => PackscanConfig::default(),
    })
}
