use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    row::Props,
};

/// the ID property name used when neither the command line nor a config file
/// sets one
pub const DEFAULT_ID: &str = "ID";

/// Defaults for a run, loaded from a TOML file. Anything given on the command
/// line takes precedence.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The ID property name.
    pub id: Option<String>,

    /// Properties to extract from the haystack, either as a string of names
    /// separated by commas or spaces, or as an array of names.
    pub props: Option<Props>,

    /// CSV or LST file to write the result to.
    pub output: Option<PathBuf>,

    /// Whether to keep needle IDs that are missing from the haystack.
    pub include_missing: Option<bool>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&s).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })
    }
}
