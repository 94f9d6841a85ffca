use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("{}: unexpected end of file after property header on line {line}", path.display())]
    UnexpectedEof { path: PathBuf, line: usize },

    #[error("Conflicting property name: {prop} (molecule {mol})")]
    ConflictingProperty { prop: String, mol: String },

    #[error("ID mismatch: {found} != {mol}")]
    IdMismatch { found: String, mol: String },

    #[error("{}: duplicate ID {id}", path.display())]
    DuplicateId { path: PathBuf, id: String },

    #[error("failed to load config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("the ID property name must not be empty")]
    EmptyId,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
