use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading authored tour data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {what}: {source}")]
    Syntax {
        what: &'static str,
        #[source]
        source: json5::Error,
    },

    #[error("duplicate container id `{0}`")]
    DuplicateContainer(String),

    #[error("duplicate connection id `{0}`")]
    DuplicateConnection(String),

    #[error("customer catalog is empty")]
    EmptyCatalog,

    #[error("unknown customer key `{0}`")]
    UnknownCustomer(String),
}

impl LoadError {
    pub(crate) fn syntax(what: &'static str, source: json5::Error) -> Self {
        Self::Syntax { what, source }
    }
}
