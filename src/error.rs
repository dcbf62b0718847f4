use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for the DDL reordering pipeline
#[derive(Error, Debug)]
pub enum DdlSortError {
    #[error("Cannot open input file {path:?}: {source}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input file {path:?}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output file {path:?}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cyclic foreign key dependency between tables: {}", .tables.join(", "))]
    CyclicDependency { tables: Vec<String> },

    #[error("Report error: {message}")]
    Report { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DdlSortError {
    pub fn input_open(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::InputOpen { path: path.as_ref().to_path_buf(), source }
    }

    pub fn input_read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::InputRead { path: path.as_ref().to_path_buf(), source }
    }

    pub fn output_create(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::OutputCreate { path: path.as_ref().to_path_buf(), source }
    }

    pub fn output_write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::OutputWrite { path: path.as_ref().to_path_buf(), source }
    }

    pub fn cycle(mut tables: Vec<String>) -> Self {
        tables.sort();
        Self::CyclicDependency { tables }
    }

    pub fn report(message: impl Into<String>) -> Self {
        Self::Report { message: message.into() }
    }

    /// Tables left unresolved by a cycle, if this is a cycle error
    pub fn cyclic_tables(&self) -> Option<&[String]> {
        match self {
            Self::CyclicDependency { tables } => Some(tables),
            _ => None,
        }
    }
}

pub type DdlSortResult<T> = Result<T, DdlSortError>;
