//! Error types for iprp-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in iprp-core
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file missing, malformed or incomplete
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Game resources could not be loaded or read
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// IO error while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for settings problems, which are raised before any resource is touched
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Error::Resource(_))
    }
}

/// Problems with the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file
    #[error("failed to read settings '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// INI syntax error
    #[error("malformed settings: {0}")]
    Malformed(#[source] ini::ParseError),

    /// Required key not set
    #[error("{0}")]
    Missing(MissingSetting),

    /// Configured directory does not exist
    #[error("{what} location does not exist.")]
    PathNotFound { what: &'static str, path: PathBuf },
}

/// Required settings, in the order they are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSetting {
    Module,
    Nwn2Install,
    Nwn2Home,
}

impl MissingSetting {
    /// The flattened `section.key` name
    pub fn key(&self) -> &'static str {
        match self {
            MissingSetting::Module => "settings.module",
            MissingSetting::Nwn2Install => "paths.nwn2-install",
            MissingSetting::Nwn2Home => "paths.nwn2-home",
        }
    }
}

impl std::fmt::Display for MissingSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingSetting::Module => write!(f, "Module not set."),
            MissingSetting::Nwn2Install => write!(f, "NWN2 install location not set."),
            MissingSetting::Nwn2Home => write!(f, "NWN2 home location not set."),
        }
    }
}

/// Problems loading or reading 2DA resources
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Module directory not found under the home path
    #[error("module '{module}' not found at {}", path.display())]
    ModuleNotFound { module: String, path: PathBuf },

    /// Table not present in any search root
    #[error("2DA table '{0}' not found")]
    TableNotFound(String),

    /// Column missing from a table
    #[error("column '{column}' not found in '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Row index past the end of a table
    #[error("row {row} out of range in '{table}' ({count} rows)")]
    RowOutOfRange { table: String, row: u32, count: u32 },

    /// Cell cannot be read as the requested type
    #[error("'{table}' row {row} column '{column}': cannot read '{value}' as {expected}")]
    InvalidValue {
        table: String,
        column: String,
        row: u32,
        value: String,
        expected: &'static str,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Resource(ResourceError::WalkDir(err))
    }
}
