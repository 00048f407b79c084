//! iprp-core: Core library for generating missing iprp_spells rows
//!
//! This library provides functionality to:
//! - Load CSV-exported 2DA tables along the NWN2 module/override/install search path
//! - Read settings from `iprp_gen.ini`
//! - Select spells that are castable from items
//! - Drop spells that already have an iprp_spells entry
//! - Derive and write the new iprp_spells rows

pub mod config;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod report;
pub mod resources;
pub mod scanner;
pub mod spells;
pub mod table;

pub use config::{IniFile, Settings, DEFAULT_SETTINGS_FILE};
pub use emitter::{write_rows, IprpSpellRow, RowEmitter};
pub use error::{ConfigError, Error, MissingSetting, ResourceError, Result};
pub use parser::{parse_csv, parse_csv_str};
pub use report::RunReport;
pub use resources::{ResourceManager, ResourceProvider};
pub use scanner::{scan_search_path, ScanResult, SearchPath};
pub use spells::{exclude_existing, select_candidates, Exclusion, MissingInnate, Selection};
pub use table::{CellValue, Column, Row, Table, SENTINEL};

/// Default output file name
pub const DEFAULT_OUTPUT_FILE: &str = "iprp_spells-ADDITION.txt";
