//! Summary of one generator run

use crate::error::Result;
use crate::spells::{Exclusion, MissingInnate, Selection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What a run found and wrote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Module the tables were loaded for
    pub module: String,
    /// Spells eligible before checking iprp_spells
    pub candidates: usize,
    /// Rows already in iprp_spells
    pub existing_rows: u32,
    /// Spells without an iprp_spells row
    pub missing: Vec<u32>,
    /// Spells skipped for lacking an innate level
    pub warnings: Vec<MissingInnate>,
    /// Rows written to the output file
    pub rows_written: usize,
    /// Output file path
    pub output: PathBuf,
}

impl RunReport {
    pub fn new(
        module: impl Into<String>,
        selection: &Selection,
        exclusion: &Exclusion,
        rows_written: usize,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            module: module.into(),
            candidates: exclusion.candidates_before,
            existing_rows: exclusion.existing_rows,
            missing: exclusion.missing.clone(),
            warnings: selection.warnings.clone(),
            rows_written,
            output: output.into(),
        }
    }

    /// Save the report as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
