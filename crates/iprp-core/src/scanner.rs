//! Resource search path resolution for CSV-exported 2DA tables

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Ordered list of directories searched for tables; earlier roots win
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    pub roots: Vec<PathBuf>,
}

impl SearchPath {
    /// Build the NWN2 search order for a directory module
    ///
    /// Module content overrides the user override folder, which overrides
    /// the stock game data.
    pub fn for_module(module: &str, home: &Path, install: &Path) -> Self {
        Self {
            roots: vec![
                module_dir(module, home),
                home.join("override"),
                install.join("data"),
            ],
        }
    }
}

/// Directory holding an unpacked module
pub fn module_dir(module: &str, home: &Path) -> PathBuf {
    home.join("modules").join(module)
}

/// Result of scanning the search path
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Resolved table files keyed by lowercase table name
    pub tables: BTreeMap<String, PathBuf>,
}

/// Scan the search path for CSV files; the first root providing a table wins
///
/// Roots that do not exist are skipped.
pub fn scan_search_path(search: &SearchPath) -> Result<ScanResult> {
    let mut tables: BTreeMap<String, PathBuf> = BTreeMap::new();

    for root in &search.roots {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "search root missing, skipped");
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();

            if !path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                let name = stem.to_ascii_lowercase();
                if tables.contains_key(&name) {
                    tracing::debug!(table = %name, path = %path.display(), "shadowed by earlier root");
                    continue;
                }
                tables.insert(name, path.to_path_buf());
            }
        }
    }

    Ok(ScanResult { tables })
}
