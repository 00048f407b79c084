//! Access to 2DA tables and talk strings
//!
//! [`ResourceProvider`] is the capability the spell generator consumes.
//! [`ResourceManager`] implements it over an in-memory cache that is filled
//! either directly with [`ResourceManager::insert_table`] or from disk with
//! [`ResourceProvider::load_module`].

use crate::error::{Error, ResourceError, Result};
use crate::parser::parse_csv;
use crate::scanner::{module_dir, scan_search_path, SearchPath};
use crate::table::{CellValue, Table, SENTINEL};
use std::collections::HashMap;
use std::path::Path;

/// Table holding the stock talk strings, one row per strref
pub const DIALOG_TABLE: &str = "dialog";
/// Table holding the module's custom talk strings
pub const CUSTOM_TALK_TABLE: &str = "custom";
/// Column holding talk string text
pub const TALK_TEXT_COLUMN: &str = "Text";
/// Strref bit selecting the custom talk table
pub const CUSTOM_TALK_FLAG: u32 = 0x0100_0000;

/// Tables that must be present after a module load
pub const REQUIRED_TABLES: [&str; 2] = ["spells", "iprp_spells"];

/// Read access to game tables
pub trait ResourceProvider {
    /// Load a module's resources given the NWN2 home and install paths
    fn load_module(&mut self, module: &str, home: &Path, install: &Path) -> Result<()>;

    /// Number of rows in a table
    fn row_count(&self, table: &str) -> Result<u32>;

    /// Cell text exactly as stored; empty cells read as `****`
    fn get_string(&self, table: &str, column: &str, row: u32) -> Result<String>;

    /// Cell as an unsigned integer
    fn get_uint(&self, table: &str, column: &str, row: u32) -> Result<u32>;

    /// Cell as a flag: non-zero is true, `0` and `****` are false
    fn get_bool(&self, table: &str, column: &str, row: u32) -> Result<bool>;

    /// Resolve a talk string reference; unknown references give an empty string
    fn talk_string(&self, strref: u32) -> Result<String>;
}

/// In-memory table cache
#[derive(Debug, Default)]
pub struct ResourceManager {
    tables: HashMap<String, Table>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table under a case-insensitive name
    pub fn insert_table(&mut self, name: &str, table: Table) {
        self.tables.insert(name.to_ascii_lowercase(), table);
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(&name.to_ascii_lowercase())
    }

    fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| ResourceError::TableNotFound(name.to_string()).into())
    }

    fn cell(&self, table: &str, column: &str, row: u32) -> Result<&CellValue> {
        let t = self.table(table)?;
        let col = t
            .find_column(column)
            .ok_or_else(|| ResourceError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            })?;

        t.cell(row as usize, col.index).ok_or_else(|| {
            ResourceError::RowOutOfRange {
                table: table.to_string(),
                row,
                count: t.row_count() as u32,
            }
            .into()
        })
    }

    /// A talk table that is absent, a strref past its end and a `****`
    /// entry all resolve to an empty string
    fn lookup_talk(&self, table: &str, index: u32) -> Result<String> {
        if !self.has_table(table) {
            return Ok(String::new());
        }
        match self.get_string(table, TALK_TEXT_COLUMN, index) {
            Ok(text) if text == SENTINEL => Ok(String::new()),
            Ok(text) => Ok(text),
            Err(Error::Resource(ResourceError::RowOutOfRange { .. })) => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}

fn invalid(
    table: &str,
    column: &str,
    row: u32,
    cell: &CellValue,
    expected: &'static str,
) -> ResourceError {
    ResourceError::InvalidValue {
        table: table.to_string(),
        column: column.to_string(),
        row,
        value: cell.to_2da_string(),
        expected,
    }
}

impl ResourceProvider for ResourceManager {
    fn load_module(&mut self, module: &str, home: &Path, install: &Path) -> Result<()> {
        let dir = module_dir(module, home);
        if !dir.is_dir() {
            return Err(ResourceError::ModuleNotFound {
                module: module.to_string(),
                path: dir,
            }
            .into());
        }

        let search = SearchPath::for_module(module, home, install);
        for root in &search.roots {
            tracing::info!(root = %root.display(), "search root");
        }

        let scan = scan_search_path(&search)?;
        for (name, path) in &scan.tables {
            let table = parse_csv(path)?;
            tracing::info!(
                table = %name,
                rows = table.row_count(),
                path = %path.display(),
                "loaded table"
            );
            self.tables.insert(name.clone(), table);
        }

        for required in REQUIRED_TABLES {
            if !self.has_table(required) {
                return Err(ResourceError::TableNotFound(required.to_string()).into());
            }
        }

        Ok(())
    }

    fn row_count(&self, table: &str) -> Result<u32> {
        Ok(self.table(table)?.row_count() as u32)
    }

    fn get_string(&self, table: &str, column: &str, row: u32) -> Result<String> {
        Ok(self.cell(table, column, row)?.to_2da_string())
    }

    fn get_uint(&self, table: &str, column: &str, row: u32) -> Result<u32> {
        let cell = self.cell(table, column, row)?;
        cell.as_integer()
            .and_then(|i| u32::try_from(i).ok())
            .ok_or_else(|| invalid(table, column, row, cell, "unsigned integer").into())
    }

    fn get_bool(&self, table: &str, column: &str, row: u32) -> Result<bool> {
        let cell = self.cell(table, column, row)?;
        if cell.is_sentinel() {
            return Ok(false);
        }
        cell.as_integer()
            .map(|i| i != 0)
            .ok_or_else(|| invalid(table, column, row, cell, "boolean").into())
    }

    fn talk_string(&self, strref: u32) -> Result<String> {
        if strref & CUSTOM_TALK_FLAG != 0 {
            self.lookup_talk(CUSTOM_TALK_TABLE, strref & !CUSTOM_TALK_FLAG)
        } else {
            self.lookup_talk(DIALOG_TABLE, strref)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;
    use std::fs;

    fn manager() -> ResourceManager {
        let mut resources = ResourceManager::new();
        resources.insert_table(
            "spells",
            parse_csv_str(
                "ID,Label,Name,Innate,REMOVED\n0,Acid_Fog,100,6,0\n1,Aid,****,****,1\n2,Bless\n3,Bad,-5,x,yes\n",
                "spells.csv",
            )
            .unwrap(),
        );
        resources.insert_table(
            "dialog",
            parse_csv_str("ID,Text\n0,Bad Strref\n1,****\n2,Acid Fog\n", "dialog.csv").unwrap(),
        );
        resources.insert_table(
            "custom",
            parse_csv_str("ID,Text\n0,Custom Spell\n", "custom.csv").unwrap(),
        );
        resources
    }

    #[test]
    fn test_row_count() {
        let resources = manager();
        assert_eq!(resources.row_count("spells").unwrap(), 4);
        assert_eq!(resources.row_count("SPELLS").unwrap(), 4);
        assert!(resources.row_count("feat").unwrap_err().is_resource());
    }

    #[test]
    fn test_get_string() {
        let resources = manager();
        assert_eq!(resources.get_string("spells", "Label", 0).unwrap(), "Acid_Fog");
        assert_eq!(resources.get_string("spells", "name", 1).unwrap(), "****");
        // padded cell
        assert_eq!(resources.get_string("spells", "Innate", 2).unwrap(), "****");
    }

    #[test]
    fn test_get_string_errors() {
        let resources = manager();
        let err = resources.get_string("spells", "FeatID", 0).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Resource(ResourceError::ColumnNotFound { .. })
        ));

        let err = resources.get_string("spells", "Label", 9).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Resource(ResourceError::RowOutOfRange { row: 9, count: 4, .. })
        ));
    }

    #[test]
    fn test_get_uint() {
        let resources = manager();
        assert_eq!(resources.get_uint("spells", "Innate", 0).unwrap(), 6);
        assert!(resources.get_uint("spells", "Innate", 1).is_err());
        assert!(resources.get_uint("spells", "Name", 3).is_err());
    }

    #[test]
    fn test_get_bool() {
        let resources = manager();
        assert!(!resources.get_bool("spells", "REMOVED", 0).unwrap());
        assert!(resources.get_bool("spells", "REMOVED", 1).unwrap());
        assert!(!resources.get_bool("spells", "REMOVED", 2).unwrap());
        assert!(resources.get_bool("spells", "REMOVED", 3).is_err());
    }

    #[test]
    fn test_talk_string() {
        let resources = manager();
        assert_eq!(resources.talk_string(2).unwrap(), "Acid Fog");
        assert_eq!(resources.talk_string(1).unwrap(), "");
        assert_eq!(resources.talk_string(500).unwrap(), "");
        assert_eq!(resources.talk_string(CUSTOM_TALK_FLAG).unwrap(), "Custom Spell");
    }

    #[test]
    fn test_talk_string_requires_text_column() {
        let mut resources = ResourceManager::new();
        resources.insert_table(
            "dialog",
            parse_csv_str("ID,String\n0,Acid Fog\n", "dialog.csv").unwrap(),
        );

        let err = resources.talk_string(0).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Resource(ResourceError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_get_string_returns_cell_text_verbatim() {
        let mut resources = ResourceManager::new();
        resources.insert_table(
            "spells",
            parse_csv_str(
                "ID,Label,Name,IconResRef,FeatID\n0,1e3,007,Infinity, ****\n",
                "spells.csv",
            )
            .unwrap(),
        );

        assert_eq!(resources.get_string("spells", "Label", 0).unwrap(), "1e3");
        assert_eq!(resources.get_string("spells", "Name", 0).unwrap(), "007");
        assert_eq!(resources.get_string("spells", "IconResRef", 0).unwrap(), "Infinity");
        assert_eq!(resources.get_string("spells", "FeatID", 0).unwrap(), " ****");
        assert_eq!(resources.get_uint("spells", "Name", 0).unwrap(), 7);
        assert!(resources.get_uint("spells", "Label", 0).is_err());
        assert!(resources.get_bool("spells", "FeatID", 0).is_err());
    }

    #[test]
    fn test_talk_string_without_tables() {
        let resources = ResourceManager::new();
        assert_eq!(resources.talk_string(0).unwrap(), "");
    }

    #[test]
    fn test_load_module_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let install = dir.path().join("install");
        let module = home.join("modules").join("testmod");
        fs::create_dir_all(&module).unwrap();
        fs::create_dir_all(home.join("override")).unwrap();
        fs::create_dir_all(install.join("data")).unwrap();

        fs::write(module.join("spells.csv"), "ID,Label\n0,ModuleSpell\n").unwrap();
        fs::write(home.join("override").join("spells.csv"), "ID,Label\n0,OverrideSpell\n").unwrap();
        fs::write(install.join("data").join("iprp_spells.csv"), "ID,SpellIndex\n0,0\n1,1\n").unwrap();

        let mut resources = ResourceManager::new();
        resources.load_module("testmod", &home, &install).unwrap();

        assert_eq!(resources.get_string("spells", "Label", 0).unwrap(), "ModuleSpell");
        assert_eq!(resources.row_count("iprp_spells").unwrap(), 2);
    }

    #[test]
    fn test_load_module_missing_module() {
        let dir = tempfile::tempdir().unwrap();
        let mut resources = ResourceManager::new();
        let err = resources
            .load_module("nope", dir.path(), dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Resource(ResourceError::ModuleNotFound { .. })
        ));
    }

    #[test]
    fn test_load_module_missing_required_table() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("modules").join("testmod");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join("spells.csv"), "ID,Label\n0,Only\n").unwrap();

        let mut resources = ResourceManager::new();
        let err = resources
            .load_module("testmod", dir.path(), dir.path())
            .unwrap_err();
        assert_eq!(err.to_string(), "2DA table 'iprp_spells' not found");
    }
}
