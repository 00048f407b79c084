//! Settings loaded from `iprp_gen.ini`
//!
//! The file is a plain INI file:
//!
//! ```ini
//! [settings]
//! module = MyModule
//!
//! [paths]
//! nwn2-install = C:\Program Files\Atari\Neverwinter Nights 2
//! nwn2-home = C:\Users\me\Documents\Neverwinter Nights 2
//! ```
//!
//! Keys are addressed as `section.key`. Unknown keys are ignored.

use crate::error::{ConfigError, MissingSetting, Result};
use ini::{Ini, ParseOption};
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file name, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "iprp_gen.ini";

/// Raw key/value pairs from an INI file
#[derive(Debug, Clone)]
pub struct IniFile {
    inner: Ini,
}

impl Default for IniFile {
    fn default() -> Self {
        Self { inner: Ini::new() }
    }
}

impl IniFile {
    /// Load and parse an INI file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse INI text
    ///
    /// Backslash escapes are off so Windows paths read as written.
    pub fn parse(content: &str) -> Result<Self> {
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let inner = Ini::load_from_str_opt(content, options).map_err(ConfigError::Malformed)?;
        Ok(Self { inner })
    }

    /// Get a value by its `section.key` name
    pub fn get(&self, key: &str) -> Option<&str> {
        let (section, name) = split_key(key);
        self.inner.get_from(section, name)
    }

    /// Set a value, replacing any value read from the file
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let (section, name) = split_key(key);
        self.inner.set_to(section, name.to_string(), value.into());
    }
}

fn split_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once('.') {
        Some((section, name)) => (Some(section), name),
        None => (None, key),
    }
}

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Module to load
    pub module: String,
    /// NWN2 install directory
    pub nwn2_install: PathBuf,
    /// NWN2 user files directory
    pub nwn2_home: PathBuf,
}

impl Settings {
    /// Validate settings in order: module, install path, home path
    pub fn from_ini(ini: &IniFile) -> Result<Self> {
        let module = require(ini, MissingSetting::Module)?;

        let nwn2_install = PathBuf::from(require(ini, MissingSetting::Nwn2Install)?);
        if !nwn2_install.exists() {
            return Err(ConfigError::PathNotFound {
                what: "NWN2 install",
                path: nwn2_install,
            }
            .into());
        }

        let nwn2_home = PathBuf::from(require(ini, MissingSetting::Nwn2Home)?);
        if !nwn2_home.exists() {
            return Err(ConfigError::PathNotFound {
                what: "NWN2 home",
                path: nwn2_home,
            }
            .into());
        }

        Ok(Self {
            module,
            nwn2_install,
            nwn2_home,
        })
    }
}

fn require(ini: &IniFile, setting: MissingSetting) -> Result<String> {
    ini.get(setting.key())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Missing(setting).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_sections() {
        let ini = IniFile::parse(
            "; generator settings\n[settings]\nmodule = Test Module\n\n[paths]\nnwn2-install=C:\\NWN2\n# comment\nnwn2-home = C:\\Home\n",
        )
        .unwrap();

        assert_eq!(ini.get("settings.module"), Some("Test Module"));
        assert_eq!(ini.get("paths.nwn2-install"), Some("C:\\NWN2"));
        assert_eq!(ini.get("paths.nwn2-home"), Some("C:\\Home"));
        assert_eq!(ini.get("module"), None);
    }

    #[test]
    fn test_parse_quoted_value() {
        let ini = IniFile::parse("[paths]\nnwn2-home = \"D:\\Games\\NWN2 Home\"\n").unwrap();
        assert_eq!(ini.get("paths.nwn2-home"), Some("D:\\Games\\NWN2 Home"));
    }

    #[test]
    fn test_set_overrides_file_value() {
        let mut ini = IniFile::parse("[settings]\nmodule = FromFile\n").unwrap();
        ini.set("settings.module", "FromCli");
        assert_eq!(ini.get("settings.module"), Some("FromCli"));
    }

    #[test]
    fn test_parse_unclosed_section() {
        let err = IniFile::parse("[settings").unwrap_err();
        assert!(err.is_config());
        assert!(matches!(err, Error::Config(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = IniFile::load("/nonexistent/iprp_gen.ini").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Read { .. })));
    }

    fn ini_with(dir: &Path, skip: Option<&str>) -> IniFile {
        let mut ini = IniFile::default();
        for (key, value) in [
            ("settings.module", "mymod".to_string()),
            ("paths.nwn2-install", dir.display().to_string()),
            ("paths.nwn2-home", dir.display().to_string()),
        ] {
            if Some(key) != skip {
                ini.set(key, value);
            }
        }
        ini
    }

    #[test]
    fn test_settings_valid() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_ini(&ini_with(dir.path(), None)).unwrap();

        assert_eq!(settings.module, "mymod");
        assert_eq!(settings.nwn2_install, dir.path());
        assert_eq!(settings.nwn2_home, dir.path());
    }

    #[test]
    fn test_settings_missing_each_key() {
        let dir = tempfile::tempdir().unwrap();
        for (skip, expected) in [
            ("settings.module", MissingSetting::Module),
            ("paths.nwn2-install", MissingSetting::Nwn2Install),
            ("paths.nwn2-home", MissingSetting::Nwn2Home),
        ] {
            let err = Settings::from_ini(&ini_with(dir.path(), Some(skip))).unwrap_err();
            match err {
                Error::Config(ConfigError::Missing(setting)) => assert_eq!(setting, expected),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_settings_empty_value_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut ini = ini_with(dir.path(), None);
        ini.set("settings.module", "");

        let err = Settings::from_ini(&ini).unwrap_err();
        assert_eq!(err.to_string(), "Module not set.");
    }

    #[test]
    fn test_settings_path_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut ini = ini_with(dir.path(), None);
        ini.set("paths.nwn2-home", dir.path().join("missing").display().to_string());

        let err = Settings::from_ini(&ini).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::PathNotFound { what: "NWN2 home", .. })
        ));
    }

    #[test]
    fn test_install_checked_before_home() {
        let dir = tempfile::tempdir().unwrap();
        let mut ini = ini_with(dir.path(), Some("paths.nwn2-home"));
        ini.set("paths.nwn2-install", dir.path().join("missing").display().to_string());

        let err = Settings::from_ini(&ini).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::PathNotFound { what: "NWN2 install", .. })
        ));
    }
}
