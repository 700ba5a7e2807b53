//! Configuration for the attendance tool
//!
//! A TOML file under the platform config directory, created from compiled-in
//! defaults on first run. Keys addressed by `config get/set/unset` are listed
//! in [`ConfigKey`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Compiled-in defaults; debug builds log more and write a log file.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");
#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

/// Debug builds keep a separate file so they never clobber a release config.
#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";
#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to [`Config::get_home_dir`]
const HOME_VARIABLE: &str = "$ATTENDANCE_HOME";

const APP_DIR: &str = "school-attendance";

const fn default_true() -> bool {
    true
}

/// `[logging]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// error, warn, info or debug
    #[serde(default)]
    pub level: String,
    /// Log file; empty logs to the console
    #[serde(default)]
    pub file: String,
    /// Print per-student progress
    #[serde(default)]
    pub verbose: bool,
}

/// `[storage]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the school-band folders
    #[serde(default)]
    pub data_dir: String,
    /// Destination of `export`
    #[serde(default)]
    pub exports_dir: String,
    /// Snapshot an existing class file before overwriting it
    #[serde(default = "default_true")]
    pub backup_on_save: bool,
    /// Rewrite the `_stats.txt` file after every save
    #[serde(default = "default_true")]
    pub write_stats: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            exports_dir: String::new(),
            backup_on_save: true,
            write_stats: true,
        }
    }
}

/// `[reports]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Where reports are written unless `--output` is given
    #[serde(default)]
    pub reports_dir: String,
    /// Heading of HTML reports
    #[serde(default)]
    pub school_name: String,
}

/// `[auth]`
///
/// One shared operator password in plain text. It keeps casual users out of
/// the data commands and is not a security boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared operator password
    #[serde(default)]
    pub password: String,
}

/// The whole configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Report settings
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Authorization settings
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Values from command-line flags that replace config values for one run.
/// `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `[logging] level`
    pub level: Option<String>,
    /// `[logging] file`
    pub file: Option<String>,
    /// `[logging] verbose`
    pub verbose: Option<bool>,
    /// `[storage] data_dir`
    pub data_dir: Option<String>,
    /// `[storage] exports_dir`
    pub exports_dir: Option<String>,
    /// `[reports] reports_dir`
    pub reports_dir: Option<String>,
}

/// A key accepted by `config get/set/unset`. Dashes and underscores are
/// interchangeable (`data-dir` is `data_dir`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `level`
    Level,
    /// `file`
    File,
    /// `verbose`
    Verbose,
    /// `data_dir`
    DataDir,
    /// `exports_dir`
    ExportsDir,
    /// `backup_on_save`
    BackupOnSave,
    /// `write_stats`
    WriteStats,
    /// `reports_dir`
    ReportsDir,
    /// `school_name`
    SchoolName,
    /// `password`
    Password,
}

impl ConfigKey {
    /// Every key, in file order
    pub const ALL: [Self; 10] = [
        Self::Level,
        Self::File,
        Self::Verbose,
        Self::DataDir,
        Self::ExportsDir,
        Self::BackupOnSave,
        Self::WriteStats,
        Self::ReportsDir,
        Self::SchoolName,
        Self::Password,
    ];

    /// Canonical spelling
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::File => "file",
            Self::Verbose => "verbose",
            Self::DataDir => "data_dir",
            Self::ExportsDir => "exports_dir",
            Self::BackupOnSave => "backup_on_save",
            Self::WriteStats => "write_stats",
            Self::ReportsDir => "reports_dir",
            Self::SchoolName => "school_name",
            Self::Password => "password",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| format!("Unknown config key: '{s}'"))
    }
}

/// A settable field, borrowed from a [`Config`]
enum Field<'a> {
    Text(&'a mut String),
    Flag(&'a mut bool),
}

impl Config {
    /// Application config directory
    ///
    /// `~/.config/school-attendance` on Linux, `~/Library/Application Support/school-attendance`
    /// on macOS, `%APPDATA%\school-attendance` on Windows. Falls back to `./school-attendance`.
    #[must_use]
    pub fn get_home_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// The config file inside [`get_home_dir`](Self::get_home_dir)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_home_dir().join(CONFIG_FILE_NAME)
    }

    fn field(&mut self, key: ConfigKey) -> Field<'_> {
        match key {
            ConfigKey::Level => Field::Text(&mut self.logging.level),
            ConfigKey::File => Field::Text(&mut self.logging.file),
            ConfigKey::Verbose => Field::Flag(&mut self.logging.verbose),
            ConfigKey::DataDir => Field::Text(&mut self.storage.data_dir),
            ConfigKey::ExportsDir => Field::Text(&mut self.storage.exports_dir),
            ConfigKey::BackupOnSave => Field::Flag(&mut self.storage.backup_on_save),
            ConfigKey::WriteStats => Field::Flag(&mut self.storage.write_stats),
            ConfigKey::ReportsDir => Field::Text(&mut self.reports.reports_dir),
            ConfigKey::SchoolName => Field::Text(&mut self.reports.school_name),
            ConfigKey::Password => Field::Text(&mut self.auth.password),
        }
    }

    /// Fill empty text fields from `defaults`; flags keep their serde defaults.
    ///
    /// Returns `true` when anything was filled in.
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut defaults = defaults.clone();
        let mut changed = false;
        for key in ConfigKey::ALL {
            if let (Field::Text(target), Field::Text(source)) = (self.field(key), defaults.field(key)) {
                if target.is_empty() && !source.is_empty() {
                    target.clone_from(source);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Replace configured values with the given overrides for this run only
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let texts = [
            (&mut self.logging.level, &overrides.level),
            (&mut self.logging.file, &overrides.file),
            (&mut self.storage.data_dir, &overrides.data_dir),
            (&mut self.storage.exports_dir, &overrides.exports_dir),
            (&mut self.reports.reports_dir, &overrides.reports_dir),
        ];
        for (target, value) in texts {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
    }

    fn expand_variables(value: &str) -> String {
        if value.contains(HOME_VARIABLE) {
            let home = Self::get_home_dir();
            value.replace(HOME_VARIABLE, &home.to_string_lossy())
        } else {
            value.to_string()
        }
    }

    /// Parse a config file body, expanding `$ATTENDANCE_HOME` in every path.
    /// Missing sections and fields take their serde defaults.
    ///
    /// # Errors
    /// Returns the TOML error for invalid syntax or mistyped values
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;
        for path in [
            &mut config.logging.file,
            &mut config.storage.data_dir,
            &mut config.storage.exports_dir,
            &mut config.reports.reports_dir,
        ] {
            *path = Self::expand_variables(path);
        }
        Ok(config)
    }

    /// The compiled-in defaults
    ///
    /// # Panics
    /// Panics if the bundled defaults are not valid TOML; tests parse both profiles.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Read the config file, writing the defaults there on first run.
    ///
    /// Fields missing from an existing file are filled from the defaults and
    /// saved back. An unreadable or invalid file yields the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save();
            return defaults;
        }

        let parsed = fs::read_to_string(&config_file)
            .ok()
            .and_then(|content| Self::from_toml(&content).ok());
        match parsed {
            Some(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            None => defaults,
        }
    }

    /// Write the config file, creating its directory
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_file, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Value of `key` as text, or `None` for an unknown key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let key = key.parse::<ConfigKey>().ok()?;
        let mut copy = self.clone();
        let value = match copy.field(key) {
            Field::Text(text) => std::mem::take(text),
            Field::Flag(flag) => flag.to_string(),
        };
        Some(value)
    }

    /// Change `key` in memory; call [`save`](Self::save) to persist.
    ///
    /// # Errors
    /// Returns a message for an unknown key or a flag value that is not `true`/`false`
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let key = key.parse::<ConfigKey>()?;
        match self.field(key) {
            Field::Text(text) => *text = value.to_string(),
            Field::Flag(flag) => {
                *flag = value.trim().parse().map_err(|_| {
                    format!("Invalid boolean value for '{}': '{value}'", key.name())
                })?;
            }
        }
        Ok(())
    }

    /// Put `key` back to its value in `defaults`
    ///
    /// # Errors
    /// Returns a message for an unknown key
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        let key = key.parse::<ConfigKey>()?;
        let value = defaults.get(key.name()).unwrap_or_default();
        self.set(key.name(), &value)
    }

    /// Delete the config file; the next [`load`](Self::load) recreates it.
    ///
    /// # Errors
    /// Returns the I/O error if an existing file cannot be removed
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

/// Grouped like the file; the password is masked.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = {:?}", self.logging.level)?;
        writeln!(f, "  file = {:?}", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[storage]")?;
        writeln!(f, "  data_dir = {:?}", self.storage.data_dir)?;
        writeln!(f, "  exports_dir = {:?}", self.storage.exports_dir)?;
        writeln!(f, "  backup_on_save = {}", self.storage.backup_on_save)?;
        writeln!(f, "  write_stats = {}", self.storage.write_stats)?;

        writeln!(f, "\n[reports]")?;
        writeln!(f, "  reports_dir = {:?}", self.reports.reports_dir)?;
        writeln!(f, "  school_name = {:?}", self.reports.school_name)?;

        writeln!(f, "\n[auth]")?;
        writeln!(f, "  password = \"********\"")
    }
}
