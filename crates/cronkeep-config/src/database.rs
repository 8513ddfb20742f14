//! Database connection settings read from the `db` section of `app.ini`.
//!
//! Only the extraction lives here; the INI grammar is handled by `rust-ini`.
//! The result always carries every [`DbField`], with empty strings standing
//! in for keys the file leaves unset, so consumers never see a partial map.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

/// Section of `app.ini` holding the connection parameters.
pub const DB_SECTION: &str = "db";

/// Named connection parameters recognised in the `db` section.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum DbField {
    /// Account name.
    User,
    /// Account password.
    Password,
    /// Server host name or address.
    Host,
    /// Server port, kept as text.
    Port,
    /// Database (schema) name.
    Database,
    /// Connection character set.
    Charset,
    /// Prefix applied to table names.
    Prefix,
    /// Storage engine identifier.
    Engine,
}

/// Connection parameters with every [`DbField`] present.
#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    values: BTreeMap<DbField, String>,
}

impl DbSettings {
    /// Loads the `db` section of the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigReadError`] when the file is missing, unreadable, or
    /// not valid INI.
    pub fn load(path: &Path) -> Result<Self, ConfigReadError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigReadError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigReadError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let document = Ini::load_from_str_opt(&literal_lines(&contents), literal_parse_option())
            .map_err(|source| ConfigReadError::Parse {
                path: path.to_path_buf(),
                message: source.to_string(),
            })?;
        Ok(Self::from_ini(&document))
    }

    /// Extracts the settings from an already parsed document.
    #[must_use]
    pub fn from_ini(document: &Ini) -> Self {
        let section = document.section(Some(DB_SECTION));
        Self::from_pairs(DbField::iter().filter_map(|field| {
            section
                .and_then(|properties| properties.get(field.as_ref()))
                .map(|value| (field, value.to_owned()))
        }))
    }

    /// Builds settings from explicit pairs, filling unset fields with `""`.
    pub fn from_pairs<I, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (DbField, V)>,
        V: Into<String>,
    {
        let mut values: BTreeMap<DbField, String> =
            DbField::iter().map(|field| (field, String::new())).collect();
        for (field, value) in pairs {
            values.insert(field, value.into());
        }
        Self { values }
    }

    /// Value of `field`; empty when the source left it unset.
    #[must_use]
    pub fn get(&self, field: DbField) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    /// Copies the settings into a map keyed by field name.
    ///
    /// The map always holds exactly one entry per [`DbField`].
    #[must_use]
    pub fn as_map(&self) -> BTreeMap<&'static str, String> {
        self.values
            .iter()
            .map(|(field, value)| (<&'static str>::from(*field), value.clone()))
            .collect()
    }
}

/// Values are taken as written: backslashes are not escape sequences.
fn literal_parse_option() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    }
}

/// Pads lines ending in `\` so the parser keeps the backslash instead of
/// joining the next line. Trailing whitespace is trimmed from values, so the
/// padding never reaches the result.
fn literal_lines(contents: &str) -> String {
    let mut buffer = String::with_capacity(contents.len());
    for line in contents.lines() {
        buffer.push_str(line);
        if line.ends_with('\\') {
            buffer.push(' ');
        }
        buffer.push('\n');
    }
    buffer
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = formatter.debug_map();
        for (field, value) in &self.values {
            if *field == DbField::Password && !value.is_empty() {
                map.entry(field, &"<redacted>");
            } else {
                map.entry(field, value);
            }
        }
        map.finish()
    }
}

/// Errors raised while reading the main configuration file.
#[derive(Debug, Error)]
pub enum ConfigReadError {
    /// The file does not exist.
    #[error("configuration file '{}' does not exist", .path.display())]
    Missing {
        /// Expected file path.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read configuration file '{}': {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid INI.
    #[error("failed to parse configuration file '{}': {message}", .path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}
