//! Storage handle derived from the `db` connection parameters.
//!
//! The handle validates and normalises the settings and renders a
//! connection string. Opening connections belongs to the persistence layer,
//! which receives this handle.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

use cronkeep_config::{DbField, DbSettings};

const DEFAULT_HOST: &str = "localhost";

/// Database engines the persistence layer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageEngine {
    /// MySQL or a wire-compatible server.
    #[default]
    MySql,
    /// PostgreSQL.
    Postgres,
}

impl StorageEngine {
    /// Port used when the settings leave `port` empty.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::MySql => 3306,
            Self::Postgres => 5432,
        }
    }

    const fn scheme(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
        }
    }

    const fn charset_parameter(self) -> &'static str {
        match self {
            Self::MySql => "charset",
            Self::Postgres => "client_encoding",
        }
    }
}

impl fmt::Display for StorageEngine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.scheme())
    }
}

impl FromStr for StorageEngine {
    type Err = StorageSettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "mysql" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(StorageSettingsError::UnsupportedEngine {
                engine: other.to_owned(),
            }),
        }
    }
}

/// Invalid connection parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageSettingsError {
    /// The `engine` value names an unknown database.
    #[error("unsupported storage engine '{engine}'")]
    UnsupportedEngine {
        /// Engine as written in the settings.
        engine: String,
    },
    /// The `port` value is not a TCP port number.
    #[error("invalid storage port '{value}': {source}")]
    InvalidPort {
        /// Port as written in the settings.
        value: String,
        /// Parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Validated storage connection description.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageHandle {
    engine: StorageEngine,
    user: String,
    password: String,
    host: String,
    port: u16,
    database: String,
    charset: String,
    prefix: String,
}

impl StorageHandle {
    /// Validates `settings` and builds the handle.
    ///
    /// # Errors
    ///
    /// Returns [`StorageSettingsError`] for an unknown engine or a
    /// malformed port.
    pub fn from_settings(settings: &DbSettings) -> Result<Self, StorageSettingsError> {
        let engine: StorageEngine = settings.get(DbField::Engine).parse()?;
        let port = match settings.get(DbField::Port).trim() {
            "" => engine.default_port(),
            value => value
                .parse::<u16>()
                .map_err(|source| StorageSettingsError::InvalidPort {
                    value: value.to_owned(),
                    source,
                })?,
        };
        let host = match settings.get(DbField::Host).trim() {
            "" => DEFAULT_HOST.to_owned(),
            value => value.to_owned(),
        };
        Ok(Self {
            engine,
            user: settings.get(DbField::User).to_owned(),
            password: settings.get(DbField::Password).to_owned(),
            host,
            port,
            database: settings.get(DbField::Database).to_owned(),
            charset: settings.get(DbField::Charset).to_owned(),
            prefix: settings.get(DbField::Prefix).to_owned(),
        })
    }

    /// Database engine.
    #[must_use]
    pub const fn engine(&self) -> StorageEngine {
        self.engine
    }

    /// Server host.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Server port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Database name.
    #[must_use]
    pub fn database(&self) -> &str {
        self.database.as_str()
    }

    /// Full table name for `name`, with the configured prefix applied.
    #[must_use]
    pub fn table(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Connection string including the password.
    #[must_use]
    pub fn dsn(&self) -> String {
        self.render(Some(self.password.as_str()))
    }

    fn render(&self, password: Option<&str>) -> String {
        let mut dsn = format!("{}://", self.engine.scheme());
        if !self.user.is_empty() {
            dsn.push_str(&utf8_percent_encode(&self.user, NON_ALPHANUMERIC).to_string());
            match password {
                Some("") => {}
                Some(secret) => {
                    dsn.push(':');
                    dsn.push_str(&utf8_percent_encode(secret, NON_ALPHANUMERIC).to_string());
                }
                None if self.password.is_empty() => {}
                None => dsn.push_str(":***"),
            }
            dsn.push('@');
        }
        dsn.push_str(&format!("{}:{}/{}", self.host, self.port, self.database));
        if !self.charset.is_empty() {
            dsn.push_str(&format!(
                "?{}={}",
                self.engine.charset_parameter(),
                utf8_percent_encode(&self.charset, NON_ALPHANUMERIC)
            ));
        }
        dsn
    }
}

impl fmt::Display for StorageHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.render(None))
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StorageHandle")
            .field("dsn", &self.render(None))
            .field("prefix", &self.prefix)
            .finish()
    }
}
