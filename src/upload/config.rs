use std::env;
use std::fmt;
use std::time::Duration;

use super::error::UploadError;

/// Connection parameters for the warehouse load. Supplied by the caller;
/// the codec itself never reads them.
#[derive(Clone)]
pub struct LoadConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Appended verbatim to the `COPY` statement.
    pub format_options: String,
    pub connect_timeout: Duration,
    /// Bounds the load leg; the combined handle has no timeout of its own.
    pub statement_timeout: Duration,
}

impl LoadConfig {
    pub const DEFAULT_PORT: u16 = 5439;

    /// Defaults: port 5439, connect timeout 30 s, statement timeout 1 h.
    pub fn builder(host: impl Into<String>, database: impl Into<String>) -> LoadConfigBuilder {
        LoadConfigBuilder {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            database: database.into(),
            username: String::new(),
            password: String::new(),
            format_options: String::new(),
            connect_timeout: Duration::from_secs(30),
            statement_timeout: Duration::from_secs(3600),
        }
    }

    /// Read `JSONLOG_LOAD_{HOST,PORT,DATABASE,USERNAME,PASSWORD,FORMAT_OPTIONS}`.
    /// Host and database are required.
    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, UploadError> {
        let required =
            |name: &str| var(name).ok_or_else(|| UploadError::Config(format!("{name} is not set")));

        let mut builder = Self::builder(
            required("JSONLOG_LOAD_HOST")?,
            required("JSONLOG_LOAD_DATABASE")?,
        );
        if let Some(port) = var("JSONLOG_LOAD_PORT") {
            let port = port
                .parse::<u16>()
                .map_err(|e| UploadError::Config(format!("JSONLOG_LOAD_PORT: {e}")))?;
            builder = builder.port(port);
        }
        if let Some(username) = var("JSONLOG_LOAD_USERNAME") {
            builder = builder.username(username);
        }
        if let Some(password) = var("JSONLOG_LOAD_PASSWORD") {
            builder = builder.password(password);
        }
        if let Some(options) = var("JSONLOG_LOAD_FORMAT_OPTIONS") {
            builder = builder.format_options(options);
        }
        Ok(builder.build())
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("format_options", &self.format_options)
            .field("connect_timeout", &self.connect_timeout)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

/// Fluent builder for `LoadConfig`.
#[derive(Clone)]
pub struct LoadConfigBuilder {
    host: String,
    port: u16,
    database: String,
    username: String,
    password: String,
    format_options: String,
    connect_timeout: Duration,
    statement_timeout: Duration,
}

impl LoadConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
    pub fn format_options(mut self, options: impl Into<String>) -> Self {
        self.format_options = options.into();
        self
    }
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
    pub fn statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    pub fn build(self) -> LoadConfig {
        LoadConfig {
            host: self.host,
            port: self.port,
            database: self.database,
            username: self.username,
            password: self.password,
            format_options: self.format_options,
            connect_timeout: self.connect_timeout,
            statement_timeout: self.statement_timeout,
        }
    }
}
