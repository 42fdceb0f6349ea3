use std::env;
use std::fmt;

use tracing::info;

use super::error::{BoxError, UploadError};

/// A synchronous load step run as the secondary leg of a [`super::CombinedHandle`].
pub trait LoadCommand: Send {
    /// Execute the load and return its status; anything but 0 is a failure.
    fn run(&mut self) -> Result<u64, UploadError>;
}

impl<F> LoadCommand for F
where
    F: FnMut() -> Result<u64, UploadError> + Send,
{
    fn run(&mut self) -> Result<u64, UploadError> {
        self()
    }
}

/// Runs one textual statement over a database connection.
pub trait SqlExecutor: Send {
    fn execute(&mut self, sql: &str) -> Result<u64, BoxError>;
}

/// Key pair interpolated into the `COPY ... WITH CREDENTIALS` clause.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadCredentials {
    access_key_id: String,
    secret_access_key: String,
}

impl LoadCredentials {
    pub const ACCESS_KEY_ENV: &'static str = "aws_access_key_id";
    pub const SECRET_KEY_ENV: &'static str = "aws_secret_access_key";

    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Read the pair from `aws_access_key_id` / `aws_secret_access_key`.
    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, UploadError> {
        let required = |name: &str| {
            var(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| UploadError::Config(format!("{name} is not set")))
        };
        Ok(Self::new(
            required(Self::ACCESS_KEY_ENV)?,
            required(Self::SECRET_KEY_ENV)?,
        ))
    }
}

impl fmt::Debug for LoadCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// `COPY <table> FROM '<remote path>' WITH CREDENTIALS AS '...' <format options>;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyStatement {
    table: String,
    remote_path: String,
    format_options: String,
}

impl CopyStatement {
    pub fn new(table: impl Into<String>, remote_path: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            remote_path: remote_path.into(),
            format_options: String::new(),
        }
    }

    /// Trailing options such as `JSON 'auto' GZIP`, appended verbatim.
    pub fn format_options(mut self, options: impl Into<String>) -> Self {
        self.format_options = options.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    pub fn render(&self, credentials: &LoadCredentials) -> String {
        let mut sql = format!(
            "COPY {} FROM '{}' WITH CREDENTIALS AS 'aws_access_key_id={};aws_secret_access_key={}'",
            self.table, self.remote_path, credentials.access_key_id, credentials.secret_access_key
        );
        let options = self.format_options.trim();
        if !options.is_empty() {
            sql.push(' ');
            sql.push_str(options);
        }
        sql.push(';');
        sql
    }
}

/// Loads one remote file into a warehouse table through a [`SqlExecutor`].
pub struct Copier<E: SqlExecutor> {
    statement: CopyStatement,
    credentials: LoadCredentials,
    executor: E,
}

impl<E: SqlExecutor> Copier<E> {
    pub fn new(statement: CopyStatement, credentials: LoadCredentials, executor: E) -> Self {
        Self {
            statement,
            credentials,
            executor,
        }
    }

    pub fn statement(&self) -> &CopyStatement {
        &self.statement
    }
}

impl<E: SqlExecutor> LoadCommand for Copier<E> {
    fn run(&mut self) -> Result<u64, UploadError> {
        info!(
            table = %self.statement.table,
            from = %self.statement.remote_path,
            "copying file into warehouse"
        );
        let sql = self.statement.render(&self.credentials);
        let status = self.executor.execute(&sql).map_err(UploadError::Sql)?;
        info!(table = %self.statement.table, status, "copy returned");
        Ok(status)
    }
}
