//! `SqlExecutor` over a Postgres-wire connection (Redshift speaks the same protocol).
//!
//! Only available with the `postgres` feature. Each call opens a fresh
//! connection on a private current-thread runtime, so it can run on the plain
//! OS thread a [`super::CombinedHandle`] dedicates to the load.

use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use std::time::Duration;
use tracing::{debug, info};

use super::combined::CombinedHandle;
use super::config::LoadConfig;
use super::copier::{LoadCredentials, SqlExecutor};
use super::error::{BoxError, UploadError};
use super::handle::Handle;

pub struct PgExecutor {
    options: PgConnectOptions,
    connect_timeout: Duration,
    statement_timeout: Duration,
}

impl PgExecutor {
    pub fn new(cfg: &LoadConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .database(&cfg.database)
            .username(&cfg.username)
            .password(&cfg.password);
        Self {
            options,
            connect_timeout: cfg.connect_timeout,
            statement_timeout: cfg.statement_timeout,
        }
    }
}

impl SqlExecutor for PgExecutor {
    /// Returns 0 once the statement completed; the driver's row count is only logged.
    fn execute(&mut self, sql: &str) -> Result<u64, BoxError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(async {
            debug!("connecting to warehouse");
            let mut conn =
                tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
                    .await??;
            let done = tokio::time::timeout(
                self.statement_timeout,
                sqlx::raw_sql(sql).execute(&mut conn),
            )
            .await??;
            info!(rows = done.rows_affected(), "statement completed");
            conn.close().await?;
            Ok::<u64, BoxError>(0)
        })
    }
}

impl<P: Handle> CombinedHandle<P> {
    /// [`CombinedHandle::with_copy`] against the warehouse described by `cfg`,
    /// with credentials from the environment.
    pub fn with_warehouse_load(
        primary: P,
        cfg: &LoadConfig,
        table: impl Into<String>,
        remote_path: impl Into<String>,
    ) -> Result<Self, UploadError> {
        let credentials = LoadCredentials::from_env()?;
        Self::with_copy(primary, cfg, credentials, table, remote_path, PgExecutor::new(cfg))
    }
}
