use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use super::config::LoadConfig;
use super::copier::{Copier, CopyStatement, LoadCommand, LoadCredentials, SqlExecutor};
use super::error::UploadError;
use super::handle::Handle;

/// Upload handle plus a load running concurrently on a dedicated thread.
///
/// The load starts as soon as the handle is built. `get` waits for both legs,
/// joins the load thread exactly once and reports the first failure, primary
/// first. A successful primary is not rolled back when the load fails.
///
/// Dropping the handle without calling `get` detaches the load thread.
pub struct CombinedHandle<P: Handle> {
    primary: P,
    secondary: JoinHandle<Result<(), UploadError>>,
}

impl<P: Handle> CombinedHandle<P> {
    pub fn spawn<L>(primary: P, mut secondary: L) -> Result<Self, UploadError>
    where
        L: LoadCommand + 'static,
    {
        let secondary = thread::Builder::new()
            .name("jsonlog-load".into())
            .spawn(move || {
                let status = secondary.run()?;
                if status != 0 {
                    return Err(UploadError::SecondaryLoad { status });
                }
                Ok(())
            })
            .map_err(UploadError::Spawn)?;
        debug!("load leg started");
        Ok(Self { primary, secondary })
    }

    /// Start `COPY <table> FROM '<remote_path>'` with the format options of
    /// `cfg` on `executor` next to `primary`. The table is usually the topic.
    pub fn with_copy<E>(
        primary: P,
        cfg: &LoadConfig,
        credentials: LoadCredentials,
        table: impl Into<String>,
        remote_path: impl Into<String>,
        executor: E,
    ) -> Result<Self, UploadError>
    where
        E: SqlExecutor + 'static,
    {
        let statement =
            CopyStatement::new(table, remote_path).format_options(cfg.format_options.as_str());
        Self::spawn(primary, Copier::new(statement, credentials, executor))
    }

    /// Whether the load leg has already completed (successfully or not).
    pub fn is_secondary_finished(&self) -> bool {
        self.secondary.is_finished()
    }

    pub fn get(self) -> Result<P::Output, UploadError> {
        let CombinedHandle { primary, secondary } = self;

        let primary = primary.get();
        let secondary = secondary
            .join()
            .unwrap_or(Err(UploadError::LegPanicked("secondary")));

        match (primary, secondary) {
            (Ok(output), Ok(())) => Ok(output),
            (Ok(_), Err(e)) => {
                error!(error = %e, "load leg failed");
                Err(e)
            }
            (Err(e), secondary) => {
                error!(error = %e, "upload leg failed");
                if let Err(load) = secondary {
                    error!(error = %load, "load leg failed");
                }
                Err(e)
            }
        }
    }
}

impl<P: Handle> Handle for CombinedHandle<P> {
    type Output = P::Output;

    fn get(self) -> Result<P::Output, UploadError> {
        CombinedHandle::get(self)
    }
}
