use std::io;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    /// The primary (upload) leg failed.
    #[error("upload: {0}")]
    Primary(#[source] BoxError),

    /// The load command ran but reported a non-zero status.
    #[error("load failed with status: {status}")]
    SecondaryLoad { status: u64 },

    /// The load command could not be executed (connection, SQL error, ...).
    #[error("load: {0}")]
    Sql(#[source] BoxError),

    #[error("config: {0}")]
    Config(String),

    /// Could not start the dedicated thread for a leg.
    #[error("spawn: {0}")]
    Spawn(#[source] io::Error),

    #[error("{0} leg panicked")]
    LegPanicked(&'static str),
}
