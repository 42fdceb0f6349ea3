//! Completion handles for shipping a finished stream.
//!
//! The upload itself and the warehouse load are external; this module only
//! defines how their completion is observed ([`Handle`]) and composed
//! ([`CombinedHandle`]), plus the `COPY` command the load leg runs.

mod combined;
mod config;
mod copier;
mod error;
mod handle;
#[cfg(feature = "postgres")]
mod postgres;

pub use combined::CombinedHandle;
pub use config::{LoadConfig, LoadConfigBuilder};
pub use copier::{Copier, CopyStatement, LoadCommand, LoadCredentials, SqlExecutor};
pub use error::UploadError;
pub use handle::{Handle, ReadyHandle, ThreadHandle};
#[cfg(feature = "postgres")]
pub use postgres::PgExecutor;
