use std::thread::{self, JoinHandle};

use super::error::{BoxError, UploadError};

/// An in-flight operation whose outcome is collected with a blocking `get`.
pub trait Handle: Send {
    type Output: Send;

    fn get(self) -> Result<Self::Output, UploadError>;
}

/// A handle whose outcome is already known.
pub struct ReadyHandle<T> {
    result: Result<T, UploadError>,
}

impl<T> ReadyHandle<T> {
    pub fn ok(value: T) -> Self {
        Self { result: Ok(value) }
    }

    pub fn err(error: UploadError) -> Self {
        Self { result: Err(error) }
    }
}

impl<T: Send> Handle for ReadyHandle<T> {
    type Output = T;

    fn get(self) -> Result<T, UploadError> {
        self.result
    }
}

/// Work running on its own named thread, e.g. copying a local file to remote storage.
pub struct ThreadHandle<T> {
    join: JoinHandle<Result<T, BoxError>>,
}

impl<T: Send + 'static> ThreadHandle<T> {
    pub fn spawn<F>(name: &str, work: F) -> Result<Self, UploadError>
    where
        F: FnOnce() -> Result<T, BoxError> + Send + 'static,
    {
        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(work)
            .map_err(UploadError::Spawn)?;
        Ok(Self { join })
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl<T: Send + 'static> Handle for ThreadHandle<T> {
    type Output = T;

    fn get(self) -> Result<T, UploadError> {
        match self.join.join() {
            Ok(result) => result.map_err(UploadError::Primary),
            Err(_) => Err(UploadError::LegPanicked("primary")),
        }
    }
}
