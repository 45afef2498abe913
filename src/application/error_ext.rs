//! Attaching the affected path to filesystem errors

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Turn an `io::Result` into an [`ApplicationResult`] whose error names the
/// failed action and the path: `could not create directory 'repo': <os error>`.
pub trait IoResultExt<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| {
            let context = format!("{action} '{}'", path.display());
            ApplicationError::OperationFailed {
                context,
                source: source.into(),
            }
        })
    }
}
