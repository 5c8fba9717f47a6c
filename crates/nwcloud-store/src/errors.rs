//! Error handling for nwcloud-store
//!
//! Wraps nwcloud-core ExError with filesystem-specific helpers

use nwcloud_core::errors::{io_error, not_found, ExError};
use std::io;
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Map an I/O failure on `path`, keeping "file absent" distinct
pub fn fs_error(op: &str, path: &Path, err: io::Error) -> ExError {
    if err.kind() == io::ErrorKind::NotFound {
        not_found(op, path)
    } else {
        io_error(op, path, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nwcloud_core::ExErrorKind;

    #[test]
    fn test_not_found_is_classified() {
        let err = fs_error("read", Path::new("/x"), io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ExErrorKind::NotFound);

        let err = fs_error("read", Path::new("/x"), io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), ExErrorKind::Io);
    }
}
