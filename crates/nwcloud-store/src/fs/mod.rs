//! Filesystem-backed file store
//!
//! Provides:
//! - Atomic writes (temp file in the target directory, then rename)
//! - Change descriptions logged at info level

mod atomic;
mod fs_store;

pub use atomic::atomic_write;
pub use fs_store::FsFileStore;
