use std::io;
use std::path::Path;

/// Blocking byte copy from one file to another.
///
/// Implementations must leave `from` untouched and overwrite `to` if it
/// exists; the engines decide when overwriting is allowed.
pub trait Copier: Send + Sync {
    /// Copies `from` to `to`, returning the number of bytes written.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
}

/// Copier backed by `std::fs::copy`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCopier;

impl Copier for FsCopier {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }
}
