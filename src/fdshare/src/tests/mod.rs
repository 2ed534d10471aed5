// fdshare unit tests
//
// These tests open, duplicate and close real kernel descriptors. Descriptor
// numbers are reused by the kernel as soon as they are freed, so tests that
// reason about specific numbers (double close, EBADF) must not interleave.


use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Global test mutex to prevent concurrent test execution
static TEST_MUTEX: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Setup function for tests
/// Returns a lock guard that keeps the test serialized, plus a fresh scratch directory
pub fn test_setup() -> (parking_lot::MutexGuard<'static, bool>, TempDir) {
    let guard = TEST_MUTEX.lock();
    let dir = tempfile::tempdir().unwrap();
    (guard, dir)
}

pub fn scratch_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
