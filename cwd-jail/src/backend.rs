//! Filesystem backend seam.
//!
//! Every intercepted call reaches the filesystem through an `FsBackend`. The injectable
//! library binds the real libc implementations behind it; `ConfinementState` wraps any
//! backend and runs the confinement checks before delegating; tests plug in recorders.
//!
//! Methods are grouped by call *shape* rather than by symbol. Each receives the
//! `CallPolicy` of the call it serves, so a backend that dispatches by symbol name
//! (such as one built on `dlsym`) knows which original to invoke.
use crate::policy::CallPolicy;
use libc::{c_int, c_void, mode_t, DIR};
use std::ffi::{CStr, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Borrow a C path argument as a `Path` without copying.
#[inline]
pub fn c_path(path: &CStr) -> &Path {
    Path::new(OsStr::from_bytes(path.to_bytes()))
}

/// SUMMARY:
/// Provide the filesystem primitives the interception layer guards.
///
/// SAFETY:
/// The shape methods forward raw buffers supplied by the confined program. Callers must pass
/// the same pointers they received and implementors must not dereference them beyond what
/// the underlying libc function would.
pub trait FsBackend {
    /// Canonicalize an existing path, resolving symlinks, `.` and `..`.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    /// The process working directory, as reported by the OS.
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    /// `int f(const char *path, void *buf)`: stat, lstat, statvfs and their variants.
    ///
    /// # Safety
    /// `buf` must be valid for the original function.
    unsafe fn status(&self, call: &CallPolicy, path: &CStr, buf: *mut c_void) -> c_int;

    /// `int f(int ver, const char *path, void *buf)`: glibc's `__xstat` family.
    ///
    /// # Safety
    /// `buf` must be valid for the original function.
    unsafe fn versioned_status(
        &self,
        call: &CallPolicy,
        ver: c_int,
        path: &CStr,
        buf: *mut c_void,
    ) -> c_int;

    /// `int f(const char *path)`: unlink, rmdir.
    fn remove(&self, call: &CallPolicy, path: &CStr) -> c_int;

    /// `int f(const char *a, const char *b)`: rename, link, symlink.
    fn two_paths(&self, call: &CallPolicy, from: &CStr, to: &CStr) -> c_int;

    /// `int f(const char *path, mode_t mode)`: mkdir, chmod.
    fn with_mode(&self, call: &CallPolicy, path: &CStr, mode: mode_t) -> c_int;

    /// `int f(const char *path, int flags, mode_t mode)`: open, open64.
    fn open(&self, call: &CallPolicy, path: &CStr, flags: c_int, mode: mode_t) -> c_int;

    /// `DIR *f(const char *path)`: opendir.
    fn open_dir(&self, call: &CallPolicy, path: &CStr) -> *mut DIR;
}

/// The value a call shape returns when it fails without reaching the original.
pub trait FailureValue {
    fn failure() -> Self;
}

impl FailureValue for c_int {
    #[inline]
    fn failure() -> Self {
        -1
    }
}

impl FailureValue for *mut DIR {
    #[inline]
    fn failure() -> Self {
        std::ptr::null_mut()
    }
}
