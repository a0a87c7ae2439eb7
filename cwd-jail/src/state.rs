//! SUMMARY:
//! Process-wide confinement state and the guarded-call sequence every intercepted symbol runs.
//!
//! OVERVIEW:
//! `ConfinementState` owns the backend that reaches the original implementations and the
//! confinement root, captured lazily from the working directory on the first intercepted
//! call. It implements `FsBackend` itself: calling a shape method on it resolves the path
//! argument(s), consults the access predicate and only then delegates to the inner backend.
//!
//! Per call: acquire guard -> initialize (once) -> resolve -> check -> deny | delegate.
use crate::backend::{c_path, FailureValue, FsBackend};
use crate::boundary::ConfinementRoot;
use crate::config::Config;
use crate::diagnostics;
use crate::error::{JailError, Result};
use crate::guard::{with_guard, Entry};
use crate::policy::{CallPolicy, CheckTarget};
use crate::resolver::{resolve, resolve_containing_directory};
use libc::{c_int, c_void, mode_t, DIR};
use log::{debug, error, warn};
use std::ffi::CStr;
use std::fmt;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

struct CallArgs<'a>(&'a [&'a CStr]);

impl fmt::Display for CallArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// SUMMARY:
/// Confinement root plus the backend used to reach original implementations.
///
/// DETAILS:
/// `new` is `const` so the injected library can keep one instance in a `static`. The root
/// is set at most once; concurrent first calls may both capture it, the first store wins
/// and the other value is discarded.
pub struct ConfinementState<B> {
    backend: B,
    root: OnceLock<ConfinementRoot>,
}

impl<B: FsBackend> ConfinementState<B> {
    /// State whose root is captured from the working directory on first use.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            root: OnceLock::new(),
        }
    }

    /// State with an explicit, already canonical root. Never consults the working directory.
    pub fn with_root(backend: B, root: ConfinementRoot) -> Self {
        Self {
            backend,
            root: OnceLock::from(root),
        }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether the root has been established.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.root.get().is_some()
    }

    /// SUMMARY:
    /// Return the root, capturing it (and installing diagnostics) on first use.
    ///
    /// ERRORS:
    /// - `JailError::InitializationFailure`: the working directory is unreadable or cannot be
    ///   canonicalized. Nothing is stored; a later call retries.
    pub fn try_root(&self) -> Result<&ConfinementRoot> {
        if let Some(root) = self.root.get() {
            return Ok(root);
        }

        let config = Config::from_env();
        diagnostics::install(&config);
        let captured = ConfinementRoot::capture(&self.backend)?;
        let root = self.root.get_or_init(|| captured);
        debug!("confinement root = {}", root.path().display());
        Ok(root)
    }

    /// Like `try_root`, but terminates the process when the root cannot be established:
    /// there is no safe way to keep serving calls without one.
    pub fn root(&self) -> &ConfinementRoot {
        match self.try_root() {
            Ok(root) => root,
            Err(err) => {
                error!("{err}");
                let code = match err {
                    JailError::InitializationFailure { stage, .. } => stage.exit_code(),
                    _ => 1,
                };
                std::process::exit(code)
            }
        }
    }

    /// SUMMARY:
    /// Decide whether `call` may touch `path`.
    ///
    /// DETAILS:
    /// Resolves `path` according to `call.target` and checks the result with `call.mode`.
    /// A path with no resolvable ancestor is denied unless the `legacy-root-fallback`
    /// feature is enabled, in which case it is judged as `/`.
    pub fn authorize(&self, root: &ConfinementRoot, call: &CallPolicy, path: &Path) -> Result<()> {
        if call.exempt_fs_root && path.as_os_str().as_bytes() == b"/" {
            return Ok(());
        }

        let resolved = match call.target {
            CheckTarget::FullPath => resolve(&self.backend, path),
            CheckTarget::ContainingDirectory => resolve_containing_directory(&self.backend, path),
        };
        let canonical = match resolved {
            Ok(resolved) => resolved.path,
            #[cfg(feature = "legacy-root-fallback")]
            Err(JailError::ResolutionFailure { path: unresolved, .. }) => {
                warn!(
                    "{}: no ancestor of '{}' resolves, judging it as '/'",
                    call.name(),
                    unresolved.display()
                );
                PathBuf::from("/")
            }
            Err(err) => return Err(err),
        };

        root.check(call.name(), &canonical, call.mode)
    }

    /// SUMMARY:
    /// Run one intercepted call: check every path in `paths`, then invoke `upcall`.
    ///
    /// DETAILS:
    /// - Nested inside another intercepted call on this thread, `upcall` runs unchecked.
    /// - On the first failing path, errno is set from `JailError::errno`, a warning is
    ///   logged and the shape's failure value is returned; `upcall` is never invoked.
    /// - Otherwise `upcall`'s result (and errno) reach the caller unchanged.
    /// - The guard stays held while `upcall` runs and is released on every exit path.
    pub fn guarded<T: FailureValue>(
        &self,
        call: &CallPolicy,
        paths: &[&CStr],
        upcall: impl FnOnce(&B) -> T,
    ) -> T {
        with_guard(|entry| {
            if entry == Entry::Passthrough {
                return upcall(&self.backend);
            }

            let root = self.root();
            debug!("{}({})", call.name(), CallArgs(paths));

            for path in paths {
                if let Err(err) = self.authorize(root, call, c_path(path)) {
                    if err.is_denial() {
                        warn!("DENIED {err}");
                    } else {
                        warn!("REJECTED {err}");
                    }
                    err.errno().set();
                    return T::failure();
                }
            }

            debug!("{} allowed", call.name());
            upcall(&self.backend)
        })
    }
}

impl<B: FsBackend> FsBackend for ConfinementState<B> {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.backend.canonicalize(path)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        self.backend.current_dir()
    }

    unsafe fn status(&self, call: &CallPolicy, path: &CStr, buf: *mut c_void) -> c_int {
        self.guarded(call, &[path], |real| unsafe { real.status(call, path, buf) })
    }

    unsafe fn versioned_status(
        &self,
        call: &CallPolicy,
        ver: c_int,
        path: &CStr,
        buf: *mut c_void,
    ) -> c_int {
        self.guarded(call, &[path], |real| unsafe {
            real.versioned_status(call, ver, path, buf)
        })
    }

    fn remove(&self, call: &CallPolicy, path: &CStr) -> c_int {
        self.guarded(call, &[path], |real| real.remove(call, path))
    }

    fn two_paths(&self, call: &CallPolicy, from: &CStr, to: &CStr) -> c_int {
        self.guarded(call, &[from, to], |real| real.two_paths(call, from, to))
    }

    fn with_mode(&self, call: &CallPolicy, path: &CStr, mode: mode_t) -> c_int {
        self.guarded(call, &[path], |real| real.with_mode(call, path, mode))
    }

    fn open(&self, call: &CallPolicy, path: &CStr, flags: c_int, mode: mode_t) -> c_int {
        self.guarded(call, &[path], |real| real.open(call, path, flags, mode))
    }

    fn open_dir(&self, call: &CallPolicy, path: &CStr) -> *mut DIR {
        self.guarded(call, &[path], |real| real.open_dir(call, path))
    }
}
