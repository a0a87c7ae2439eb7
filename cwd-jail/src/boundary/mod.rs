//! SUMMARY:
//! Hold the confinement root and decide whether a canonical path may be touched.
//!
//! OVERVIEW:
//! The predicate is a byte-for-byte prefix comparison against the canonical root. It never
//! touches the filesystem: callers hand it paths already produced by the resolver.
//!
//! Two literals are always allowed: the null device and `.`. The latter is what the
//! directory-extraction helper yields for a bare relative file name.
use crate::backend::FsBackend;
use crate::error::{InitStage, JailError, Result};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

pub(crate) const NULL_DEVICE: &[u8] = b"/dev/null";
pub(crate) const CURRENT_DIR: &[u8] = b".";

/// True for the literals that bypass resolution and the predicate.
#[inline]
pub(crate) fn is_always_allowed(path: &[u8]) -> bool {
    path == NULL_DEVICE || path == CURRENT_DIR
}

/// How a canonical path is compared to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The path must be the root or lie below it.
    Strict,
    /// Like `Strict`, but ancestors of the root are also allowed so a client can walk
    /// from `/` down to it. Reserved for link-aware status queries.
    PrefixRelaxed,
}

/// SUMMARY:
/// The canonical directory every intercepted path must stay within.
///
/// DETAILS:
/// Built from the working directory at first use (see `capture`) or, in tests, from an
/// explicit canonical path. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfinementRoot {
    path: PathBuf,
}

impl ConfinementRoot {
    /// Wrap a path that is already canonical. No filesystem access.
    #[inline]
    pub fn new(canonical: impl Into<PathBuf>) -> Self {
        Self {
            path: canonical.into(),
        }
    }

    /// SUMMARY:
    /// Capture the canonical working directory of the process as the root.
    ///
    /// ERRORS:
    /// - `JailError::InitializationFailure` with `InitStage::WorkingDirectory` when the
    ///   working directory cannot be read.
    /// - `JailError::InitializationFailure` with `InitStage::Canonicalize` when it cannot
    ///   be canonicalized.
    pub fn capture<B: FsBackend + ?Sized>(backend: &B) -> Result<Self> {
        let cwd = backend
            .current_dir()
            .map_err(|e| JailError::initialization_failure(InitStage::WorkingDirectory, e))?;
        let canonical = backend
            .canonicalize(&cwd)
            .map_err(|e| JailError::initialization_failure(InitStage::Canonicalize, e))?;
        Ok(Self::new(canonical))
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// SUMMARY:
    /// Decide whether `candidate` (canonical) is inside the root under `mode`.
    ///
    /// DETAILS:
    /// - `/dev/null` and `.` are always allowed.
    /// - At or beyond the root's length both modes require the root as a byte prefix.
    /// - Shorter than the root, only `PrefixRelaxed` allows it, and only when the candidate
    ///   is a non-empty byte prefix of the root.
    pub fn is_allowed(&self, candidate: &Path, mode: MatchMode) -> bool {
        let candidate = candidate.as_os_str().as_bytes();
        if is_always_allowed(candidate) {
            return true;
        }

        let root = self.path.as_os_str().as_bytes();
        if candidate.len() >= root.len() {
            return candidate.starts_with(root);
        }

        match mode {
            MatchMode::Strict => false,
            MatchMode::PrefixRelaxed => !candidate.is_empty() && root.starts_with(candidate),
        }
    }

    /// Like `is_allowed`, reporting a denial as `JailError::AccessDenied` for `call`.
    pub fn check(&self, call: &'static str, candidate: &Path, mode: MatchMode) -> Result<()> {
        if self.is_allowed(candidate, mode) {
            Ok(())
        } else {
            Err(JailError::access_denied(call, candidate, &self.path))
        }
    }
}
