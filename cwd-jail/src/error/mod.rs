//! SUMMARY:
//! Define the error taxonomy shared by path resolution, access checks and initialization.
//!
//! OVERVIEW:
//! Every failure the engine can decide on its own is a `JailError`. The FFI surface never
//! sees these values directly: `JailError::errno()` maps each variant to the errno a caller
//! would get if the operating system itself had refused the operation, so a confined program
//! cannot tell a confinement denial from an ordinary one. Failures of the original
//! implementation are not represented here; their return value and errno pass through.
use nix::errno::Errno;
use std::io;
use std::path::{Path, PathBuf};

const MAX_ERROR_PATH_LEN: usize = 256;

// Internal helper: render error-friendly path display (truncate long values).
pub(crate) fn truncate_path_display(path: &Path, max_len: usize) -> String {
    let path_str = path.to_string_lossy();
    let char_count = path_str.chars().count();
    if char_count <= max_len {
        return path_str.into_owned();
    }
    let keep = max_len.saturating_sub(5) / 2;
    let start: String = path_str.chars().take(keep).collect();
    let mut tail_chars: Vec<char> = path_str.chars().rev().take(keep).collect();
    tail_chars.reverse();
    let end: String = tail_chars.into_iter().collect();
    format!("{start}...{end}")
}

fn display(path: &Path) -> String {
    truncate_path_display(path, MAX_ERROR_PATH_LEN)
}

/// Step of root capture that failed during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    /// The working directory could not be read.
    WorkingDirectory,
    /// The working directory could not be canonicalized.
    Canonicalize,
}

impl InitStage {
    /// Process exit status used when this stage fails.
    #[inline]
    pub fn exit_code(self) -> i32 {
        match self {
            InitStage::WorkingDirectory => 123,
            InitStage::Canonicalize => 124,
        }
    }
}

/// SUMMARY:
/// Represent every failure the confinement engine decides locally.
///
/// VARIANTS:
/// - `ResolutionFailure`: No leading prefix of the path could be canonicalized.
/// - `AccessDenied`: The resolved path lies outside the confinement root.
/// - `InitializationFailure`: The confinement root could not be established (fatal).
/// - `PathTooLong`: Directory extraction input reached `PATH_MAX`.
/// - `NullPath`: The caller passed a null path pointer.
/// - `SymbolUnavailable`: The original implementation of a symbol could not be located.
#[derive(Debug, thiserror::Error)]
pub enum JailError {
    #[error("cannot resolve any existing ancestor of '{}'", display(.path))]
    ResolutionFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "{call}: '{}' escapes confinement root '{}'",
        display(.attempted_path),
        display(.root)
    )]
    AccessDenied {
        call: &'static str,
        attempted_path: PathBuf,
        root: PathBuf,
    },

    #[error("cannot establish confinement root ({stage:?})")]
    InitializationFailure {
        stage: InitStage,
        #[source]
        source: io::Error,
    },

    #[error("path of {len} bytes exceeds the {limit}-byte limit")]
    PathTooLong { len: usize, limit: usize },

    #[error("{call}: null path argument")]
    NullPath { call: &'static str },

    #[error("original implementation of '{symbol}' not found")]
    SymbolUnavailable { symbol: &'static str },
}

impl JailError {
    #[inline]
    pub(crate) fn resolution_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ResolutionFailure {
            path: path.into(),
            source,
        }
    }

    #[inline]
    pub(crate) fn access_denied(call: &'static str, attempted_path: &Path, root: &Path) -> Self {
        Self::AccessDenied {
            call,
            attempted_path: attempted_path.to_path_buf(),
            root: root.to_path_buf(),
        }
    }

    #[inline]
    pub(crate) fn initialization_failure(stage: InitStage, source: io::Error) -> Self {
        Self::InitializationFailure { stage, source }
    }

    /// The errno a caller observes for this failure.
    pub fn errno(&self) -> Errno {
        match self {
            JailError::ResolutionFailure { .. } | JailError::AccessDenied { .. } => Errno::EACCES,
            JailError::InitializationFailure { source, .. } => source
                .raw_os_error()
                .map(Errno::from_raw)
                .unwrap_or(Errno::EACCES),
            JailError::PathTooLong { .. } => Errno::ENAMETOOLONG,
            JailError::NullPath { .. } => Errno::EFAULT,
            JailError::SymbolUnavailable { .. } => Errno::ENOSYS,
        }
    }

    /// True for the two failures that mean "the path is not inside the root".
    #[inline]
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            JailError::AccessDenied { .. } | JailError::ResolutionFailure { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, JailError>;
