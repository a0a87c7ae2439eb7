//! Per-symbol confinement policy.
//!
//! Each intercepted symbol is described by one `CallPolicy` constant: which path gets
//! checked (the path itself or the directory that will contain it) and how strictly.
use crate::boundary::MatchMode;
use std::ffi::CStr;

/// Which path an intercepted call is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTarget {
    /// The argument itself, or its deepest existing ancestor.
    FullPath,
    /// The argument when it exists, else its parent directory; used by calls that may
    /// create it.
    ContainingDirectory,
}

/// SUMMARY:
/// Describe how one intercepted symbol is confined.
///
/// FIELDS:
/// - `symbol`: Name looked up to reach the original implementation.
/// - `target`: Path extraction strategy.
/// - `mode`: Match mode handed to the access predicate.
/// - `exempt_fs_root`: Forward a query on the literal `/` without checking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub symbol: &'static CStr,
    pub target: CheckTarget,
    pub mode: MatchMode,
    pub exempt_fs_root: bool,
}

impl CallPolicy {
    const fn full(symbol: &'static CStr, mode: MatchMode) -> Self {
        Self {
            symbol,
            target: CheckTarget::FullPath,
            mode,
            exempt_fs_root: false,
        }
    }

    const fn containing(symbol: &'static CStr) -> Self {
        Self {
            symbol,
            target: CheckTarget::ContainingDirectory,
            mode: MatchMode::Strict,
            exempt_fs_root: false,
        }
    }

    const fn root_probe(symbol: &'static CStr) -> Self {
        Self {
            exempt_fs_root: true,
            ..Self::full(symbol, MatchMode::Strict)
        }
    }

    /// Symbol name for diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.symbol.to_str().unwrap_or("?")
    }
}

// status, strict: `stat("/")` stays reachable for top-level probes
pub const STAT: CallPolicy = CallPolicy::root_probe(c"stat");
pub const STAT64: CallPolicy = CallPolicy::root_probe(c"stat64");
pub const XSTAT: CallPolicy = CallPolicy::root_probe(c"__xstat");
pub const XSTAT64: CallPolicy = CallPolicy::root_probe(c"__xstat64");
pub const STAT_INODE64: CallPolicy = CallPolicy::root_probe(c"stat$INODE64");

// status, link-aware: ancestors of the root are visible so clients can walk down to it
pub const LSTAT: CallPolicy = CallPolicy::full(c"lstat", MatchMode::PrefixRelaxed);
pub const LSTAT64: CallPolicy = CallPolicy::full(c"lstat64", MatchMode::PrefixRelaxed);
pub const LXSTAT: CallPolicy = CallPolicy::full(c"__lxstat", MatchMode::PrefixRelaxed);
pub const LXSTAT64: CallPolicy = CallPolicy::full(c"__lxstat64", MatchMode::PrefixRelaxed);
pub const LSTAT_INODE64: CallPolicy = CallPolicy::full(c"lstat$INODE64", MatchMode::PrefixRelaxed);

pub const STATVFS: CallPolicy = CallPolicy::full(c"statvfs", MatchMode::Strict);
pub const STATVFS64: CallPolicy = CallPolicy::full(c"statvfs64", MatchMode::Strict);

pub const OPENDIR: CallPolicy = CallPolicy::full(c"opendir", MatchMode::Strict);
pub const OPENDIR_INODE64: CallPolicy = CallPolicy::full(c"opendir$INODE64", MatchMode::Strict);

pub const UNLINK: CallPolicy = CallPolicy::full(c"unlink", MatchMode::Strict);
pub const RMDIR: CallPolicy = CallPolicy::full(c"rmdir", MatchMode::Strict);

pub const RENAME: CallPolicy = CallPolicy::full(c"rename", MatchMode::Strict);
pub const LINK: CallPolicy = CallPolicy::full(c"link", MatchMode::Strict);
pub const SYMLINK: CallPolicy = CallPolicy::full(c"symlink", MatchMode::Strict);

pub const MKDIR: CallPolicy = CallPolicy::containing(c"mkdir");
pub const CHMOD: CallPolicy = CallPolicy::containing(c"chmod");
pub const OPEN: CallPolicy = CallPolicy::containing(c"open");
pub const OPEN64: CallPolicy = CallPolicy::containing(c"open64");
