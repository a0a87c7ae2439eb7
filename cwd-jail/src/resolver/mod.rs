//! SUMMARY:
//! Turn an arbitrary caller-supplied path into the canonical path the access predicate judges.
//!
//! OVERVIEW:
//! Calls such as `mkdir` or `rename` must be checked before their target exists, so
//! resolution degrades to the deepest existing ancestor instead of failing: the trailing
//! component is stripped at the last separator and canonicalization is retried until a
//! prefix resolves. The ancestor is an upper bound for where the kernel can land, because
//! the kernel cannot walk through a component that does not exist.
//!
//! All work is on raw bytes; paths need not be UTF-8.
use crate::backend::FsBackend;
use crate::boundary::{is_always_allowed, NULL_DEVICE};
use crate::error::{JailError, Result};
use log::trace;
use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Longest input accepted by `resolve_containing_directory`, in bytes.
pub const MAX_PATH_LEN: usize = libc::PATH_MAX as usize;

/// SUMMARY:
/// Outcome of resolving one path.
///
/// FIELDS:
/// - `path`: Canonical path of the input, or of its deepest existing ancestor.
/// - `existing`: True when `path` is the canonical form of the whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub existing: bool,
}

impl Resolved {
    #[inline]
    fn literal(bytes: &[u8]) -> Self {
        Self {
            path: PathBuf::from(OsStr::from_bytes(bytes)),
            existing: true,
        }
    }
}

#[inline]
fn as_path(bytes: &[u8]) -> &Path {
    Path::new(OsStr::from_bytes(bytes))
}

/// SUMMARY:
/// Resolve `input` to its canonical form, or to the canonical form of its deepest existing
/// ancestor.
///
/// DETAILS:
/// - `/dev/null` and `.` are returned unchanged without touching the filesystem.
/// - A relative input whose separators are exhausted falls back to its implicit base,
///   the working directory.
/// - The ancestor only bounds the input while the missing tail cannot climb back out of it.
///   A tail containing `..` (`nope/../../etc`) escapes as soon as `nope` is created, which
///   matters for stored paths such as symlink targets, so it is reported as unresolvable.
///
/// ERRORS:
/// - `JailError::ResolutionFailure`: not even `/` (absolute input) or the working directory
///   (relative input) could be canonicalized, or the missing tail contains `..`.
pub fn resolve<B: FsBackend + ?Sized>(backend: &B, input: &Path) -> Result<Resolved> {
    let bytes = input.as_os_str().as_bytes();
    if is_always_allowed(bytes) {
        return Ok(Resolved::literal(bytes));
    }

    if let Ok(path) = backend.canonicalize(input) {
        return Ok(Resolved {
            path,
            existing: true,
        });
    }

    let mut prefix = bytes;
    loop {
        let Some(cut) = prefix.iter().rposition(|&b| b == b'/') else {
            if climbs_out(bytes) {
                return Err(JailError::resolution_failure(input, missing_parent()));
            }
            // Relative input with no separator left: its base is the working directory.
            trace!("'{}': falling back to the working directory", input.display());
            return backend
                .canonicalize(Path::new("."))
                .map(|path| Resolved {
                    path,
                    existing: false,
                })
                .map_err(|e| JailError::resolution_failure(input, e));
        };

        prefix = &prefix[..cut];
        if climbs_out(&bytes[cut..]) {
            return Err(JailError::resolution_failure(input, missing_parent()));
        }
        let candidate: &[u8] = if prefix.is_empty() { b"/" } else { prefix };
        trace!(
            "'{}': trying ancestor '{}'",
            input.display(),
            as_path(candidate).display()
        );

        match backend.canonicalize(as_path(candidate)) {
            Ok(path) => {
                return Ok(Resolved {
                    path,
                    existing: false,
                })
            }
            Err(e) if candidate == b"/" => return Err(JailError::resolution_failure(input, e)),
            Err(_) => {}
        }
    }
}

/// True when `tail` has a `..` component.
fn climbs_out(tail: &[u8]) -> bool {
    tail.split(|&b| b == b'/').any(|component| component == b"..")
}

fn missing_parent() -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        "'..' follows a component that does not exist",
    )
}

/// SUMMARY:
/// Return the directory component of `path`, following POSIX `dirname`.
///
/// DETAILS:
/// `""` and `"file"` give `.`, `"/file"` and `"//"` give `/`, trailing separators are
/// ignored (`"a/b/"` gives `a`) and repeated separators collapse (`"a//b"` gives `a`).
pub fn dirname(path: &[u8]) -> &[u8] {
    let trimmed_len = path.iter().rposition(|&b| b != b'/').map_or(0, |i| i + 1);
    if trimmed_len == 0 {
        return if path.is_empty() { b"." } else { b"/" };
    }

    let Some(last_sep) = path[..trimmed_len].iter().rposition(|&b| b == b'/') else {
        return b".";
    };

    let dir_len = path[..last_sep]
        .iter()
        .rposition(|&b| b != b'/')
        .map_or(0, |i| i + 1);
    if dir_len == 0 {
        b"/"
    } else {
        &path[..dir_len]
    }
}

/// SUMMARY:
/// Resolve what a possibly-creating call on `file` will touch.
///
/// DETAILS:
/// Used by calls that may create their target. An existing `file` (a symlink is followed,
/// as the call itself would follow it) resolves to its own canonical path. Otherwise the
/// directory that will contain it is resolved. `/dev/null` is returned unchanged.
///
/// ERRORS:
/// - `JailError::PathTooLong`: `file` is `MAX_PATH_LEN` bytes or longer.
/// - `JailError::ResolutionFailure`: see `resolve`.
pub fn resolve_containing_directory<B: FsBackend + ?Sized>(
    backend: &B,
    file: &Path,
) -> Result<Resolved> {
    let bytes = file.as_os_str().as_bytes();
    if bytes == NULL_DEVICE {
        return Ok(Resolved::literal(bytes));
    }
    if bytes.len() >= MAX_PATH_LEN {
        return Err(JailError::PathTooLong {
            len: bytes.len(),
            limit: MAX_PATH_LEN,
        });
    }
    if let Ok(path) = backend.canonicalize(file) {
        return Ok(Resolved {
            path,
            existing: true,
        });
    }
    resolve(backend, as_path(dirname(bytes)))
}

#[cfg(test)]
mod tests;
