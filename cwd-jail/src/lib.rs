//! # cwd-jail
//!
//! Confine the filesystem calls of an unmodified, unprivileged process to the directory it
//! was started in.
//!
//! This crate is the decision engine behind `cwd-jail-preload`, a library injected with
//! `LD_PRELOAD` (or `DYLD_INSERT_LIBRARIES`) into a server such as a restricted
//! file-transfer daemon. The injected library exports `stat`, `lstat`, `opendir`, `open`,
//! `mkdir`, `unlink`, `rmdir`, `rename`, `link`, `symlink`, `chmod` and `statvfs`; each one
//! lands in [`ConfinementState`], which:
//!
//! 1. captures the canonical working directory as the confinement root on first use,
//! 2. resolves the path argument(s) with [`resolver::resolve`], degrading to the deepest
//!    existing ancestor when the target does not exist yet,
//! 3. asks [`ConfinementRoot::is_allowed`] whether the result stays inside the root, and
//! 4. either fails with `EACCES` or forwards the call, unchanged, to the original.
//!
//! ## Match modes
//!
//! Every call is checked with [`MatchMode::Strict`] except `lstat`, which uses
//! [`MatchMode::PrefixRelaxed`]: many clients `lstat` each ancestor on their way from `/`
//! down to their target, and denying `lstat("/home")` when the root is
//! `/home/user/downloads` would break them. Only the ancestors themselves become visible.
//!
//! ## Example
//!
//! ```rust
//! use cwd_jail::{ConfinementRoot, MatchMode};
//! use std::path::Path;
//!
//! let root = ConfinementRoot::new("/srv/data");
//! assert!(root.is_allowed(Path::new("/srv/data/sub"), MatchMode::Strict));
//! assert!(!root.is_allowed(Path::new("/etc/sub"), MatchMode::Strict));
//! assert!(root.is_allowed(Path::new("/srv"), MatchMode::PrefixRelaxed));
//! ```
//!
//! ## What this does not do
//!
//! Only the listed calls are confined. File descriptors opened before injection, `*at`
//! variants, process and network operations, and code that disables the preload are all
//! outside its reach. It is a compatibility-friendly fence, not a kernel sandbox.

pub mod backend;
pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod guard;
pub mod policy;
pub mod resolver;
pub mod state;

pub use backend::{c_path, FailureValue, FsBackend};
pub use boundary::{ConfinementRoot, MatchMode};
pub use config::Config;
pub use error::{InitStage, JailError, Result};
pub use guard::{with_guard, Entry, ReentryGuard};
pub use policy::{CallPolicy, CheckTarget};
pub use resolver::{resolve, resolve_containing_directory, Resolved};
pub use state::ConfinementState;

#[cfg(test)]
mod tests;
