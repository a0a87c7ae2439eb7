//! # cwd-jail-preload
//!
//! Injectable library that confines a process's filesystem calls to the directory it was
//! started in:
//!
//! ```text
//! cd /srv/exchange && LD_PRELOAD=/usr/lib/libcwd_jail_preload.so gs-netcat -l -i
//! ```
//!
//! Each exported symbol validates its path argument(s) with `cwd-jail` and then forwards
//! the call, arguments untouched, to the next definition of the same symbol. Denied calls
//! return `-1` (or a null `DIR *`) with `errno` set to `EACCES`. Set `GSOCKET_DEBUG` to
//! any non-empty value to get one diagnostic line per call on standard error.
#![allow(clippy::missing_safety_doc)]

use cwd_jail::ConfinementState;

mod shims;
mod upcall;

use upcall::RealSystem;

/// Process-wide confinement state shared by every exported symbol.
static JAIL: ConfinementState<RealSystem> = ConfinementState::new(RealSystem);
