//! Exported replacements for the confined libc symbols.
//!
//! Every shim rejects a null path with `EFAULT` and otherwise hands the call to `JAIL`
//! through the `FsBackend` method matching its shape.
use cwd_jail::{CallPolicy, JailError};
use libc::c_char;
use log::warn;
use std::ffi::CStr;

mod dir;
mod modify;
mod open;
mod stat;

/// Borrow a C path argument, or set `EFAULT` and return `None` when it is null.
///
/// # Safety
/// A non-null `path` must point to a NUL-terminated string that outlives the call.
unsafe fn path_arg<'a>(call: &CallPolicy, path: *const c_char) -> Option<&'a CStr> {
    if path.is_null() {
        let err = JailError::NullPath { call: call.name() };
        warn!("DENIED {err}");
        err.errno().set();
        return None;
    }
    Some(CStr::from_ptr(path))
}
