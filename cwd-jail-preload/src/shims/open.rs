//! `open` and `open64`.
//!
//! The C prototypes are variadic; `mode` is only meaningful with `O_CREAT` or `O_TMPFILE`.
//! Taking it as a fixed third argument reads the same register the caller filled on the
//! x86_64 and Linux aarch64 calling conventions.
//! Apple arm64 passes variadic arguments on the stack, so `mode` is unreliable there;
//! the path check does not depend on it.
use super::path_arg;
use crate::JAIL;
use cwd_jail::{policy, CallPolicy, FsBackend};
use libc::{c_char, c_int, mode_t};

unsafe fn open_with(call: &CallPolicy, path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    match path_arg(call, path) {
        Some(path) => JAIL.open(call, path, flags, mode),
        None => -1,
    }
}

#[no_mangle]
pub unsafe extern "C" fn open(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    open_with(&policy::OPEN, path, flags, mode)
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn open64(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    open_with(&policy::OPEN64, path, flags, mode)
}
