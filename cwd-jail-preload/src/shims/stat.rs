//! Status queries: `stat`, `lstat`, `statvfs` and the variants libc builds them on.
//!
//! glibc before 2.33 routes `stat`/`lstat` through `__xstat`/`__lxstat`; macOS on x86_64
//! links them as `stat$INODE64`/`lstat$INODE64`. Both spellings are exported.
use super::path_arg;
use crate::JAIL;
use cwd_jail::{policy, CallPolicy, FsBackend};
use libc::{c_char, c_int, c_void};

unsafe fn status(call: &CallPolicy, path: *const c_char, buf: *mut c_void) -> c_int {
    match path_arg(call, path) {
        Some(path) => JAIL.status(call, path, buf),
        None => -1,
    }
}

unsafe fn versioned_status(
    call: &CallPolicy,
    ver: c_int,
    path: *const c_char,
    buf: *mut c_void,
) -> c_int {
    match path_arg(call, path) {
        Some(path) => JAIL.versioned_status(call, ver, path, buf),
        None => -1,
    }
}

#[no_mangle]
pub unsafe extern "C" fn stat(path: *const c_char, buf: *mut libc::stat) -> c_int {
    status(&policy::STAT, path, buf.cast())
}

#[no_mangle]
pub unsafe extern "C" fn lstat(path: *const c_char, buf: *mut libc::stat) -> c_int {
    status(&policy::LSTAT, path, buf.cast())
}

#[no_mangle]
pub unsafe extern "C" fn statvfs(path: *const c_char, buf: *mut libc::statvfs) -> c_int {
    status(&policy::STATVFS, path, buf.cast())
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn stat64(path: *const c_char, buf: *mut c_void) -> c_int {
    status(&policy::STAT64, path, buf)
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn lstat64(path: *const c_char, buf: *mut c_void) -> c_int {
    status(&policy::LSTAT64, path, buf)
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn statvfs64(path: *const c_char, buf: *mut c_void) -> c_int {
    status(&policy::STATVFS64, path, buf)
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn __xstat(ver: c_int, path: *const c_char, buf: *mut c_void) -> c_int {
    versioned_status(&policy::XSTAT, ver, path, buf)
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn __lxstat(ver: c_int, path: *const c_char, buf: *mut c_void) -> c_int {
    versioned_status(&policy::LXSTAT, ver, path, buf)
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn __xstat64(ver: c_int, path: *const c_char, buf: *mut c_void) -> c_int {
    versioned_status(&policy::XSTAT64, ver, path, buf)
}

#[cfg(target_os = "linux")]
#[no_mangle]
pub unsafe extern "C" fn __lxstat64(ver: c_int, path: *const c_char, buf: *mut c_void) -> c_int {
    versioned_status(&policy::LXSTAT64, ver, path, buf)
}

#[cfg(all(target_os = "macos", target_arch = "x86_64"))]
#[export_name = "stat$INODE64"]
pub unsafe extern "C" fn stat_inode64(path: *const c_char, buf: *mut c_void) -> c_int {
    status(&policy::STAT_INODE64, path, buf)
}

#[cfg(all(target_os = "macos", target_arch = "x86_64"))]
#[export_name = "lstat$INODE64"]
pub unsafe extern "C" fn lstat_inode64(path: *const c_char, buf: *mut c_void) -> c_int {
    status(&policy::LSTAT_INODE64, path, buf)
}
