//! Calls that create, remove, move or re-permission a path.
use super::path_arg;
use crate::JAIL;
use cwd_jail::{policy, FsBackend};
use libc::{c_char, c_int, mode_t};

#[no_mangle]
pub unsafe extern "C" fn unlink(path: *const c_char) -> c_int {
    let Some(path) = path_arg(&policy::UNLINK, path) else {
        return -1;
    };
    JAIL.remove(&policy::UNLINK, path)
}

#[no_mangle]
pub unsafe extern "C" fn rmdir(path: *const c_char) -> c_int {
    let Some(path) = path_arg(&policy::RMDIR, path) else {
        return -1;
    };
    JAIL.remove(&policy::RMDIR, path)
}

#[no_mangle]
pub unsafe extern "C" fn rename(old: *const c_char, new: *const c_char) -> c_int {
    let (Some(old), Some(new)) = (path_arg(&policy::RENAME, old), path_arg(&policy::RENAME, new))
    else {
        return -1;
    };
    JAIL.two_paths(&policy::RENAME, old, new)
}

#[no_mangle]
pub unsafe extern "C" fn link(target: *const c_char, link_path: *const c_char) -> c_int {
    let (Some(target), Some(link_path)) =
        (path_arg(&policy::LINK, target), path_arg(&policy::LINK, link_path))
    else {
        return -1;
    };
    JAIL.two_paths(&policy::LINK, target, link_path)
}

// The target is checked as a path too, even though the kernel never resolves it here.
#[no_mangle]
pub unsafe extern "C" fn symlink(target: *const c_char, link_path: *const c_char) -> c_int {
    let (Some(target), Some(link_path)) = (
        path_arg(&policy::SYMLINK, target),
        path_arg(&policy::SYMLINK, link_path),
    ) else {
        return -1;
    };
    JAIL.two_paths(&policy::SYMLINK, target, link_path)
}

#[no_mangle]
pub unsafe extern "C" fn mkdir(path: *const c_char, mode: mode_t) -> c_int {
    let Some(path) = path_arg(&policy::MKDIR, path) else {
        return -1;
    };
    JAIL.with_mode(&policy::MKDIR, path, mode)
}

#[no_mangle]
pub unsafe extern "C" fn chmod(path: *const c_char, mode: mode_t) -> c_int {
    let Some(path) = path_arg(&policy::CHMOD, path) else {
        return -1;
    };
    JAIL.with_mode(&policy::CHMOD, path, mode)
}
