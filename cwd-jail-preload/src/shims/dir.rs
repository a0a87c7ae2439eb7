use super::path_arg;
use crate::JAIL;
use cwd_jail::{policy, CallPolicy, FsBackend};
use libc::{c_char, DIR};

unsafe fn open_dir(call: &CallPolicy, path: *const c_char) -> *mut DIR {
    match path_arg(call, path) {
        Some(path) => JAIL.open_dir(call, path),
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn opendir(path: *const c_char) -> *mut DIR {
    open_dir(&policy::OPENDIR, path)
}

#[cfg(all(target_os = "macos", target_arch = "x86_64"))]
#[export_name = "opendir$INODE64"]
pub unsafe extern "C" fn opendir_inode64(path: *const c_char) -> *mut DIR {
    open_dir(&policy::OPENDIR_INODE64, path)
}
