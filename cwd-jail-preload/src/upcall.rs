//! Reaching the implementations this library shadows.
//!
//! Every original is looked up with `dlsym(RTLD_NEXT, name)`, i.e. in the objects loaded
//! after this one, by the symbol name carried in the call's `CallPolicy`. The lookup runs
//! on every call; the dynamic loader keeps its own cache.
use cwd_jail::{CallPolicy, FailureValue, FsBackend, JailError};
use libc::{c_char, c_int, c_uint, c_void, mode_t, DIR};
use log::error;
use std::ffi::CStr;
use std::ptr::NonNull;

type StatusFn = unsafe extern "C" fn(*const c_char, *mut c_void) -> c_int;
type VersionedStatusFn = unsafe extern "C" fn(c_int, *const c_char, *mut c_void) -> c_int;
type RemoveFn = unsafe extern "C" fn(*const c_char) -> c_int;
type TwoPathsFn = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;
type ModeFn = unsafe extern "C" fn(*const c_char, mode_t) -> c_int;
type OpenFn = unsafe extern "C" fn(*const c_char, c_int, ...) -> c_int;
type OpenDirFn = unsafe extern "C" fn(*const c_char) -> *mut DIR;

/// Address of the next definition of `symbol`, if any.
fn resolve_original(symbol: &CStr) -> Option<NonNull<c_void>> {
    NonNull::new(unsafe { libc::dlsym(libc::RTLD_NEXT, symbol.as_ptr()) })
}

fn unavailable<T: FailureValue>(call: &CallPolicy) -> T {
    let err = JailError::SymbolUnavailable {
        symbol: call.name(),
    };
    error!("{err}");
    err.errno().set();
    T::failure()
}

/// Look up `$call`'s original as `$ty` and evaluate `$body` with it bound to `$f`, or fail
/// with `ENOSYS` when no later object defines it.
macro_rules! with_original {
    ($call:expr, $ty:ty, |$f:ident| $body:expr) => {
        match resolve_original($call.symbol) {
            Some(sym) => {
                let $f = unsafe { std::mem::transmute::<*mut c_void, $ty>(sym.as_ptr()) };
                unsafe { $body }
            }
            None => unavailable($call),
        }
    };
}

/// The libc implementations, found at call time.
pub struct RealSystem;

impl FsBackend for RealSystem {
    unsafe fn status(&self, call: &CallPolicy, path: &CStr, buf: *mut c_void) -> c_int {
        with_original!(call, StatusFn, |f| f(path.as_ptr(), buf))
    }

    unsafe fn versioned_status(
        &self,
        call: &CallPolicy,
        ver: c_int,
        path: &CStr,
        buf: *mut c_void,
    ) -> c_int {
        with_original!(call, VersionedStatusFn, |f| f(ver, path.as_ptr(), buf))
    }

    fn remove(&self, call: &CallPolicy, path: &CStr) -> c_int {
        with_original!(call, RemoveFn, |f| f(path.as_ptr()))
    }

    fn two_paths(&self, call: &CallPolicy, from: &CStr, to: &CStr) -> c_int {
        with_original!(call, TwoPathsFn, |f| f(from.as_ptr(), to.as_ptr()))
    }

    fn with_mode(&self, call: &CallPolicy, path: &CStr, mode: mode_t) -> c_int {
        with_original!(call, ModeFn, |f| f(path.as_ptr(), mode))
    }

    fn open(&self, call: &CallPolicy, path: &CStr, flags: c_int, mode: mode_t) -> c_int {
        // `mode` travels as a promoted variadic argument.
        with_original!(call, OpenFn, |f| f(path.as_ptr(), flags, mode as c_uint))
    }

    fn open_dir(&self, call: &CallPolicy, path: &CStr) -> *mut DIR {
        with_original!(call, OpenDirFn, |f| f(path.as_ptr()))
    }
}
