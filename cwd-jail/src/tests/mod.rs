//! Shared test backend and cross-module scenarios.
//!
//! `FakeFs` answers canonicalization either from an in-memory tree (deterministic roots
//! such as `/srv/data`) or from the host filesystem (temp directories with real symlinks),
//! and records every call that reaches it instead of performing it.
use crate::backend::FsBackend;
use crate::policy::CallPolicy;
use libc::{c_int, c_void, mode_t, DIR};
use nix::errno::Errno;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ffi::{CStr, OsString};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;


const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Upcall {
    pub symbol: &'static str,
    pub paths: Vec<PathBuf>,
}

impl Upcall {
    pub fn new(symbol: &'static str, paths: &[&str]) -> Self {
        Self {
            symbol,
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }
}

#[derive(Debug, Default)]
struct Tree {
    dirs: BTreeSet<PathBuf>,
    symlinks: BTreeMap<PathBuf, PathBuf>,
}

impl Tree {
    fn canonicalize(&self, absolute: &Path) -> io::Result<PathBuf> {
        let root = Path::new("/");
        if !self.dirs.contains(root) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }

        let mut pending: VecDeque<OsString> = components(absolute);
        let mut current = root.to_path_buf();
        let mut hops = 0;
        while let Some(part) = pending.pop_front() {
            if part == "." {
                continue;
            }
            if part == ".." {
                current.pop();
                continue;
            }
            current.push(&part);
            if let Some(target) = self.symlinks.get(&current) {
                hops += 1;
                if hops > MAX_SYMLINK_HOPS {
                    return Err(io::Error::from_raw_os_error(libc::ELOOP));
                }
                current.pop();
                if target.is_absolute() {
                    current = root.to_path_buf();
                }
                for part in components(target).into_iter().rev() {
                    pending.push_front(part);
                }
            } else if !self.dirs.contains(&current) {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
        }
        Ok(current)
    }
}

fn components(path: &Path) -> VecDeque<OsString> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_os_string()),
            Component::ParentDir => Some(OsString::from("..")),
            Component::CurDir => Some(OsString::from(".")),
            Component::RootDir | Component::Prefix(_) => None,
        })
        .collect()
}

type Hook = Box<dyn Fn() + Send + Sync>;

pub(crate) struct FakeFs {
    cwd: Mutex<Option<PathBuf>>,
    // None: answer from the host filesystem.
    tree: Option<Tree>,
    calls: Mutex<Vec<Upcall>>,
    failure: Option<Errno>,
    on_canonicalize: Option<Hook>,
}

impl FakeFs {
    /// In-memory tree holding `existing` (and all their ancestors) plus `/`.
    pub fn new(cwd: impl Into<PathBuf>, existing: &[&str]) -> Self {
        let mut tree = Tree::default();
        tree.dirs.insert(PathBuf::from("/"));
        for path in existing {
            for ancestor in Path::new(path).ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    tree.dirs.insert(ancestor.to_path_buf());
                }
            }
        }
        Self {
            cwd: Mutex::new(Some(cwd.into())),
            tree: Some(tree),
            calls: Mutex::new(Vec::new()),
            failure: None,
            on_canonicalize: None,
        }
    }

    /// Host filesystem, with relative paths resolved against `cwd` instead of the test
    /// process's working directory.
    pub fn host_with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            tree: None,
            ..Self::new(cwd, &[])
        }
    }

    /// In-memory tree with no readable working directory.
    pub fn without_cwd() -> Self {
        let fake = Self::new("/", &[]);
        *fake.cwd.lock().unwrap() = None;
        fake
    }

    pub fn without_fs_root(mut self) -> Self {
        if let Some(tree) = self.tree.as_mut() {
            tree.dirs.remove(Path::new("/"));
        }
        self
    }

    pub fn with_symlink(mut self, link: &str, target: &str) -> Self {
        if let Some(tree) = self.tree.as_mut() {
            tree.symlinks
                .insert(PathBuf::from(link), PathBuf::from(target));
        }
        self
    }

    /// Every forwarded call fails with `errno`, like a real filesystem error.
    pub fn failing_with(mut self, errno: Errno) -> Self {
        self.failure = Some(errno);
        self
    }

    pub fn on_canonicalize(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_canonicalize = Some(Box::new(hook));
        self
    }

    pub fn set_cwd(&self, cwd: &str) {
        *self.cwd.lock().unwrap() = Some(PathBuf::from(cwd));
    }

    pub fn calls(&self) -> Vec<Upcall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &CallPolicy, paths: &[&CStr]) -> c_int {
        self.calls.lock().unwrap().push(Upcall {
            symbol: call.name(),
            paths: paths
                .iter()
                .map(|p| crate::backend::c_path(p).to_path_buf())
                .collect(),
        });
        match self.failure {
            Some(errno) => {
                errno.set();
                -1
            }
            None => 0,
        }
    }
}

impl FsBackend for FakeFs {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        if let Some(hook) = &self.on_canonicalize {
            hook();
        }
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir()?.join(path)
        };
        match &self.tree {
            Some(tree) => tree.canonicalize(&absolute),
            None => std::fs::canonicalize(absolute),
        }
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        self.cwd
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    unsafe fn status(&self, call: &CallPolicy, path: &CStr, _buf: *mut c_void) -> c_int {
        self.record(call, &[path])
    }

    unsafe fn versioned_status(
        &self,
        call: &CallPolicy,
        _ver: c_int,
        path: &CStr,
        _buf: *mut c_void,
    ) -> c_int {
        self.record(call, &[path])
    }

    fn remove(&self, call: &CallPolicy, path: &CStr) -> c_int {
        self.record(call, &[path])
    }

    fn two_paths(&self, call: &CallPolicy, from: &CStr, to: &CStr) -> c_int {
        self.record(call, &[from, to])
    }

    fn with_mode(&self, call: &CallPolicy, path: &CStr, _mode: mode_t) -> c_int {
        self.record(call, &[path])
    }

    fn open(&self, call: &CallPolicy, path: &CStr, _flags: c_int, _mode: mode_t) -> c_int {
        match self.record(call, &[path]) {
            0 => 3,
            failed => failed,
        }
    }

    fn open_dir(&self, call: &CallPolicy, path: &CStr) -> *mut DIR {
        match self.record(call, &[path]) {
            0 => std::ptr::NonNull::<DIR>::dangling().as_ptr(),
            _ => std::ptr::null_mut(),
        }
    }
}
