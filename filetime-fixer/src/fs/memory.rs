//! An in-memory filesystem
//!
//! Every path can be told to fail at a specific step, and the tree keeps
//! count of timestamp writes and of handles still open, so callers can
//! check what actually happened.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    rc::Rc,
    vec,
};

use super::{Access, Child, EntryKind, EntryTimes, Filesystem, PARENT_ENTRY, SELF_ENTRY};

/// Steps at which operations on one path fail
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Faults {
    pub open_read: bool,
    pub read_times: bool,
    pub open_write: bool,
    pub write_times: bool,
    pub list: bool,
    /// Listing fails after yielding this many real children.
    pub list_after: Option<usize>,
}

#[derive(Clone, Debug)]
struct Node {
    kind: EntryKind,
    times: EntryTimes,
    /// Insertion order is listing order.
    children: Vec<OsString>,
    faults: Faults,
}

#[derive(Debug, Default)]
pub struct MemoryFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    open_handles: Rc<Cell<usize>>,
    writes: Cell<usize>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir<P: AsRef<Path>>(&self, path: P, times: EntryTimes) -> &Self {
        self.insert(path.as_ref(), EntryKind::Directory, times)
    }

    pub fn add_file<P: AsRef<Path>>(&self, path: P, times: EntryTimes) -> &Self {
        self.insert(path.as_ref(), EntryKind::File, times)
    }

    pub fn inject<P: AsRef<Path>>(&self, path: P, faults: Faults) -> &Self {
        if let Some(node) = self.nodes.borrow_mut().get_mut(path.as_ref()) {
            node.faults = faults;
        }
        self
    }

    pub fn times_of<P: AsRef<Path>>(&self, path: P) -> Option<EntryTimes> {
        self.nodes.borrow().get(path.as_ref()).map(|node| node.times)
    }

    /// Number of successful timestamp writes so far
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Number of handles and listings not yet dropped
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }

    fn insert(&self, path: &Path, kind: EntryKind, times: EntryTimes) -> &Self {
        let mut nodes = self.nodes.borrow_mut();
        let node = Node {
            kind,
            times,
            children: Vec::new(),
            faults: Faults::default(),
        };
        if nodes.insert(path.to_path_buf(), node).is_none() {
            let parent = path.parent().and_then(|parent| nodes.get_mut(parent));
            if let (Some(parent), Some(name)) = (parent, path.file_name()) {
                parent.children.push(name.to_os_string());
            }
        }
        self
    }

    fn with_node<T>(
        &self,
        path: &Path,
        f: impl FnOnce(&mut Node) -> io::Result<T>,
    ) -> io::Result<T> {
        let mut nodes = self.nodes.borrow_mut();
        match nodes.get_mut(path) {
            Some(node) => f(node),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{path:?} does not exist"),
            )),
        }
    }
}

fn injected(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("injected failure: {what}"),
    )
}

/// Keeps [`MemoryFs::open_handles`] accurate for as long as it lives.
#[derive(Debug)]
struct OpenGuard(Rc<Cell<usize>>);

impl OpenGuard {
    fn new(count: &Rc<Cell<usize>>) -> Self {
        count.set(count.get() + 1);
        Self(count.clone())
    }
}

impl Drop for OpenGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[derive(Debug)]
pub struct MemoryHandle {
    path: PathBuf,
    access: Access,
    _guard: OpenGuard,
}

#[derive(Debug)]
pub struct MemoryListing {
    items: vec::IntoIter<io::Result<Child>>,
    _guard: OpenGuard,
}

impl Iterator for MemoryListing {
    type Item = io::Result<Child>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

impl Filesystem for MemoryFs {
    type Handle = MemoryHandle;
    type Listing = MemoryListing;

    fn open(&self, path: &Path, _kind: EntryKind, access: Access) -> io::Result<MemoryHandle> {
        self.with_node(path, |node| {
            let failed = match access {
                Access::Read => node.faults.open_read,
                Access::Write => node.faults.open_write,
            };
            if failed {
                return Err(injected("open"));
            }
            Ok(())
        })?;
        Ok(MemoryHandle {
            path: path.to_path_buf(),
            access,
            _guard: OpenGuard::new(&self.open_handles),
        })
    }

    fn times(&self, handle: &MemoryHandle) -> io::Result<EntryTimes> {
        self.with_node(&handle.path, |node| {
            if node.faults.read_times {
                return Err(injected("read times"));
            }
            Ok(node.times)
        })
    }

    fn set_times(&self, handle: &MemoryHandle, times: EntryTimes) -> io::Result<()> {
        if handle.access != Access::Write {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "handle is not opened for writing",
            ));
        }
        self.with_node(&handle.path, |node| {
            if node.faults.write_times {
                return Err(injected("write times"));
            }
            node.times = times;
            Ok(())
        })?;
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn list(&self, path: &Path) -> io::Result<MemoryListing> {
        let nodes = self.nodes.borrow();
        let node = nodes.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{path:?} does not exist"))
        })?;
        if node.kind != EntryKind::Directory {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{path:?} is not a directory"),
            ));
        }
        if node.faults.list {
            return Err(injected("list"));
        }

        let mut items = vec![
            Ok(Child {
                name: SELF_ENTRY.into(),
                kind: EntryKind::Directory,
            }),
            Ok(Child {
                name: PARENT_ENTRY.into(),
                kind: EntryKind::Directory,
            }),
        ];
        for (index, name) in node.children.iter().enumerate() {
            if node.faults.list_after == Some(index) {
                items.push(Err(injected("list step")));
                break;
            }
            let kind = nodes[&path.join(name)].kind;
            items.push(Ok(Child {
                name: name.clone(),
                kind,
            }));
        }
        Ok(MemoryListing {
            items: items.into_iter(),
            _guard: OpenGuard::new(&self.open_handles),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;

    fn times(created: u64, modified: u64) -> EntryTimes {
        EntryTimes {
            created: SystemTime::UNIX_EPOCH + Duration::from_secs(created),
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(modified),
        }
    }

    fn names(fs: &MemoryFs, path: &str) -> Vec<String> {
        fs.list(Path::new(path))
            .unwrap()
            .map(|child| child.unwrap().name.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn lists_pseudo_entries_then_children_in_insertion_order() {
        let fs = MemoryFs::new();
        fs.add_dir("/r", times(0, 0))
            .add_file("/r/z", times(0, 0))
            .add_dir("/r/a", times(0, 0));
        assert_eq!(names(&fs, "/r"), [".", "..", "z", "a"]);
    }

    #[test]
    fn list_fault_stops_after_given_children() {
        let fs = MemoryFs::new();
        fs.add_dir("/r", times(0, 0))
            .add_file("/r/a", times(0, 0))
            .add_file("/r/b", times(0, 0))
            .inject(
                "/r",
                Faults {
                    list_after: Some(1),
                    ..Default::default()
                },
            );
        let items: Vec<_> = fs.list(Path::new("/r")).unwrap().collect();
        assert_eq!(items.len(), 4);
        assert!(items[3].is_err());
    }

    #[test]
    fn writes_need_a_write_handle() {
        let fs = MemoryFs::new();
        fs.add_file("/f", times(2, 1));
        let read = fs.open(Path::new("/f"), EntryKind::File, Access::Read).unwrap();
        assert!(fs.set_times(&read, times(1, 1)).is_err());
        let write = fs.open(Path::new("/f"), EntryKind::File, Access::Write).unwrap();
        fs.set_times(&write, times(1, 1)).unwrap();
        assert_eq!(fs.times_of("/f"), Some(times(1, 1)));
        assert_eq!(fs.writes(), 1);
    }

    #[test]
    fn open_handles_are_tracked() {
        let fs = MemoryFs::new();
        fs.add_dir("/r", times(0, 0));
        let handle = fs.open(Path::new("/r"), EntryKind::Directory, Access::Read).unwrap();
        let listing = fs.list(Path::new("/r")).unwrap();
        assert_eq!(fs.open_handles(), 2);
        drop(handle);
        drop(listing);
        assert_eq!(fs.open_handles(), 0);
    }

    #[test]
    fn missing_paths_are_not_found() {
        let fs = MemoryFs::new();
        let error = fs
            .open(Path::new("/nope"), EntryKind::File, Access::Read)
            .unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }
}
