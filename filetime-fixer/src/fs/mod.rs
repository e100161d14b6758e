use std::{ffi::OsString, fmt, io, path::Path, time::SystemTime};

pub mod host;
pub mod memory;

/// Name of the pseudo-entry a listing uses for the listed directory itself
pub const SELF_ENTRY: &str = ".";
/// Name of the pseudo-entry a listing uses for the parent directory
pub const PARENT_ENTRY: &str = "..";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// The two timestamps an entry is judged by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryTimes {
    pub created: SystemTime,
    pub modified: SystemTime,
}

impl EntryTimes {
    /// True if creation is strictly later than the last modification.
    pub fn needs_repair(&self) -> bool {
        self.created > self.modified
    }

    /// Creation time pulled back to the modification time, which is kept as is.
    pub fn repaired(self) -> Self {
        Self {
            created: self.modified,
            modified: self.modified,
        }
    }
}

/// One item of a directory listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Child {
    pub name: OsString,
    pub kind: EntryKind,
}

impl Child {
    pub fn is_self_entry(&self) -> bool {
        self.name == SELF_ENTRY
    }

    pub fn is_parent_entry(&self) -> bool {
        self.name == PARENT_ENTRY
    }
}

/// Filesystem operations the repair needs
///
/// Handles and listings hold their underlying resource until dropped.
pub trait Filesystem {
    type Handle;
    type Listing: Iterator<Item = io::Result<Child>>;

    fn open(&self, path: &Path, kind: EntryKind, access: Access) -> io::Result<Self::Handle>;

    fn times(&self, handle: &Self::Handle) -> io::Result<EntryTimes>;

    /// Write both timestamps in a single call.
    fn set_times(&self, handle: &Self::Handle, times: EntryTimes) -> io::Result<()>;

    /// List the immediate children of `path`, pseudo-entries included.
    fn list(&self, path: &Path) -> io::Result<Self::Listing>;
}

impl<T: Filesystem + ?Sized> Filesystem for &T {
    type Handle = T::Handle;
    type Listing = T::Listing;

    fn open(&self, path: &Path, kind: EntryKind, access: Access) -> io::Result<Self::Handle> {
        (**self).open(path, kind, access)
    }

    fn times(&self, handle: &Self::Handle) -> io::Result<EntryTimes> {
        (**self).times(handle)
    }

    fn set_times(&self, handle: &Self::Handle, times: EntryTimes) -> io::Result<()> {
        (**self).set_times(handle, times)
    }

    fn list(&self, path: &Path) -> io::Result<Self::Listing> {
        (**self).list(path)
    }
}
