use std::{
    ffi::OsStr,
    fs::{self, File, FileType, OpenOptions, ReadDir},
    io,
    path::Path,
};

use super::{Access, Child, EntryKind, EntryTimes, Filesystem, SELF_ENTRY};

/// The filesystem of the running system, through `std::fs`
#[derive(Clone, Copy, Debug, Default)]
pub struct HostFs;

impl Filesystem for HostFs {
    type Handle = File;
    type Listing = HostListing;

    fn open(&self, path: &Path, kind: EntryKind, access: Access) -> io::Result<File> {
        open_options(kind, access).open(path)
    }

    fn times(&self, file: &File) -> io::Result<EntryTimes> {
        let metadata = file.metadata()?;
        Ok(EntryTimes {
            created: metadata.created()?,
            modified: metadata.modified()?,
        })
    }

    fn set_times(&self, file: &File, times: EntryTimes) -> io::Result<()> {
        set_file_times(file, times)
    }

    fn list(&self, path: &Path) -> io::Result<HostListing> {
        let inner = fs::read_dir(path)?;
        Ok(HostListing {
            self_pending: true,
            inner,
        })
    }
}

/// Listing of a host directory
///
/// `read_dir` never yields `.`, so it is emitted here before the real children.
///
/// Kinds come from the entry itself, links are not followed: a symbolic link
/// (or a Windows junction) to a directory is listed as a file and never
/// recursed into.
#[derive(Debug)]
pub struct HostListing {
    self_pending: bool,
    inner: ReadDir,
}

impl Iterator for HostListing {
    type Item = io::Result<Child>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.self_pending {
            self.self_pending = false;
            return Some(Ok(Child {
                name: SELF_ENTRY.into(),
                kind: EntryKind::Directory,
            }));
        }
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e)),
        };
        let name = entry.file_name();
        let kind = child_kind(&name, entry.file_type());
        Some(Ok(Child { name, kind }))
    }
}

/// An entry whose type can not be read is handed on as a file, so opening it
/// fails for that entry alone and its siblings are still listed.
fn child_kind(name: &OsStr, file_type: io::Result<FileType>) -> EntryKind {
    match file_type {
        Ok(file_type) if file_type.is_dir() => EntryKind::Directory,
        Ok(_) => EntryKind::File,
        Err(e) => {
            log::warn!("failed to get file type of {name:?}: {e}");
            EntryKind::File
        }
    }
}

fn open_options(kind: EntryKind, access: Access) -> OpenOptions {
    let mut options = OpenOptions::new();
    match access {
        Access::Read => options.read(true),
        Access::Write => options.write(true),
    };
    if kind == EntryKind::Directory {
        directory_options(&mut options);
    }
    options
}

#[cfg(unix)]
fn directory_options(options: &mut OpenOptions) {
    use nix::fcntl::OFlag;
    use std::os::unix::fs::OpenOptionsExt;

    // directories can not be opened for writing, timestamps are set through a
    // read-only descriptor instead
    options
        .read(true)
        .write(false)
        .custom_flags(OFlag::O_DIRECTORY.bits());
}

// std opens every path on Windows with FILE_FLAG_BACKUP_SEMANTICS, which is
// what lets directories be opened as entries there
#[cfg(not(unix))]
fn directory_options(_options: &mut OpenOptions) {}

#[cfg(any(windows, target_os = "macos"))]
fn set_file_times(file: &File, times: EntryTimes) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    use std::os::macos::fs::FileTimesExt;
    #[cfg(windows)]
    use std::os::windows::fs::FileTimesExt;

    let file_times = fs::FileTimes::new()
        .set_modified(times.modified)
        .set_created(times.created);
    file.set_times(file_times)
}

#[cfg(not(any(windows, target_os = "macos")))]
fn set_file_times(_file: &File, _times: EntryTimes) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "setting creation time is not supported on this platform",
    ))
}
