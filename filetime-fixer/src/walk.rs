use std::{io, path::Path};

use crate::{
    error::RepairError,
    fs::{EntryKind, Filesystem},
    report::{Event, Reporter},
    repair::Repairer,
    statistics::Statistics,
};

/// Depth-first, pre-order traversal feeding every entry to a [`Repairer`]
#[derive(Debug)]
pub struct Walker<F, R> {
    repairer: Repairer<F, R>,
}

impl<F: Filesystem, R: Reporter> Walker<F, R> {
    pub fn new(repairer: Repairer<F, R>) -> Self {
        Self { repairer }
    }

    pub fn statistic(&self) -> &Statistics {
        self.repairer.statistic()
    }

    pub fn into_repairer(self) -> Repairer<F, R> {
        self.repairer
    }

    pub fn walk_roots<P: AsRef<Path>>(&mut self, roots: &[P]) -> io::Result<()> {
        for root in roots {
            self.walk(root.as_ref())?;
        }
        Ok(())
    }

    /// Process `directory` itself (through its `.` entry), then each child,
    /// recursing into child directories.
    ///
    /// Listing failures are reported and only cut off this subtree.
    pub fn walk(&mut self, directory: &Path) -> io::Result<()> {
        log::trace!("walking {directory:?}");
        let listing = match self.repairer.fs().list(directory) {
            Ok(listing) => listing,
            Err(source) => {
                let error = RepairError::EnumerationStart {
                    path: directory.to_path_buf(),
                    source,
                };
                return self.repairer.report(&Event::Failed(&error));
            }
        };

        for child in listing {
            let child = match child {
                Ok(child) => child,
                Err(source) => {
                    let error = RepairError::EnumerationStep {
                        path: directory.to_path_buf(),
                        source,
                    };
                    self.repairer.report(&Event::Failed(&error))?;
                    break;
                }
            };
            if child.is_self_entry() {
                self.repairer.process_entry(directory, EntryKind::Directory)?;
                continue;
            }
            if child.is_parent_entry() {
                continue;
            }
            let path = directory.join(&child.name);
            match child.kind {
                EntryKind::Directory => self.walk(&path)?,
                EntryKind::File => {
                    self.repairer.process_entry(&path, EntryKind::File)?;
                }
            }
        }
        Ok(())
    }
}
