use std::{io, path::Path};

use crate::{
    error::RepairError,
    fs::{Access, EntryKind, EntryTimes, Filesystem},
    report::{Event, Reporter},
    statistics::Statistics,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Creation time is not later than modification time.
    Consistent,
    WouldRepair,
    Repaired,
    /// The error has already been reported.
    Failed,
}

/// Examines single entries and pulls creation times back where needed
#[derive(Debug)]
pub struct Repairer<F, R> {
    fs: F,
    reporter: R,
    simulate: bool,
    statistic: Statistics,
}

impl<F: Filesystem, R: Reporter> Repairer<F, R> {
    pub fn new(fs: F, reporter: R, simulate: bool) -> Self {
        Self {
            fs,
            reporter,
            simulate,
            statistic: Statistics::default(),
        }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn statistic(&self) -> &Statistics {
        &self.statistic
    }

    pub fn into_parts(self) -> (R, Statistics) {
        (self.reporter, self.statistic)
    }

    pub fn report(&mut self, event: &Event<'_>) -> io::Result<()> {
        self.reporter.report(event)
    }

    /// Examine `path` and repair its creation time if it is later than its
    /// modification time.
    ///
    /// Every call counts as one examined entry of `kind`, whatever happens
    /// afterwards. Only a failing reporter is returned as an error.
    pub fn process_entry(&mut self, path: &Path, kind: EntryKind) -> io::Result<Outcome> {
        self.statistic.of_mut(kind).examined.increase();
        log::trace!("processing {kind} {path:?}");

        let times = match self.read_times(path, kind) {
            Ok(times) => times,
            Err(e) => return self.fail(e),
        };
        if !times.needs_repair() {
            log::debug!("keep {path:?}, creation time is not after modification time");
            return Ok(Outcome::Consistent);
        }
        log::debug!(
            "{path:?} created {} after its last modification",
            humantime::format_duration(
                times
                    .created
                    .duration_since(times.modified)
                    .unwrap_or_default()
            )
        );

        if self.simulate {
            self.statistic.of_mut(kind).repaired.increase();
            self.reporter.report(&Event::WouldRepair { path, kind })?;
            return Ok(Outcome::WouldRepair);
        }

        match self.write_times(path, kind, times.repaired()) {
            Ok(()) => {
                self.statistic.of_mut(kind).repaired.increase();
                self.reporter.report(&Event::Repaired { path, kind })?;
                Ok(Outcome::Repaired)
            }
            Err(e) => self.fail(e),
        }
    }

    /// The read handle is closed before this returns.
    fn read_times(&self, path: &Path, kind: EntryKind) -> Result<EntryTimes, RepairError> {
        let handle = self
            .fs
            .open(path, kind, Access::Read)
            .map_err(|source| RepairError::OpenForRead {
                path: path.to_path_buf(),
                kind,
                source,
            })?;
        self.fs
            .times(&handle)
            .map_err(|source| RepairError::TimestampRead {
                path: path.to_path_buf(),
                kind,
                source,
            })
    }

    fn write_times(
        &self,
        path: &Path,
        kind: EntryKind,
        times: EntryTimes,
    ) -> Result<(), RepairError> {
        let handle = self
            .fs
            .open(path, kind, Access::Write)
            .map_err(|source| RepairError::OpenForWrite {
                path: path.to_path_buf(),
                kind,
                source,
            })?;
        self.fs
            .set_times(&handle, times)
            .map_err(|source| RepairError::TimestampWrite {
                path: path.to_path_buf(),
                kind,
                source,
            })
    }

    fn fail(&mut self, error: RepairError) -> io::Result<Outcome> {
        log::debug!("{error:?}");
        self.reporter.report(&Event::Failed(&error))?;
        Ok(Outcome::Failed)
    }
}
