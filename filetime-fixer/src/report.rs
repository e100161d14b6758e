use std::{io, path::Path};

use crate::{error::RepairError, fs::EntryKind};

/// Outcome of one entry or listing worth telling the user about
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    WouldRepair { path: &'a Path, kind: EntryKind },
    Repaired { path: &'a Path, kind: EntryKind },
    Failed(&'a RepairError),
}

/// Sink for repair events, called in visitation order
///
/// An `Err` here means the sink itself is broken and stops the walk.
pub trait Reporter {
    fn report(&mut self, event: &Event<'_>) -> io::Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: &Event<'_>) -> io::Result<()> {
        (**self).report(event)
    }
}

/// Keeps one line per event, mostly useful in tests.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub lines: Vec<String>,
}

impl Reporter for Recorder {
    fn report(&mut self, event: &Event<'_>) -> io::Result<()> {
        let line = match event {
            Event::WouldRepair { path, kind } => format!("would repair {kind} {path:?}"),
            Event::Repaired { path, kind } => format!("repaired {kind} {path:?}"),
            Event::Failed(e) => format!("error: {e}"),
        };
        self.lines.push(line);
        Ok(())
    }
}
