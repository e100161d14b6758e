use dialoguer::console::Term;

use crate::fs::EntryKind;
use crate::utils::simulate_indicator;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub files: KindStatistics,
    pub directories: KindStatistics,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KindStatistics {
    pub examined: Counter,
    pub repaired: Counter,
}

impl Statistics {
    pub fn of(&self, kind: EntryKind) -> &KindStatistics {
        match kind {
            EntryKind::File => &self.files,
            EntryKind::Directory => &self.directories,
        }
    }

    pub fn of_mut(&mut self, kind: EntryKind) -> &mut KindStatistics {
        match kind {
            EntryKind::File => &mut self.files,
            EntryKind::Directory => &mut self.directories,
        }
    }

    pub fn format_with_style(&self, term: &Term, simulate: bool) -> String {
        let files_examined = self.files.examined.get();
        let files_repaired = self.files.repaired.get();
        let directories_examined = self.directories.examined.get();
        let directories_repaired = self.directories.repaired.get();
        let num_style = |n| term.style().bold().apply_to(n);
        [
            format!("files examined:       {}", num_style(files_examined)),
            format!(
                "files repaired:       {}{}",
                num_style(files_repaired),
                simulate_indicator(term, files_repaired != 0 && simulate)
            ),
            format!("directories examined: {}", num_style(directories_examined)),
            format!(
                "directories repaired: {}{}",
                num_style(directories_repaired),
                simulate_indicator(term, directories_repaired != 0 && simulate)
            ),
        ]
        .join("\n")
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter(usize);

impl Counter {
    pub fn increase(&mut self) {
        self.add(1);
    }

    pub fn add(&mut self, n: usize) {
        self.0 += n;
    }

    pub fn get(&self) -> usize {
        self.0
    }
}
