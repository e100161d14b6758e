use anyhow::Context;
use dialoguer::console::Term;
use std::fmt::Debug;
use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, BufWriter, Write, sink, stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::{
    command::RunOptions,
    config::Config,
    fs::host::HostFs,
    report::{Event, Reporter},
    repair::Repairer,
    statistics::Statistics,
    utils::format_duration_short,
    walk::Walker,
};

#[derive(Debug)]
pub struct RunContext {
    options: RunOptions,
    simulate: bool,
    no_statistic: bool,
    output_runtime: bool,
    term: Term,
}

/// Summary of a finished run
#[derive(Debug)]
pub struct Finished {
    pub statistic: Statistics,
    pub runtime: Duration,
}

impl RunContext {
    pub fn new(options: RunOptions, config: Config) -> anyhow::Result<Self> {
        for path in &options.paths {
            let metadata =
                fs::metadata(path).with_context(|| format!("failed to access {path:?}"))?;
            anyhow::ensure!(metadata.is_dir(), "{path:?} is not a directory");
        }
        let context = Self {
            simulate: options.simulate || config.simulate,
            no_statistic: options.no_statistic || config.no_statistic,
            output_runtime: options.output_runtime || config.output_runtime,
            options,
            term: Term::stderr(),
        };
        log::debug!("options: {:#?}", context.options);
        Ok(context)
    }

    pub fn run(&self) -> anyhow::Result<Finished> {
        if self.simulate {
            log::info!("simulation mode, no timestamp will be changed");
        }
        let reporter = ConsoleReporter {
            term: self.term.clone(),
            output: Output {
                writer: Self::output_writer(&self.options)?,
                delimiter: self.options.output_delimiter.clone(),
                first_output: true,
            },
        };
        let mut walker = Walker::new(Repairer::new(HostFs, reporter, self.simulate));

        let start = Instant::now();
        walker
            .walk_roots(&self.options.paths)
            .context("failed to report progress")?;
        let runtime = start.elapsed();

        let (mut reporter, statistic) = walker.into_repairer().into_parts();
        reporter
            .output
            .writer
            .flush()
            .context("failed to flush output")?;
        Ok(Finished { statistic, runtime })
    }

    pub fn finish(&self, finished: &Finished) -> anyhow::Result<()> {
        let mut term = &self.term;
        if !self.no_statistic {
            writeln!(
                term,
                "{}",
                term.style().bold().underlined().apply_to("Statistics")
            )?;
            term.write_line(&finished.statistic.format_with_style(term, self.simulate))?;
        }
        if self.output_runtime {
            writeln!(
                term,
                "runtime: {}",
                term.style()
                    .bold()
                    .apply_to(format_duration_short(finished.runtime))
            )?;
        }
        Ok(())
    }

    fn output_writer(options: &RunOptions) -> anyhow::Result<Box<dyn OutputWriter>> {
        match &options.output {
            Some(path) => {
                let mut writer: Box<dyn OutputWriter> = if path == &PathBuf::from("-") {
                    Box::new(stdout())
                } else {
                    Box::new(
                        File::create(path)
                            .with_context(|| format!("failed to create output file {path:?}"))?,
                    )
                };
                if !options.output_unbuffered {
                    writer = Box::new(BufWriter::new(writer));
                }
                Ok(writer)
            }
            None => Ok(Box::new(sink())),
        }
    }
}

trait OutputWriter: Write + Debug {}
impl<T> OutputWriter for T where T: Write + Debug {}

/// Delimited list of repaired paths
#[derive(Debug)]
struct Output {
    writer: Box<dyn OutputWriter>,
    delimiter: OsString,
    first_output: bool,
}

impl Output {
    fn output(&mut self, path: &Path) -> io::Result<()> {
        if !self.first_output {
            self.writer.write_all(self.delimiter.as_encoded_bytes())?;
        } else {
            self.first_output = false;
        }
        self.writer.write_all(path.as_os_str().as_encoded_bytes())
    }
}

/// Writes one styled line per event to the terminal
#[derive(Debug)]
struct ConsoleReporter {
    term: Term,
    output: Output,
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: &Event<'_>) -> io::Result<()> {
        let mut term = &self.term;
        match event {
            Event::WouldRepair { path, kind } => {
                writeln!(
                    term,
                    "{} {kind} {path:?}",
                    term.style().blue().bold().apply_to("Would repair"),
                )?;
                self.output.output(path)
            }
            Event::Repaired { path, kind } => {
                writeln!(
                    term,
                    "{} {kind} {path:?} ... {}",
                    term.style().green().bold().apply_to("Repair"),
                    term.style().green().apply_to("done"),
                )?;
                self.output.output(path)
            }
            Event::Failed(error) => {
                log::debug!("os error code: {:?}", error.os_code());
                writeln!(term, "{} {error}", term.style().red().bold().apply_to("Error"))
            }
        }
    }
}
