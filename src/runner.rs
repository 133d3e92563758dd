/*!
Drives a run: opens each input in turn, pulls its records, filters them and prints the ones that
pass.

Every input goes through `open -> reading -> (end of file | aborted)`, or is reported missing when
it cannot be opened. Nothing that goes wrong with one input stops the run; only a failure to write
to the output does.
*/
use crate::error::ParserError;
use crate::filter::{FilterConfig, Filterable};
use crate::models::Record;
use crate::parser::MrtReader;
use log::{debug, info, warn};
use std::io::{Read, Write};

/// Opens a named input as a stream of decoded records. The input is released when the returned
/// iterator is dropped.
pub trait SourceOpener {
    type Source: Iterator<Item = Result<Record, ParserError>>;

    fn open(&self, name: &str) -> Result<Self::Source, ParserError>;
}

/// Opens local files and URLs as MRT dumps.
#[derive(Debug, Default, Clone, Copy)]
pub struct MrtOpener;

impl SourceOpener for MrtOpener {
    type Source = MrtReader<Box<dyn Read + Send>>;

    fn open(&self, name: &str) -> Result<Self::Source, ParserError> {
        MrtReader::new(name)
    }
}

impl<F, S> SourceOpener for F
where
    F: Fn(&str) -> Result<S, ParserError>,
    S: Iterator<Item = Result<Record, ParserError>>,
{
    type Source = S;

    fn open(&self, name: &str) -> Result<S, ParserError> {
        self(name)
    }
}

/// Counters of one input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    /// Records decoded successfully.
    pub records: u64,
    pub printed: u64,
    /// Records skipped because they were malformed or of an unsupported type.
    pub violations: u64,
    /// Records skipped because the filter could not be evaluated on them.
    pub evaluation_errors: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    NotFound,
    /// The whole input was read.
    Eof(SourceStats),
    /// Reading stopped at a fault that leaves the input position unknown.
    Aborted(SourceStats),
}

pub struct Runner<'a, W, E> {
    config: &'a FilterConfig,
    out: W,
    err: E,
}

impl<'a, W: Write, E: Write> Runner<'a, W, E> {
    /// Creates a runner printing passing records to `out` and diagnostics to `err`.
    pub fn new(config: &'a FilterConfig, out: W, err: E) -> Self {
        Runner { config, out, err }
    }

    /// Processes every input in order. Returns an error only if writing fails.
    pub fn run<O, I, S>(&mut self, opener: &O, sources: I) -> std::io::Result<()>
    where
        O: SourceOpener,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for source in sources {
            self.process_source(opener, source.as_ref())?;
        }
        self.out.flush()
    }

    pub fn process_source<O: SourceOpener>(
        &mut self,
        opener: &O,
        name: &str,
    ) -> std::io::Result<SourceOutcome> {
        let source = match opener.open(name) {
            Ok(source) => source,
            Err(e) => {
                debug!("{}", e);
                writeln!(self.err, "File not found: {}", name)?;
                return Ok(SourceOutcome::NotFound);
            }
        };

        let mut stats = SourceStats::default();
        for item in source {
            let record = match item {
                Ok(record) => record,
                Err(e) if e.is_protocol_violation() => {
                    stats.violations += 1;
                    debug!("{}: skipping record: {}", name, e);
                    if self.config.report_violations() {
                        writeln!(self.err, "{}: {}", name, e)?;
                    }
                    continue;
                }
                Err(e) => {
                    warn!("{}: stopped reading: {}", name, e);
                    writeln!(self.err, "Error reading {}: {}", name, e)?;
                    return Ok(SourceOutcome::Aborted(stats));
                }
            };
            stats.records += 1;

            match record.match_filters(self.config) {
                Ok(true) => {
                    writeln!(self.out, "{}", record)?;
                    stats.printed += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    stats.evaluation_errors += 1;
                    writeln!(self.err, "{}", e)?;
                    writeln!(self.err, "record = {}", record)?;
                }
            }
        }

        info!(
            "{}: {} records, {} printed, {} skipped",
            name,
            stats.records,
            stats.printed,
            stats.violations + stats.evaluation_errors
        );
        Ok(SourceOutcome::Eof(stats))
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }
}
