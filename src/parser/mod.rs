/*!
MRT decoding: turns a byte stream into a sequence of [Record]s.
*/
use std::collections::VecDeque;
use std::io::Read;
use std::iter::FusedIterator;

pub mod bgp;
pub mod mrt;
pub mod utils;

pub use self::utils::*;
pub use bgp::attributes::AttributeParser;
pub use mrt::{parse_common_header, parse_mrt_body, read_raw_record};

use crate::error::ParserError;
use crate::io::get_reader;
use crate::models::{PeerIndexTable, Record};
use log::debug;

/// Pull-based reader of MRT records.
///
/// Entries carrying several routes are expanded into several records, buffered so callers still
/// receive one record per call. The TABLE_DUMP_V2 peer index table is kept for the lifetime of
/// the reader.
///
/// Once an error other than a protocol violation has been returned, the reader is finished and
/// yields nothing more.
pub struct MrtReader<R> {
    reader: R,
    peer_table: Option<PeerIndexTable>,
    pending: VecDeque<Record>,
    finished: bool,
}

impl MrtReader<Box<dyn Read + Send>> {
    /// Opens a local file or a remote URL, decompressing it based on its extension.
    pub fn new(path: &str) -> Result<Self, ParserError> {
        Ok(MrtReader::from_reader(get_reader(path)?))
    }
}

impl<R: Read> MrtReader<R> {
    pub fn from_reader(reader: R) -> Self {
        MrtReader {
            reader,
            peer_table: None,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Returns the next record, or `Ok(None)` at the end of input.
    ///
    /// On a protocol violation ([ParserError::is_protocol_violation]) the offending MRT record has
    /// been consumed entirely and reading may continue. Any other error leaves the input in an
    /// unknown position, so every later call returns `Ok(None)`.
    pub fn next_record(&mut self) -> Result<Option<Record>, ParserError> {
        if self.finished {
            return Ok(None);
        }
        let result = self.read_next();
        match &result {
            Ok(None) => self.finished = true,
            Err(e) if !e.is_protocol_violation() => {
                debug!("stopping at source fault: {}", e);
                self.finished = true;
            }
            _ => {}
        }
        result
    }

    fn read_next(&mut self) -> Result<Option<Record>, ParserError> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(Some(record));
            }

            let Some((header, body)) = read_raw_record(&mut self.reader)? else {
                return Ok(None);
            };
            let records = parse_mrt_body(&header, body, &mut self.peer_table)?;
            if records.is_empty() {
                debug!(
                    "MRT record type {} subtype {} produced no records",
                    header.entry_type, header.entry_subtype
                );
            }
            self.pending.extend(records);
        }
    }
}

impl<R: Read> Iterator for MrtReader<R> {
    type Item = Result<Record, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl<R: Read> FusedIterator for MrtReader<R> {}
