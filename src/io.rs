use crate::ParserError;
use log::debug;
use std::io::Read;

/// Opens a local or remote input, transparently decompressed when its name ends with a known
/// compression extension.
///
/// Any failure to open is reported as [ParserError::SourceNotFound]: the input is then skipped
/// rather than treated as broken.
pub fn get_reader(path: &str) -> Result<Box<dyn Read + Send>, ParserError> {
    debug!("opening {}", path);
    oneio::get_reader(path).map_err(|e| ParserError::SourceNotFound {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
