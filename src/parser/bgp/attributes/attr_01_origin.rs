use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::{Buf, Bytes};

pub fn parse_origin(mut input: Bytes) -> Result<Origin, ParserError> {
    if input.remaining() != 1 {
        return Err(ParserError::ParseError(format!(
            "ORIGIN attribute length is invalid: found {}, should be 1",
            input.remaining()
        )));
    }
    Ok(Origin::try_from(input.read_u8()?)?)
}
