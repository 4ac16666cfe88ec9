use crate::error::{DataFlashError, Result};
use crate::parser::stream::DataFlashStream;
use crate::types::FRAME_HEADER_LEN;
use std::io::Read;

/// First magic byte of every frame
pub const HEAD1: u8 = 0xA3;
/// Second magic byte of every frame
pub const HEAD2: u8 = 0x95;

/// Read the 3-byte frame header and return the message type byte
///
/// An empty source at the frame boundary yields `EndOfStream`; one or two
/// leftover bytes yield `MissingHeader`. On a magic mismatch the last two
/// header bytes are pushed back so a later resync can still find a marker
/// starting inside them.
pub fn sync_frame<R: Read>(stream: &mut DataFlashStream<R>) -> Result<u8> {
    let mut header = [0u8; FRAME_HEADER_LEN];
    let n = stream.read_up_to(&mut header)?;

    // Length is checked before any byte is inspected.
    if n == 0 {
        return Err(DataFlashError::EndOfStream);
    }
    if n < FRAME_HEADER_LEN {
        return Err(DataFlashError::MissingHeader);
    }

    if header[0] != HEAD1 || header[1] != HEAD2 {
        stream.push_back(&header[1..]);
        return Err(DataFlashError::MissingHeader);
    }

    Ok(header[2])
}
