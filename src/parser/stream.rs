use crate::error::{DataFlashError, Result};
use std::io::{ErrorKind, Read};

/// DataFlash byte stream over any sequential reader
///
/// Bytes handed back through [`push_back`](Self::push_back) are served
/// before the underlying reader is touched again.
pub struct DataFlashStream<R> {
    reader: R,
    pushback: Vec<u8>,
    pub pos: u64,
    pub eof: bool,
}

impl<R: Read> DataFlashStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pushback: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Fill as much of `buf` as the source allows, returning the count read.
    /// A count below `buf.len()` means the source hit end of input.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;

        while filled < buf.len() {
            if let Some(byte) = self.pushback.pop() {
                buf[filled] = byte;
                filled += 1;
                continue;
            }

            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DataFlashError::Io(e)),
            }
        }

        self.pos += filled as u64;
        Ok(filled)
    }

    /// Read exactly `N` bytes or fail with `UnexpectedEof`
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        if self.read_up_to(&mut buf)? < N {
            return Err(DataFlashError::UnexpectedEof);
        }
        Ok(buf)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_byte()
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read a fixed-width, null-terminated string field
    pub fn read_fixed_string<const N: usize>(&mut self) -> Result<String> {
        let buf = self.read_array::<N>()?;
        Ok(null_terminated(&buf))
    }

    /// Return bytes to the front of the stream, first byte of `bytes` first.
    pub fn push_back(&mut self, bytes: &[u8]) {
        self.pushback.extend(bytes.iter().rev());
        self.pos = self.pos.saturating_sub(bytes.len() as u64);
        if !bytes.is_empty() {
            self.eof = false;
        }
    }

    /// Skip ahead until the next `A3 95` marker, leaving the marker unread.
    /// Returns the number of bytes discarded.
    pub fn skip_to_next_header(&mut self, head1: u8, head2: u8) -> Result<usize> {
        let mut skipped = 0usize;
        let mut previous: Option<u8> = None;

        loop {
            let byte = match self.read_byte() {
                Ok(b) => b,
                Err(DataFlashError::UnexpectedEof) => {
                    // A dangling first marker byte cannot start a frame.
                    return Ok(skipped + previous.map_or(0, |_| 1));
                }
                Err(e) => return Err(e),
            };

            if previous == Some(head1) && byte == head2 {
                self.push_back(&[head1, head2]);
                return Ok(skipped);
            }

            if previous.is_some() {
                skipped += 1;
            }
            previous = Some(byte);
        }
    }
}

/// Bytes up to the first zero, or the whole buffer if none
pub fn null_terminated(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_little_endian_reads() {
        let data = [0x34, 0x12, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        let mut stream = DataFlashStream::new(Cursor::new(&data[..]));
        assert_eq!(stream.read_u16().unwrap(), 0x1234);
        assert_eq!(stream.read_i32().unwrap(), -1);
        assert_eq!(stream.read_u8().unwrap(), 1);
        assert_eq!(stream.pos, 7);
        assert!(matches!(
            stream.read_u8(),
            Err(DataFlashError::UnexpectedEof)
        ));
        assert!(stream.eof);
    }

    #[test]
    fn test_null_terminated() {
        assert_eq!(null_terminated(&[0x41, 0x42, 0x00, 0xFF]), "AB");
        assert_eq!(null_terminated(b"ABCD"), "ABCD");
        assert_eq!(null_terminated(&[0x00, 0x41]), "");
    }

    #[test]
    fn test_push_back_served_first() {
        let data = [1u8, 2, 3];
        let mut stream = DataFlashStream::new(Cursor::new(&data[..]));
        let first: [u8; 2] = stream.read_array().unwrap();
        assert_eq!(first, [1, 2]);
        stream.push_back(&first[1..]);
        assert_eq!(stream.pos, 1);
        let bytes: [u8; 2] = stream.read_array().unwrap();
        assert_eq!(bytes, [2, 3]);
    }

    #[test]
    fn test_skip_to_next_header() {
        let data = [0x00, 0x11, 0xA3, 0x22, 0xA3, 0x95, 0x80];
        let mut stream = DataFlashStream::new(Cursor::new(&data[..]));
        assert_eq!(stream.skip_to_next_header(0xA3, 0x95).unwrap(), 4);
        let header: [u8; 3] = stream.read_array().unwrap();
        assert_eq!(header, [0xA3, 0x95, 0x80]);
    }

    #[test]
    fn test_skip_without_marker_consumes_everything() {
        let data = [0x01, 0x02, 0xA3];
        let mut stream = DataFlashStream::new(Cursor::new(&data[..]));
        assert_eq!(stream.skip_to_next_header(0xA3, 0x95).unwrap(), 3);
        assert!(stream.eof);
    }
}
