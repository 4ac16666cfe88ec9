use crate::error::{DataFlashError, Result};
use crate::parser::decoder::decode_field;
use crate::parser::registry::FormatRegistry;
use crate::parser::stream::DataFlashStream;
use crate::parser::sync::{sync_frame, HEAD1, HEAD2};
use crate::types::{DecodeStats, Format, Record, FMT_MESSAGE_TYPE, FRAME_HEADER_LEN};
use std::io::Read;

/// Options controlling a decoding session
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Print decoding traces to stdout
    pub debug: bool,
    /// Skip to the next frame marker after a corrupt frame instead of stopping
    pub resync: bool,
    /// Reject FMT definitions whose declared length disagrees with their fields
    pub validate_lengths: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            debug: false,
            resync: true,
            validate_lengths: false,
        }
    }
}

/// Pull-style decoding session over a DataFlash byte stream
///
/// Each call to [`decode`](Self::decode) consumes exactly one frame. FMT
/// frames extend the session's format registry, so frames must be decoded
/// in stream order.
pub struct DataFlashReader<R> {
    stream: DataFlashStream<R>,
    registry: FormatRegistry,
    options: DecoderOptions,
    stats: DecodeStats,
}

impl<R: Read> DataFlashReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            stream: DataFlashStream::new(reader),
            registry: FormatRegistry::new(),
            options,
            stats: DecodeStats::default(),
        }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Bytes consumed from the source so far
    pub fn position(&self) -> u64 {
        self.stream.pos
    }

    /// Whether the source has reported end of input
    pub fn at_end(&self) -> bool {
        self.stream.eof
    }

    pub fn into_inner(self) -> R {
        self.stream.into_inner()
    }

    /// Decode the next record
    ///
    /// Returns `EndOfStream` once the source is exhausted at a frame
    /// boundary. Any other error aborts the frame; no partial record is
    /// returned and the stream is left wherever the failure happened.
    pub fn decode(&mut self) -> Result<Record> {
        let start = self.stream.pos;
        let result = self.decode_frame();

        self.stats.total_bytes += self.stream.pos.saturating_sub(start);
        match &result {
            Ok(record) => {
                self.stats.record_message(&record.name);
                if record.msg_type == FMT_MESSAGE_TYPE {
                    self.stats.fmt_records += 1;
                }
            }
            Err(DataFlashError::EndOfStream) => {}
            Err(e) => {
                if matches!(e, DataFlashError::UnknownMessageType(_)) {
                    self.stats.unknown_types += 1;
                }
                self.stats.failed_frames += 1;
                if self.options.debug {
                    println!("DEBUG: Frame at offset {} failed: {}", start, e);
                }
            }
        }

        result
    }

    fn decode_frame(&mut self) -> Result<Record> {
        let msg_type = sync_frame(&mut self.stream)?;
        let format = self.registry.lookup(msg_type)?;

        let mut record = Record::with_capacity(msg_type, format.name(), format.fields().len());
        for field in format.fields() {
            let (code, value) =
                decode_field(&mut self.stream, field.code).map_err(|e| match e {
                    DataFlashError::UnexpectedEof => DataFlashError::TruncatedField {
                        message: format.name().to_string(),
                        column: field.name.clone(),
                    },
                    other => other,
                })?;
            record.insert(field.name.clone(), code, value);
        }

        if msg_type == FMT_MESSAGE_TYPE {
            self.register_definition(&record)?;
        }

        Ok(record)
    }

    /// Build a format from a decoded FMT record and register it
    fn register_definition(&mut self, record: &Record) -> Result<()> {
        let defined_type = record
            .get_u8("Type")
            .ok_or_else(|| missing_column("Type"))?;
        let length = record
            .get_u8("Length")
            .ok_or_else(|| missing_column("Length"))?;
        let name = record.get_str("Name").ok_or_else(|| missing_column("Name"))?;
        let types = record
            .get_str("Format")
            .ok_or_else(|| missing_column("Format"))?;
        let columns = record
            .get_str("Columns")
            .ok_or_else(|| missing_column("Columns"))?;

        let format = Format::new(name, length, types, columns)?;

        if self.options.validate_lengths {
            format.validate_length()?;
        } else if self.options.debug {
            if let Some(width) = format.payload_width() {
                let frame_len = width + FRAME_HEADER_LEN;
                if frame_len != length as usize {
                    println!(
                        "DEBUG: {} declares {} bytes but its fields span {}",
                        name, length, frame_len
                    );
                }
            }
        }

        if self.options.debug {
            println!(
                "DEBUG: Registered 0x{:02X} {} [{}] {}",
                defined_type, name, types, columns
            );
        }

        self.registry.register(defined_type, format);
        Ok(())
    }

    /// Discard bytes up to the next frame marker
    ///
    /// Returns the number of bytes skipped. Reaching the end of the source
    /// is not an error; the next `decode` then reports `EndOfStream`.
    pub fn resync(&mut self) -> Result<usize> {
        let skipped = self.stream.skip_to_next_header(HEAD1, HEAD2)?;
        self.stats.skipped_bytes += skipped as u64;
        if self.options.debug && skipped > 0 {
            println!(
                "DEBUG: Skipped {} bytes to resync at offset {}",
                skipped, self.stream.pos
            );
        }
        Ok(skipped)
    }
}

fn missing_column(column: &str) -> DataFlashError {
    DataFlashError::InvalidFormat(format!("FMT record has no usable {} column", column))
}

impl<R: Read> Iterator for DataFlashReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.decode() {
            Err(DataFlashError::EndOfStream) => None,
            other => Some(other),
        }
    }
}
