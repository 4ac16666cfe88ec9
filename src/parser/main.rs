use crate::conversion::{extract_firmware_version, find_firmware_banner};
use crate::error::DataFlashError;
use crate::parser::reader::{DataFlashReader, DecoderOptions};
use crate::types::DataFlashLog;
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parse a DataFlash log file
pub fn parse_dataflash_file(file_path: &Path, options: &DecoderOptions) -> Result<DataFlashLog> {
    if options.debug {
        println!("=== PARSING DATAFLASH FILE ===");
        let metadata = std::fs::metadata(file_path)?;
        println!(
            "File size: {} bytes ({:.2} MB)",
            metadata.len(),
            metadata.len() as f64 / 1024.0 / 1024.0
        );
    }

    let file = File::open(file_path)
        .with_context(|| format!("Failed to open DataFlash file: {:?}", file_path))?;

    parse_dataflash_reader(BufReader::new(file), options)
        .with_context(|| format!("Failed to parse DataFlash file: {:?}", file_path))
}

/// Parse DataFlash data from memory
pub fn parse_dataflash_bytes(data: &[u8], options: &DecoderOptions) -> Result<DataFlashLog> {
    if options.debug {
        println!("=== PARSING DATAFLASH DATA ===");
        println!("Data size: {} bytes", data.len());
    }

    parse_dataflash_reader(data, options)
}

/// Decode every record from a reader into a [`DataFlashLog`]
///
/// With `options.resync` set, corrupt frames are counted and skipped by
/// scanning for the next frame marker; otherwise the first failure is
/// returned. Failures on the final, cut-off frame of a stream are always
/// tolerated.
pub fn parse_dataflash_reader<R: Read>(reader: R, options: &DecoderOptions) -> Result<DataFlashLog> {
    let mut session = DataFlashReader::with_options(reader, options.clone());
    let mut log = DataFlashLog::new();

    loop {
        match session.decode() {
            Ok(record) => log.records.push(record),
            Err(DataFlashError::EndOfStream) => break,
            Err(DataFlashError::Io(err)) => {
                return Err(err).context("I/O error while reading DataFlash stream");
            }
            Err(err) if session.at_end() => {
                if options.debug {
                    println!("DEBUG: Ignoring cut-off final frame: {}", err);
                }
                break;
            }
            Err(err) if options.resync => {
                if options.debug {
                    println!(
                        "DEBUG: Resyncing after error at offset {}: {}",
                        session.position(),
                        err
                    );
                }
                session.resync()?;
            }
            Err(err) => {
                let offset = session.position();
                return Err(anyhow!(err))
                    .with_context(|| format!("Decoding stopped at offset {}", offset));
            }
        }
    }

    if log.records.is_empty() && session.stats().failed_frames > 0 {
        return Err(anyhow!(
            "No DataFlash records found ({} failed frames)",
            session.stats().failed_frames
        ));
    }

    log.formats = session.registry().formats();
    log.stats = session.stats().clone();
    log.firmware = find_firmware_banner(&log.records);
    log.firmware_version = log.firmware.as_deref().and_then(extract_firmware_version);

    if options.debug {
        println!(
            "Decoded {} records ({} formats, {} failed frames, {} bytes skipped)",
            log.stats.total_records,
            log.formats.len(),
            log.stats.failed_frames,
            log.stats.skipped_bytes
        );
    }

    Ok(log)
}
