//! DataFlash Parser Library
//!
//! A Rust library for decoding ArduPilot DataFlash binary telemetry logs.
//! Each frame's layout is described by FMT records carried inline in the
//! stream, so the decoder learns the schema as it reads.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export functionality
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable record export in JSON Lines format
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Parse a log file and access its records:
//! ```rust,no_run
//! use dataflash_parser::{parse_dataflash_file, DecoderOptions};
//! use std::path::Path;
//!
//! let log = parse_dataflash_file(Path::new("00000042.BIN"), &DecoderOptions::default()).unwrap();
//! println!("Decoded {} records", log.records.len());
//! for gps in log.records_by_name("GPS") {
//!     println!("{:?} {:?}", gps.get_f64("Lat"), gps.get_f64("Lng"));
//! }
//! ```
//!
//! Pull records one at a time from any reader:
//! ```rust,no_run
//! use dataflash_parser::{DataFlashError, DataFlashReader};
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("00000042.BIN").unwrap();
//! let mut reader = DataFlashReader::new(BufReader::new(file));
//! loop {
//!     match reader.decode() {
//!         Ok(record) => println!("{}: {} fields", record.name, record.len()),
//!         Err(DataFlashError::EndOfStream) => break,
//!         Err(e) => {
//!             eprintln!("{e}");
//!             reader.resync().unwrap();
//!         }
//!     }
//! }
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`parse_dataflash_file`] - Parse a log file into a [`DataFlashLog`]
//! - [`parse_dataflash_bytes`] - Parse log data from memory
//! - [`parse_dataflash_reader`] - Parse log data from any reader
//!
//! ## Session
//! - [`DataFlashReader`] - Pull-style decoder, one record per `decode` call
//! - [`FormatRegistry`] - Message type to format mapping grown by FMT records
//! - [`sync_frame`] / [`decode_field`] - Frame header and field primitives
//!
//! ## Data Types
//! - [`DataFlashLog`] - Complete decoded log with records and statistics
//! - [`Record`] / [`FieldValue`] - Decoded message and its typed values
//! - [`Format`] / [`TypeCode`] - Message layout and field type codes
//!
//! ## Export Functions
//! - [`export_to_csv`] - One CSV per message name plus a formats table
//! - `export_to_json` - JSON Lines export (feature `json`)
//! - [`compute_export_paths`] - Helper for consistent path computation

pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod types;

pub use conversion::*;
pub use error::{DataFlashError, Result};
pub use export::*;
pub use parser::*;
pub use types::*;
