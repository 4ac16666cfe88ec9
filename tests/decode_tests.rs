//! Integration tests for the decoding session and whole-log parser
//!
//! Streams are assembled in memory frame by frame:
//! - FMT registration and ordering
//! - Header synchronization failures
//! - Unknown field types and truncated frames
//! - Resync over corrupt bytes

use dataflash_parser::{
    parse_dataflash_bytes, DataFlashError, DataFlashReader, DecoderOptions, FieldValue, TypeCode,
};
use std::io::Cursor;

const HEAD: [u8; 2] = [0xA3, 0x95];

fn fixed<const N: usize>(text: &str) -> [u8; N] {
    let mut buf = [0u8; N];
    buf[..text.len()].copy_from_slice(text.as_bytes());
    buf
}

fn fmt_frame(msg_type: u8, length: u8, name: &str, format: &str, columns: &str) -> Vec<u8> {
    let mut frame = HEAD.to_vec();
    frame.push(0x80);
    frame.push(msg_type);
    frame.push(length);
    frame.extend_from_slice(&fixed::<4>(name));
    frame.extend_from_slice(&fixed::<16>(format));
    frame.extend_from_slice(&fixed::<64>(columns));
    frame
}

fn data_frame(msg_type: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = HEAD.to_vec();
    frame.push(msg_type);
    frame.extend_from_slice(payload);
    frame
}

fn reader(data: Vec<u8>) -> DataFlashReader<Cursor<Vec<u8>>> {
    DataFlashReader::new(Cursor::new(data))
}

#[test]
fn test_fmt_then_data_frame() {
    let mut data = fmt_frame(0x81, 4, "TST", "B", "X");
    data.extend(data_frame(0x81, &[7]));
    let mut session = reader(data);

    let fmt = session.decode().expect("FMT record should decode");
    assert_eq!(fmt.name, "FMT");
    assert_eq!(fmt.get_u8("Type"), Some(0x81));
    assert_eq!(fmt.get_str("Format"), Some("B"));
    assert!(session.registry().contains(0x81));

    let record = session.decode().expect("data record should decode");
    assert_eq!(record.name, "TST");
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("X"), Some(&FieldValue::UInt8(7)));
    assert_eq!(record.field("X").unwrap().code, TypeCode::UInt8);

    assert!(matches!(session.decode(), Err(DataFlashError::EndOfStream)));
    assert_eq!(session.stats().total_records, 2);
    assert_eq!(session.stats().fmt_records, 1);
}

#[test]
fn test_frame_before_definition_is_unknown() {
    let mut data = data_frame(0x81, &[7]);
    data.extend(fmt_frame(0x81, 4, "TST", "B", "X"));
    data.extend(data_frame(0x81, &[9]));
    let mut session = reader(data);

    assert!(matches!(
        session.decode(),
        Err(DataFlashError::UnknownMessageType(0x81))
    ));
    // The undefined frame's payload byte sits in front of the FMT frame.
    assert_eq!(session.resync().unwrap(), 1);
    assert_eq!(session.decode().unwrap().name, "FMT");
    assert_eq!(session.decode().unwrap().get_u8("X"), Some(9));
    assert_eq!(session.stats().unknown_types, 1);
}

#[test]
fn test_wrong_magic_is_missing_header() {
    let mut data = vec![0x00, 0x00, 0x80];
    data.extend_from_slice(&[0u8; 86]);
    let mut session = reader(data);
    assert!(matches!(
        session.decode(),
        Err(DataFlashError::MissingHeader)
    ));
}

#[test]
fn test_unknown_field_type_aborts_record() {
    let mut data = fmt_frame(0x82, 5, "ODD", "BX", "A,B");
    data.extend(data_frame(0x82, &[1, 2]));
    let mut session = reader(data);

    session.decode().expect("FMT record registers the odd format");
    assert!(matches!(
        session.decode(),
        Err(DataFlashError::UnknownFieldType('X'))
    ));
}

#[test]
fn test_truncated_field_reports_column() {
    let mut data = fmt_frame(0x83, 7, "SHT", "i", "Val");
    data.extend(data_frame(0x83, &[1, 2]));
    let mut session = reader(data);

    session.decode().unwrap();
    match session.decode() {
        Err(DataFlashError::TruncatedField { message, column }) => {
            assert_eq!(message, "SHT");
            assert_eq!(column, "Val");
        }
        other => panic!("expected truncated field, got {:?}", other),
    }
}

#[test]
fn test_scaled_and_string_fields() {
    let mut data = fmt_frame(0x84, 33, "GPS", "QLcnN", "TimeUS,Lat,Alt,Tag,Label");
    let mut payload = Vec::new();
    payload.extend_from_slice(&1_000_000u64.to_le_bytes());
    payload.extend_from_slice(&12345678i32.to_le_bytes());
    payload.extend_from_slice(&(-500i16).to_le_bytes());
    payload.extend_from_slice(&[0x41, 0x42, 0x00, 0xFF]);
    payload.extend_from_slice(&fixed::<16>("sixteen-bytes-ok"));
    data.extend(data_frame(0x84, &payload));

    let mut session = reader(data);
    session.decode().unwrap();
    let record = session.decode().unwrap();

    assert_eq!(record.timestamp_us(), Some(1_000_000));
    let lat = record.get_f64("Lat").unwrap();
    assert!((lat - 1.2345678).abs() < 1e-6, "lat was {lat}");
    let alt = record.get_f64("Alt").unwrap();
    assert!((alt + 5.0).abs() < 1e-6, "alt was {alt}");
    assert_eq!(record.get_str("Tag"), Some("AB"));
    assert_eq!(record.get_str("Label"), Some("sixteen-bytes-ok"));
    let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["TimeUS", "Lat", "Alt", "Tag", "Label"]);
}

#[test]
fn test_redefinition_replaces_format() {
    let mut data = fmt_frame(0x85, 4, "ONE", "B", "A");
    data.extend(data_frame(0x85, &[1]));
    data.extend(fmt_frame(0x85, 5, "TWO", "h", "B"));
    data.extend(data_frame(0x85, &(-2i16).to_le_bytes()));

    let records: Vec<_> = reader(data).collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[1].name, "ONE");
    assert_eq!(records[3].name, "TWO");
    assert_eq!(records[3].get("B"), Some(&FieldValue::Int16(-2)));
}

#[test]
fn test_fmt_entry_always_present() {
    let mut data = fmt_frame(0x81, 4, "TST", "B", "X");
    data.extend(data_frame(0x81, &[1]));
    let mut session = reader(data);
    while session.decode().is_ok() {
        assert!(session.registry().contains(0x80));
    }
    assert!(session.registry().contains(0x80));
    for (_, format) in session.registry().iter() {
        assert_eq!(format.fields().len(), format.column_names().len());
    }
}

#[test]
fn test_strict_length_validation() {
    let data = fmt_frame(0x86, 99, "BAD", "B", "X");
    let options = DecoderOptions {
        validate_lengths: true,
        ..DecoderOptions::default()
    };
    let mut session = DataFlashReader::with_options(Cursor::new(data), options);
    assert!(matches!(
        session.decode(),
        Err(DataFlashError::LengthMismatch {
            declared: 99,
            computed: 4,
            ..
        })
    ));
    assert!(!session.registry().contains(0x86));
}

#[test]
fn test_parse_bytes_resyncs_over_garbage() {
    let mut data = fmt_frame(0x81, 4, "TST", "B", "X");
    data.extend_from_slice(&[0xDE, 0xAD, 0xA3, 0xBE, 0xEF]);
    data.extend(data_frame(0x81, &[1]));
    data.extend(data_frame(0x81, &[2]));

    let log = parse_dataflash_bytes(&data, &DecoderOptions::default()).unwrap();
    let values: Vec<u8> = log
        .records_by_name("TST")
        .filter_map(|r| r.get_u8("X"))
        .collect();
    assert_eq!(values, vec![1, 2]);
    assert_eq!(log.stats.failed_frames, 1);
    assert!(log.stats.skipped_bytes > 0);
    assert!(log.formats.iter().any(|(id, f)| *id == 0x81 && f.name() == "TST"));
}

#[test]
fn test_parse_bytes_without_resync_stops() {
    let mut data = fmt_frame(0x81, 4, "TST", "B", "X");
    data.extend_from_slice(&[0xDE, 0xAD, 0xBE]);
    data.extend(data_frame(0x81, &[1]));

    let options = DecoderOptions {
        resync: false,
        ..DecoderOptions::default()
    };
    let err = parse_dataflash_bytes(&data, &options).unwrap_err();
    assert!(format!("{err:#}").contains("Missing magic message header"));
}

#[test]
fn test_parse_bytes_tolerates_cut_off_tail() {
    let mut data = fmt_frame(0x83, 7, "SHT", "i", "Val");
    data.extend(data_frame(0x83, &5i32.to_le_bytes()));
    data.extend(data_frame(0x83, &[1, 2]));

    let options = DecoderOptions {
        resync: false,
        ..DecoderOptions::default()
    };
    let log = parse_dataflash_bytes(&data, &options).unwrap();
    assert_eq!(log.records_by_name("SHT").count(), 1);
    assert_eq!(log.stats.failed_frames, 1);
}

#[test]
fn test_firmware_banner_from_msg() {
    let mut data = fmt_frame(0x90, 75, "MSG", "QZ", "TimeUS,Message");
    let mut payload = 10u64.to_le_bytes().to_vec();
    payload.extend_from_slice(&fixed::<64>("ArduCopter V4.3.0 (5d1d6b38)"));
    data.extend(data_frame(0x90, &payload));

    let log = parse_dataflash_bytes(&data, &DecoderOptions::default()).unwrap();
    assert_eq!(log.firmware.as_deref(), Some("ArduCopter V4.3.0 (5d1d6b38)"));
    assert_eq!(log.firmware_version, Some(semver::Version::new(4, 3, 0)));
}

#[test]
fn test_garbage_only_is_error() {
    let data = vec![0x11u8; 32];
    assert!(parse_dataflash_bytes(&data, &DecoderOptions::default()).is_err());
}

#[test]
fn test_empty_input_is_empty_log() {
    let log = parse_dataflash_bytes(&[], &DecoderOptions::default()).unwrap();
    assert_eq!(log.record_count(), 0);
    assert_eq!(log.duration_us(), 0);
}
