use crate::error::Result;
use crate::parser::stream::DataFlashStream;
use crate::types::{FieldValue, TypeCode};
use std::io::Read;

// Fixed scaling factors applied to raw integer fields
pub const SCALE_CENTI: f32 = 0.01;
pub const SCALE_LATLON: f32 = 1.0e-7;

/// Decode one field of the given type code from the stream
///
/// Unknown codes fail with `UnknownFieldType` before any byte is consumed,
/// so the stream is never advanced by a guessed width.
pub fn decode_field<R: Read>(
    stream: &mut DataFlashStream<R>,
    code: char,
) -> Result<(TypeCode, FieldValue)> {
    let type_code = TypeCode::try_from(code)?;
    let value = decode_value(stream, type_code)?;
    Ok((type_code, value))
}

/// Decode a value for an already resolved type code
pub fn decode_value<R: Read>(
    stream: &mut DataFlashStream<R>,
    type_code: TypeCode,
) -> Result<FieldValue> {
    let value = match type_code {
        TypeCode::Int8 | TypeCode::FlightMode => FieldValue::Int8(stream.read_i8()?),
        TypeCode::UInt8 => FieldValue::UInt8(stream.read_u8()?),
        TypeCode::Int16 => FieldValue::Int16(stream.read_i16()?),
        TypeCode::UInt16 => FieldValue::UInt16(stream.read_u16()?),
        TypeCode::Int32 => FieldValue::Int32(stream.read_i32()?),
        TypeCode::UInt32 => FieldValue::UInt32(stream.read_u32()?),
        TypeCode::Int64 => FieldValue::Int64(stream.read_i64()?),
        TypeCode::UInt64 => FieldValue::UInt64(stream.read_u64()?),
        TypeCode::Float32 => FieldValue::Float(stream.read_f32()?),

        TypeCode::Int16Centi => FieldValue::Float(stream.read_i16()? as f32 * SCALE_CENTI),
        TypeCode::UInt16Centi => FieldValue::Float(stream.read_u16()? as f32 * SCALE_CENTI),
        // 'd' shares the int32 centi-scaling of 'e'
        TypeCode::Int32CentiD | TypeCode::Int32Centi => {
            FieldValue::Float(stream.read_i32()? as f32 * SCALE_CENTI)
        }
        TypeCode::UInt32Centi => FieldValue::Float(stream.read_u32()? as f32 * SCALE_CENTI),
        TypeCode::LatLon => FieldValue::Float(stream.read_i32()? as f32 * SCALE_LATLON),

        TypeCode::Char4 => FieldValue::String(stream.read_fixed_string::<4>()?),
        TypeCode::Char16 => FieldValue::String(stream.read_fixed_string::<16>()?),
        TypeCode::Char64 | TypeCode::Array64 => {
            FieldValue::String(stream.read_fixed_string::<64>()?)
        }
    };
    Ok(value)
}
