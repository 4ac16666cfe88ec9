use crate::error::{DataFlashError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Message type id reserved for FMT definition records
pub const FMT_MESSAGE_TYPE: u8 = 0x80;

/// Frame length (header included) of the built-in FMT definition
pub const FMT_MESSAGE_LENGTH: u8 = 89;

/// Size of the `A3 95 <type>` frame header in bytes
pub const FRAME_HEADER_LEN: usize = 3;

/// Known field type codes
///
/// Each variant consumes a fixed number of bytes from the stream. Scaled
/// variants decode to `f32` after multiplying the raw integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeCode {
    /// `a`: 64 raw bytes read as a string
    Array64,
    /// `b`
    Int8,
    /// `B`
    UInt8,
    /// `c`: int16 × 0.01
    Int16Centi,
    /// `C`: uint16 × 0.01
    UInt16Centi,
    /// `d`: int32 × 0.01
    Int32CentiD,
    /// `e`: int32 × 0.01
    Int32Centi,
    /// `E`: uint32 × 0.01
    UInt32Centi,
    /// `f`
    Float32,
    /// `h`
    Int16,
    /// `H`
    UInt16,
    /// `i`
    Int32,
    /// `I`
    UInt32,
    /// `L`: int32 × 1e-7 (latitude/longitude)
    LatLon,
    /// `M`: int8 flight mode
    FlightMode,
    /// `n`
    Char4,
    /// `N`
    Char16,
    /// `Z`
    Char64,
    /// `q`
    Int64,
    /// `Q`
    UInt64,
}

impl TypeCode {
    /// The character used for this code in FMT definitions
    pub fn as_char(self) -> char {
        match self {
            TypeCode::Array64 => 'a',
            TypeCode::Int8 => 'b',
            TypeCode::UInt8 => 'B',
            TypeCode::Int16Centi => 'c',
            TypeCode::UInt16Centi => 'C',
            TypeCode::Int32CentiD => 'd',
            TypeCode::Int32Centi => 'e',
            TypeCode::UInt32Centi => 'E',
            TypeCode::Float32 => 'f',
            TypeCode::Int16 => 'h',
            TypeCode::UInt16 => 'H',
            TypeCode::Int32 => 'i',
            TypeCode::UInt32 => 'I',
            TypeCode::LatLon => 'L',
            TypeCode::FlightMode => 'M',
            TypeCode::Char4 => 'n',
            TypeCode::Char16 => 'N',
            TypeCode::Char64 => 'Z',
            TypeCode::Int64 => 'q',
            TypeCode::UInt64 => 'Q',
        }
    }

    /// Number of bytes this code consumes on the wire
    pub fn width(self) -> usize {
        match self {
            TypeCode::Int8 | TypeCode::UInt8 | TypeCode::FlightMode => 1,
            TypeCode::Int16Centi | TypeCode::UInt16Centi | TypeCode::Int16 | TypeCode::UInt16 => 2,
            TypeCode::Int32CentiD
            | TypeCode::Int32Centi
            | TypeCode::UInt32Centi
            | TypeCode::Float32
            | TypeCode::Int32
            | TypeCode::UInt32
            | TypeCode::LatLon
            | TypeCode::Char4 => 4,
            TypeCode::Int64 | TypeCode::UInt64 => 8,
            TypeCode::Char16 => 16,
            TypeCode::Array64 | TypeCode::Char64 => 64,
        }
    }
}

impl TryFrom<char> for TypeCode {
    type Error = DataFlashError;

    fn try_from(code: char) -> Result<Self> {
        let type_code = match code {
            'a' => TypeCode::Array64,
            'b' => TypeCode::Int8,
            'B' => TypeCode::UInt8,
            'c' => TypeCode::Int16Centi,
            'C' => TypeCode::UInt16Centi,
            'd' => TypeCode::Int32CentiD,
            'e' => TypeCode::Int32Centi,
            'E' => TypeCode::UInt32Centi,
            'f' => TypeCode::Float32,
            'h' => TypeCode::Int16,
            'H' => TypeCode::UInt16,
            'i' => TypeCode::Int32,
            'I' => TypeCode::UInt32,
            'L' => TypeCode::LatLon,
            'M' => TypeCode::FlightMode,
            'n' => TypeCode::Char4,
            'N' => TypeCode::Char16,
            'Z' => TypeCode::Char64,
            'q' => TypeCode::Int64,
            'Q' => TypeCode::UInt64,
            other => return Err(DataFlashError::UnknownFieldType(other)),
        };
        Ok(type_code)
    }
}

/// One declared field of a format
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatField {
    pub code: char,
    pub name: String,
}

/// Message layout announced by an FMT record
///
/// Type codes are kept as raw characters. An unknown code is only an error
/// once a frame of this format is actually decoded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Format {
    name: String,
    declared_length: u8,
    fields: Vec<FormatField>,
}

impl Format {
    /// Build a format from its type string (one char per field) and its
    /// comma-separated column names.
    pub fn new(name: &str, declared_length: u8, types: &str, columns: &str) -> Result<Self> {
        let codes: Vec<char> = types.chars().collect();
        let names: Vec<&str> = if columns.is_empty() {
            Vec::new()
        } else {
            columns.split(',').collect()
        };

        if codes.len() != names.len() {
            return Err(DataFlashError::InvalidFormat(format!(
                "{}: {} type codes but {} columns",
                name,
                codes.len(),
                names.len()
            )));
        }

        let fields = codes
            .into_iter()
            .zip(names)
            .map(|(code, column)| FormatField {
                code,
                name: column.to_string(),
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            declared_length,
            fields,
        })
    }

    /// The built-in definition of the FMT record itself
    pub fn fmt() -> Self {
        let fields = [
            ('B', "Type"),
            ('B', "Length"),
            ('n', "Name"),
            ('N', "Format"),
            ('Z', "Columns"),
        ]
        .into_iter()
        .map(|(code, name)| FormatField {
            code,
            name: name.to_string(),
        })
        .collect();

        Self {
            name: "FMT".to_string(),
            declared_length: FMT_MESSAGE_LENGTH,
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_length(&self) -> u8 {
        self.declared_length
    }

    pub fn fields(&self) -> &[FormatField] {
        &self.fields
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn type_codes(&self) -> String {
        self.fields.iter().map(|f| f.code).collect()
    }

    /// Summed payload width in bytes, or `None` if any code is unknown
    pub fn payload_width(&self) -> Option<usize> {
        self.fields
            .iter()
            .map(|f| TypeCode::try_from(f.code).ok().map(TypeCode::width))
            .sum()
    }

    /// Check the declared length against header plus payload width
    pub fn validate_length(&self) -> Result<()> {
        let payload = self
            .fields
            .iter()
            .map(|f| TypeCode::try_from(f.code).map(TypeCode::width))
            .sum::<Result<usize>>()?;
        let computed = payload + FRAME_HEADER_LEN;

        if computed != self.declared_length as usize {
            return Err(DataFlashError::LengthMismatch {
                name: self.name.clone(),
                declared: self.declared_length,
                computed,
            });
        }
        Ok(())
    }
}
