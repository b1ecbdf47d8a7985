//! Memory value enum and the closed set of value types

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a typed value read from or destined for memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum MemoryValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
}

impl MemoryValue {
    /// Parses user text as a value of the given type.
    ///
    /// Integers accept decimal or `0x`-prefixed hexadecimal with an optional
    /// sign; the whole text must be consumed and the value must fit the type.
    /// Text values are taken verbatim.
    pub fn parse(text: &str, value_type: ValueType) -> MemoryResult<Self> {
        let value = match value_type {
            ValueType::I8 => MemoryValue::I8(parse_integer(text, value_type)?),
            ValueType::I16 => MemoryValue::I16(parse_integer(text, value_type)?),
            ValueType::I32 => MemoryValue::I32(parse_integer(text, value_type)?),
            ValueType::I64 => MemoryValue::I64(parse_integer(text, value_type)?),
            ValueType::U8 => MemoryValue::U8(parse_integer(text, value_type)?),
            ValueType::U16 => MemoryValue::U16(parse_integer(text, value_type)?),
            ValueType::U32 => MemoryValue::U32(parse_integer(text, value_type)?),
            ValueType::U64 => MemoryValue::U64(parse_integer(text, value_type)?),
            ValueType::F32 => MemoryValue::F32(parse_float(text, value_type)?),
            ValueType::F64 => MemoryValue::F64(parse_float(text, value_type)?),
            ValueType::String => {
                if text.is_empty() {
                    return Err(MemoryError::invalid_argument("empty string value"));
                }
                MemoryValue::String(text.to_string())
            }
        };
        Ok(value)
    }

    /// Returns the size in bytes of the value
    pub fn size(&self) -> usize {
        match self {
            MemoryValue::String(s) => s.len(),
            other => other.value_type().size().unwrap_or(0),
        }
    }

    /// Converts the value to its in-memory representation (native byte order)
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MemoryValue::I8(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::I16(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::I32(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::I64(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::U8(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::U16(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::U32(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::U64(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::F32(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::F64(v) => v.to_ne_bytes().to_vec(),
            MemoryValue::String(s) => s.as_bytes().to_vec(),
        }
    }

    /// Decodes a value of the given type from the front of `bytes`.
    ///
    /// Returns `None` when there are fewer bytes than the type needs. Text is
    /// decoded lossily since memory rarely holds clean UTF-8.
    pub fn from_bytes(bytes: &[u8], value_type: ValueType) -> Option<Self> {
        fn take<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
            bytes.get(..N)?.try_into().ok()
        }

        let value = match value_type {
            ValueType::I8 => MemoryValue::I8(i8::from_ne_bytes(take(bytes)?)),
            ValueType::I16 => MemoryValue::I16(i16::from_ne_bytes(take(bytes)?)),
            ValueType::I32 => MemoryValue::I32(i32::from_ne_bytes(take(bytes)?)),
            ValueType::I64 => MemoryValue::I64(i64::from_ne_bytes(take(bytes)?)),
            ValueType::U8 => MemoryValue::U8(u8::from_ne_bytes(take(bytes)?)),
            ValueType::U16 => MemoryValue::U16(u16::from_ne_bytes(take(bytes)?)),
            ValueType::U32 => MemoryValue::U32(u32::from_ne_bytes(take(bytes)?)),
            ValueType::U64 => MemoryValue::U64(u64::from_ne_bytes(take(bytes)?)),
            ValueType::F32 => MemoryValue::F32(f32::from_ne_bytes(take(bytes)?)),
            ValueType::F64 => MemoryValue::F64(f64::from_ne_bytes(take(bytes)?)),
            ValueType::String => {
                MemoryValue::String(String::from_utf8_lossy(bytes).into_owned())
            }
        };
        Some(value)
    }

    /// Gets the value type enum for this value
    pub fn value_type(&self) -> ValueType {
        match self {
            MemoryValue::I8(_) => ValueType::I8,
            MemoryValue::I16(_) => ValueType::I16,
            MemoryValue::I32(_) => ValueType::I32,
            MemoryValue::I64(_) => ValueType::I64,
            MemoryValue::U8(_) => ValueType::U8,
            MemoryValue::U16(_) => ValueType::U16,
            MemoryValue::U32(_) => ValueType::U32,
            MemoryValue::U64(_) => ValueType::U64,
            MemoryValue::F32(_) => ValueType::F32,
            MemoryValue::F64(_) => ValueType::F64,
            MemoryValue::String(_) => ValueType::String,
        }
    }
}

fn parse_integer<T>(text: &str, value_type: ValueType) -> MemoryResult<T>
where
    T: TryFrom<i128>,
{
    let invalid = || MemoryError::invalid_argument(format!("invalid {} value '{}'", value_type, text));

    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => parse_digits(hex, 16),
        None => parse_digits(unsigned, 10),
    }
    .ok_or_else(invalid)?;

    let value = if negative { -magnitude } else { magnitude };

    T::try_from(value).map_err(|_| {
        MemoryError::invalid_argument(format!("value '{}' is out of range for {}", text, value_type))
    })
}

// from_str_radix alone would accept a second sign after the one stripped above
fn parse_digits(digits: &str, radix: u32) -> Option<i128> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i128::from_str_radix(digits, radix).ok()
}

fn parse_float<T: FromStr>(text: &str, value_type: ValueType) -> MemoryResult<T> {
    text.parse::<T>()
        .map_err(|_| MemoryError::invalid_argument(format!("invalid {} value '{}'", value_type, text)))
}

/// The closed set of types memory can be interpreted as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "int8")]
    I8,
    #[serde(rename = "int16")]
    I16,
    #[serde(rename = "int32")]
    I32,
    #[serde(rename = "int64")]
    I64,
    #[serde(rename = "uint8")]
    U8,
    #[serde(rename = "uint16")]
    U16,
    #[serde(rename = "uint32")]
    U32,
    #[serde(rename = "uint64")]
    U64,
    #[serde(rename = "float")]
    F32,
    #[serde(rename = "double")]
    F64,
    #[serde(rename = "string")]
    String,
}

impl ValueType {
    pub const ALL: [ValueType; 11] = [
        ValueType::I8,
        ValueType::I16,
        ValueType::I32,
        ValueType::I64,
        ValueType::U8,
        ValueType::U16,
        ValueType::U32,
        ValueType::U64,
        ValueType::F32,
        ValueType::F64,
        ValueType::String,
    ];

    /// Returns the size in bytes for this value type, `None` for text
    pub fn size(&self) -> Option<usize> {
        match self {
            ValueType::I8 | ValueType::U8 => Some(1),
            ValueType::I16 | ValueType::U16 => Some(2),
            ValueType::I32 | ValueType::U32 | ValueType::F32 => Some(4),
            ValueType::I64 | ValueType::U64 | ValueType::F64 => Some(8),
            ValueType::String => None,
        }
    }

    /// Name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::I8 => "int8",
            ValueType::I16 => "int16",
            ValueType::I32 => "int32",
            ValueType::I64 => "int64",
            ValueType::U8 => "uint8",
            ValueType::U16 => "uint16",
            ValueType::U32 => "uint32",
            ValueType::U64 => "uint64",
            ValueType::F32 => "float",
            ValueType::F64 => "double",
            ValueType::String => "string",
        }
    }
}

impl FromStr for ValueType {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| MemoryError::invalid_argument(format!("invalid type '{}'", s)))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::I8(v) => write!(f, "{}", v),
            MemoryValue::I16(v) => write!(f, "{}", v),
            MemoryValue::I32(v) => write!(f, "{}", v),
            MemoryValue::I64(v) => write!(f, "{}", v),
            MemoryValue::U8(v) => write!(f, "{}", v),
            MemoryValue::U16(v) => write!(f, "{}", v),
            MemoryValue::U32(v) => write!(f, "{}", v),
            MemoryValue::U64(v) => write!(f, "{}", v),
            MemoryValue::F32(v) => write!(f, "{}", v),
            MemoryValue::F64(v) => write!(f, "{}", v),
            MemoryValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_size() {
        assert_eq!(MemoryValue::I32(42).size(), 4);
        assert_eq!(MemoryValue::U64(100).size(), 8);
        assert_eq!(MemoryValue::F32(1.5).size(), 4);
        assert_eq!(MemoryValue::String("abc".into()).size(), 3);
    }

    #[test]
    fn test_value_to_bytes() {
        assert_eq!(
            MemoryValue::U32(0x12345678).to_bytes(),
            0x12345678u32.to_ne_bytes().to_vec()
        );
        assert_eq!(MemoryValue::I8(-1).to_bytes(), vec![0xFF]);
        assert_eq!(MemoryValue::String("Hi".into()).to_bytes(), vec![b'H', b'i']);
    }

    #[test]
    fn test_value_from_bytes() {
        let bytes = 0x12345678u32.to_ne_bytes();
        let value = MemoryValue::from_bytes(&bytes, ValueType::U32).unwrap();
        assert_eq!(value, MemoryValue::U32(0x12345678));

        assert!(MemoryValue::from_bytes(&[1, 2], ValueType::I32).is_none());
        assert_eq!(
            MemoryValue::from_bytes(b"hey", ValueType::String),
            Some(MemoryValue::String("hey".into()))
        );
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(
            MemoryValue::parse("100", ValueType::I32).unwrap(),
            MemoryValue::I32(100)
        );
        assert_eq!(
            MemoryValue::parse("-128", ValueType::I8).unwrap(),
            MemoryValue::I8(-128)
        );
        assert_eq!(
            MemoryValue::parse("0xff", ValueType::U8).unwrap(),
            MemoryValue::U8(255)
        );
        assert_eq!(
            MemoryValue::parse("0xFFFFFFFFFFFFFFFF", ValueType::U64).unwrap(),
            MemoryValue::U64(u64::MAX)
        );
        assert_eq!(
            MemoryValue::parse("-0x10", ValueType::I16).unwrap(),
            MemoryValue::I16(-16)
        );
        assert_eq!(
            MemoryValue::parse("2.5", ValueType::F64).unwrap(),
            MemoryValue::F64(2.5)
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for (text, value_type) in [
            ("256", ValueType::U8),
            ("-1", ValueType::U32),
            ("128", ValueType::I8),
            ("12abc", ValueType::I32),
            ("0x", ValueType::I32),
            ("", ValueType::I32),
            ("--5", ValueType::I32),
            ("+-5", ValueType::I32),
            ("1.5", ValueType::I32),
            ("abc", ValueType::F32),
            ("", ValueType::String),
        ] {
            let result = MemoryValue::parse(text, value_type);
            assert!(
                matches!(result, Err(MemoryError::InvalidArgument(_))),
                "{} as {} should fail",
                text,
                value_type
            );
        }
    }

    #[test]
    fn test_value_type_names() {
        for value_type in ValueType::ALL {
            assert_eq!(value_type.name().parse::<ValueType>().unwrap(), value_type);
        }
        assert!("int128".parse::<ValueType>().is_err());
        assert_eq!(ValueType::String.size(), None);
        assert_eq!(ValueType::F64.size(), Some(8));
    }
}
