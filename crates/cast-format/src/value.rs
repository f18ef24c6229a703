//! Property value types and their on-disk codec.
//!
//! Every property stores values of exactly one [`PropertyType`]. The [`Value`]
//! enum is the in-memory form of a single value; semantic views cast it to the
//! concrete Rust type they expect.

use std::fmt;
use std::io::{BufRead, Write};

use cast_common::{CastReadExt, CastWriteExt};

use crate::{Error, Result};

/// Type tag of a property.
///
/// Each variant corresponds to one ASCII tag stored in the property header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// `b` - unsigned 8-bit integer.
    Byte,
    /// `h` - unsigned 16-bit integer.
    Short,
    /// `i` - unsigned 32-bit integer.
    Integer32,
    /// `l` - unsigned 64-bit integer.
    Integer64,
    /// `f` - 32-bit float.
    Float,
    /// `d` - 64-bit float.
    Double,
    /// `s` - null-terminated UTF-8 string, always a single value.
    String,
    /// `2v` - two-component float vector.
    Vector2,
    /// `3v` - three-component float vector.
    Vector3,
    /// `4v` - four-component float vector.
    Vector4,
}

impl PropertyType {
    /// Parse from the two tag bytes of a property header.
    pub fn from_tag(tag: [u8; 2]) -> Option<Self> {
        match &tag {
            b"b\0" => Some(Self::Byte),
            b"h\0" => Some(Self::Short),
            b"i\0" => Some(Self::Integer32),
            b"l\0" => Some(Self::Integer64),
            b"f\0" => Some(Self::Float),
            b"d\0" => Some(Self::Double),
            b"s\0" => Some(Self::String),
            b"2v" => Some(Self::Vector2),
            b"3v" => Some(Self::Vector3),
            b"4v" => Some(Self::Vector4),
            _ => None,
        }
    }

    /// The two tag bytes written in a property header.
    pub const fn tag(self) -> [u8; 2] {
        match self {
            Self::Byte => *b"b\0",
            Self::Short => *b"h\0",
            Self::Integer32 => *b"i\0",
            Self::Integer64 => *b"l\0",
            Self::Float => *b"f\0",
            Self::Double => *b"d\0",
            Self::String => *b"s\0",
            Self::Vector2 => *b"2v",
            Self::Vector3 => *b"3v",
            Self::Vector4 => *b"4v",
        }
    }

    /// The tag as text, without padding.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Byte => "b",
            Self::Short => "h",
            Self::Integer32 => "i",
            Self::Integer64 => "l",
            Self::Float => "f",
            Self::Double => "d",
            Self::String => "s",
            Self::Vector2 => "2v",
            Self::Vector3 => "3v",
            Self::Vector4 => "4v",
        }
    }

    /// Encoded width of one value, or `None` for variable-width strings.
    pub const fn width(self) -> Option<u32> {
        match self {
            Self::Byte => Some(1),
            Self::Short => Some(2),
            Self::Integer32 => Some(4),
            Self::Integer64 => Some(8),
            Self::Float => Some(4),
            Self::Double => Some(8),
            Self::String => None,
            Self::Vector2 => Some(8),
            Self::Vector3 => Some(12),
            Self::Vector4 => Some(16),
        }
    }

    /// Check if this is one of the unsigned integer types narrower than 64 bits.
    pub const fn is_integer32(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Integer32)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(u8),
    Short(u16),
    Integer32(u32),
    Integer64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Vector2([f32; 2]),
    Vector3([f32; 3]),
    Vector4([f32; 4]),
}

impl Value {
    /// Decode one value of type `ty` from the stream.
    pub fn decode<R: BufRead + ?Sized>(reader: &mut R, ty: PropertyType) -> Result<Self> {
        let value = match ty {
            PropertyType::Byte => Self::Byte(reader.read_u8_le()?),
            PropertyType::Short => Self::Short(reader.read_u16_le()?),
            PropertyType::Integer32 => Self::Integer32(reader.read_u32_le()?),
            PropertyType::Integer64 => Self::Integer64(reader.read_u64_le()?),
            PropertyType::Float => Self::Float(reader.read_f32_le()?),
            PropertyType::Double => Self::Double(reader.read_f64_le()?),
            PropertyType::String => Self::String(reader.read_cstring()?),
            PropertyType::Vector2 => Self::Vector2(reader.read_f32_array()?),
            PropertyType::Vector3 => Self::Vector3(reader.read_f32_array()?),
            PropertyType::Vector4 => Self::Vector4(reader.read_f32_array()?),
        };
        Ok(value)
    }

    /// Encode this value; strings get their null terminator.
    pub fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::Byte(v) => writer.write_u8_le(*v)?,
            Self::Short(v) => writer.write_u16_le(*v)?,
            Self::Integer32(v) => writer.write_u32_le(*v)?,
            Self::Integer64(v) => writer.write_u64_le(*v)?,
            Self::Float(v) => writer.write_f32_le(*v)?,
            Self::Double(v) => writer.write_f64_le(*v)?,
            Self::String(v) => writer.write_cstring(v)?,
            Self::Vector2(v) => writer.write_f32_array(v)?,
            Self::Vector3(v) => writer.write_f32_array(v)?,
            Self::Vector4(v) => writer.write_f32_array(v)?,
        }
        Ok(())
    }

    /// The property type this value belongs to.
    pub const fn property_type(&self) -> PropertyType {
        match self {
            Self::Byte(_) => PropertyType::Byte,
            Self::Short(_) => PropertyType::Short,
            Self::Integer32(_) => PropertyType::Integer32,
            Self::Integer64(_) => PropertyType::Integer64,
            Self::Float(_) => PropertyType::Float,
            Self::Double(_) => PropertyType::Double,
            Self::String(_) => PropertyType::String,
            Self::Vector2(_) => PropertyType::Vector2,
            Self::Vector3(_) => PropertyType::Vector3,
            Self::Vector4(_) => PropertyType::Vector4,
        }
    }

    /// Encoded size of this value in bytes.
    pub fn byte_length(&self) -> u32 {
        match self {
            Self::String(s) => s.len() as u32 + 1,
            other => other.property_type().width().unwrap_or(0),
        }
    }

    /// Widen `b`, `h` and `i` values to `u32`.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Self::Byte(v) => Some(v as u32),
            Self::Short(v) => Some(v as u32),
            Self::Integer32(v) => Some(v),
            _ => None,
        }
    }

    /// Widen any unsigned integer value to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Integer64(v) => Some(v),
            _ => self.as_u32().map(u64::from),
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Double(v) => Some(v),
            Self::Float(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match *self {
            Self::Vector2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match *self {
            Self::Vector3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<[f32; 4]> {
        match *self {
            Self::Vector4(v) => Some(v),
            _ => None,
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::Short(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Integer32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Integer64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Self::Vector2(v)
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Self::Vector3(v)
    }
}

impl From<[f32; 4]> for Value {
    fn from(v: [f32; 4]) -> Self {
        Self::Vector4(v)
    }
}

/// Decode a property type tag, failing on anything outside the supported set.
pub(crate) fn parse_type_tag(tag: [u8; 2]) -> Result<PropertyType> {
    PropertyType::from_tag(tag).ok_or(Error::UnsupportedType { tag })
}

#[cfg(feature = "serde")]
impl serde::Serialize for PropertyType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Byte(v) => serializer.serialize_u8(*v),
            Self::Short(v) => serializer.serialize_u16(*v),
            Self::Integer32(v) => serializer.serialize_u32(*v),
            Self::Integer64(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f32(*v),
            Self::Double(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Vector2(v) => serde::Serialize::serialize(v, serializer),
            Self::Vector3(v) => serde::Serialize::serialize(v, serializer),
            Self::Vector4(v) => serde::Serialize::serialize(v, serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_table() {
        for ty in [
            PropertyType::Byte,
            PropertyType::Short,
            PropertyType::Integer32,
            PropertyType::Integer64,
            PropertyType::Float,
            PropertyType::Double,
            PropertyType::String,
            PropertyType::Vector2,
            PropertyType::Vector3,
            PropertyType::Vector4,
        ] {
            assert_eq!(PropertyType::from_tag(ty.tag()), Some(ty));
        }

        assert_eq!(PropertyType::Vector3.width(), Some(12));
        assert_eq!(PropertyType::String.width(), None);
    }

    #[test]
    fn test_unsupported_tag() {
        assert!(matches!(
            parse_type_tag(*b"q\0"),
            Err(Error::UnsupportedType { tag }) if &tag == b"q\0"
        ));
        // Unpadded single-character tags are not valid either.
        assert!(parse_type_tag(*b"bb").is_err());
    }

    #[test]
    fn test_decode_consumes_exact_width() {
        let data = [0x34, 0x12, 0xFF];
        let mut reader = &data[..];

        let value = Value::decode(&mut reader, PropertyType::Short).unwrap();
        assert_eq!(value, Value::Short(0x1234));
        assert_eq!(reader, &[0xFFu8][..]);
    }

    #[test]
    fn test_string_byte_length() {
        let value = Value::from("root");
        assert_eq!(value.byte_length(), 5);

        let mut out = Vec::new();
        value.encode(&mut out).unwrap();
        assert_eq!(out, b"root\0");
    }

    #[test]
    fn test_multibyte_string_length_counts_bytes() {
        let value = Value::from("é");
        assert_eq!(value.byte_length(), 3);
    }

    #[test]
    fn test_vector_decode() {
        let mut data = Vec::new();
        for f in [1.0f32, 2.0, 3.0, 4.0] {
            data.extend_from_slice(&f.to_le_bytes());
        }

        let value = Value::decode(&mut &data[..], PropertyType::Vector4).unwrap();
        assert_eq!(value.as_vec4(), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(value.byte_length(), 16);
    }

    #[test]
    fn test_truncated_value() {
        let data = [0x00, 0x00];
        let result = Value::decode(&mut &data[..], PropertyType::Double);
        assert!(matches!(result, Err(Error::UnexpectedEndOfStream)));
    }

    #[test]
    fn test_integer_widening() {
        assert_eq!(Value::Byte(7).as_u32(), Some(7));
        assert_eq!(Value::Short(700).as_u64(), Some(700));
        assert_eq!(Value::Integer64(1).as_u32(), None);
        assert_eq!(Value::Float(1.0).as_u32(), None);
    }
}
