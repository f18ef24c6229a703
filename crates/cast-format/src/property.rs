//! Property records.

use std::io::{BufRead, Write};

use cast_common::{CastReadExt, CastWriteExt};
use zerocopy::little_endian::{U16, U32};

use crate::header::PropertyHeader;
use crate::value::parse_type_tag;
use crate::{Error, PropertyType, Result, Value};

/// Upper bound on values reserved before any of them has been read.
const MAX_PREALLOCATED_VALUES: usize = 1 << 20;

/// A named, homogeneously-typed list of values attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    ty: PropertyType,
    values: Vec<Value>,
}

impl Property {
    /// Create an empty property.
    pub fn new(name: impl Into<String>, ty: PropertyType) -> Self {
        Self {
            name: name.into(),
            ty,
            values: Vec::new(),
        }
    }

    /// Create a property holding a single value, typed after that value.
    pub fn from_value(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            ty: value.property_type(),
            values: vec![value],
        }
    }

    /// Create a property from a list of values, all of which must be of type `ty`.
    pub fn with_values<I>(name: impl Into<String>, ty: PropertyType, values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut property = Self::new(name, ty);
        for value in values {
            property.push(value)?;
        }
        Ok(property)
    }

    /// Get the property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the property type.
    pub fn property_type(&self) -> PropertyType {
        self.ty
    }

    /// Get the values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get the first value, which is the only one for most scalar properties.
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the property holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append a value of the property's type.
    ///
    /// String properties persist only their first value.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let actual = value.property_type();
        if actual != self.ty {
            return Err(Error::TypeMismatch {
                expected: self.ty,
                actual,
            });
        }
        self.values.push(value);
        Ok(())
    }

    /// Read a property record.
    pub fn load<R: BufRead + ?Sized>(reader: &mut R) -> Result<Self> {
        let header = PropertyHeader::load(reader)?;
        let ty = parse_type_tag(header.type_tag)?;
        let name = reader.read_string(header.name_length.get() as usize)?;

        let values = if ty == PropertyType::String {
            // The count field is not trusted for strings; there is always one.
            vec![Value::decode(reader, ty)?]
        } else {
            let count = header.value_count.get() as usize;
            let mut values = Vec::with_capacity(count.min(MAX_PREALLOCATED_VALUES));
            for _ in 0..count {
                values.push(Value::decode(reader, ty)?);
            }
            values
        };

        Ok(Self { name, ty, values })
    }

    /// Write this property record.
    ///
    /// Fails with [`Error::InteriorNul`] if a string value contains a NUL byte,
    /// since the reader would stop at it.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let name_length = u16::try_from(self.name.len()).map_err(|_| Error::NameTooLong {
            len: self.name.len(),
        })?;

        let text = self.string_value();
        if text.contains('\0') {
            return Err(Error::InteriorNul {
                name: self.name.clone(),
            });
        }

        let value_count = if self.ty == PropertyType::String {
            1
        } else {
            u32::try_from(self.values.len()).map_err(|_| Error::TooManyValues {
                count: self.values.len(),
            })?
        };

        PropertyHeader {
            type_tag: self.ty.tag(),
            name_length: U16::new(name_length),
            value_count: U32::new(value_count),
        }
        .save(writer)?;

        writer.write_all(self.name.as_bytes())?;

        if self.ty == PropertyType::String {
            writer.write_cstring(text)?;
        } else {
            for value in &self.values {
                value.encode(writer)?;
            }
        }

        Ok(())
    }

    /// Encoded size of this record in bytes, saturating at `u32::MAX`.
    pub fn length(&self) -> u32 {
        u32::try_from(self.encoded_len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn encoded_len(&self) -> u64 {
        let payload = match self.ty.width() {
            Some(width) => width as u64 * self.values.len() as u64,
            None => self.string_value().len() as u64 + 1,
        };
        PropertyHeader::SIZE as u64 + self.name.len() as u64 + payload
    }

    fn string_value(&self) -> &str {
        self.values.first().and_then(Value::as_str).unwrap_or("")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Property", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.ty)?;
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(property: &Property) -> Vec<u8> {
        let mut out = Vec::new();
        property.save(&mut out).unwrap();
        out
    }

    #[test]
    fn test_string_property() {
        let property = Property::from_value("n", "root");
        assert_eq!(property.length(), 8 + 1 + 5);

        let bytes = encode(&property);
        assert_eq!(bytes.len(), property.length() as usize);
        assert_eq!(&bytes[..2], b"s\0");
        assert_eq!(&bytes[2..4], &1u16.to_le_bytes());
        assert_eq!(&bytes[4..8], &1u32.to_le_bytes());

        let loaded = Property::load(&mut &bytes[..]).unwrap();
        assert_eq!(loaded.name(), "n");
        assert_eq!(loaded.values(), &[Value::from("root")]);
    }

    #[test]
    fn test_string_ignores_value_count() {
        let mut data = Vec::new();
        data.extend_from_slice(b"s\0");
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&7u32.to_le_bytes());
        data.extend_from_slice(b"p");
        data.extend_from_slice(b"textures/a.png\0");

        let mut reader = &data[..];
        let property = Property::load(&mut reader).unwrap();
        assert_eq!(property.len(), 1);
        assert_eq!(property.first().and_then(Value::as_str), Some("textures/a.png"));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_string_persists_one_value() {
        let property =
            Property::with_values("n", PropertyType::String, ["first", "second"]).unwrap();
        let loaded = Property::load(&mut &encode(&property)[..]).unwrap();
        assert_eq!(loaded.values(), &[Value::from("first")]);
    }

    #[test]
    fn test_vector_property_round_trip() {
        let property = Property::with_values(
            "vp",
            PropertyType::Vector3,
            [[0.0f32, 1.0, 2.0], [3.0, 4.0, 5.0]],
        )
        .unwrap();
        assert_eq!(property.length(), 8 + 2 + 24);

        let bytes = encode(&property);
        assert_eq!(&bytes[..2], b"3v");
        assert_eq!(bytes.len(), property.length() as usize);
        assert_eq!(Property::load(&mut &bytes[..]).unwrap(), property);
    }

    #[test]
    fn test_empty_property_round_trip() {
        let property = Property::new("f", PropertyType::Integer32);
        let bytes = encode(&property);
        assert_eq!(bytes.len(), 9);
        assert!(Property::load(&mut &bytes[..]).unwrap().is_empty());
    }

    #[test]
    fn test_push_type_mismatch() {
        let mut property = Property::new("f", PropertyType::Short);
        property.push(3u16).unwrap();
        let err = property.push(3u32).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: PropertyType::Short,
                actual: PropertyType::Integer32
            }
        ));
    }

    #[test]
    fn test_unsupported_type() {
        let mut data = Vec::new();
        data.extend_from_slice(b"z\0");
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());

        assert!(matches!(
            Property::load(&mut &data[..]),
            Err(Error::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_truncated_values() {
        let mut data = Vec::new();
        data.extend_from_slice(b"i\0");
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(b"f");
        data.extend_from_slice(&[0u8; 8]);

        assert!(matches!(
            Property::load(&mut &data[..]),
            Err(Error::UnexpectedEndOfStream)
        ));
    }

    #[test]
    fn test_string_with_nul_is_rejected() {
        let property = Property::from_value("n", "a\0b");
        let mut out = Vec::new();
        let err = property.save(&mut out).unwrap_err();
        assert!(matches!(err, Error::InteriorNul { ref name } if name == "n"));
        assert!(err.is_encode_error());
        assert!(out.is_empty());
    }

    #[test]
    fn test_name_too_long() {
        let property = Property::from_value("x".repeat(70_000), 1u8);
        let err = property.save(&mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, Error::NameTooLong { len: 70_000 }));
    }
}
