//! Sequential little-endian stream reading and writing.
//!
//! Cast files are consumed strictly front to back, so these helpers sit on top of
//! [`BufRead`]/[`Write`] rather than a seekable buffer. Every read either consumes
//! exactly the bytes it reports or fails with [`Error::UnexpectedEof`].

use std::io::{BufRead, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{Error, Result};

/// Extension trait for reading Cast scalars from a buffered stream.
///
/// # Example
///
/// ```
/// use cast_common::CastReadExt;
///
/// let data = [0x01u8, 0x02, 0x03, 0x04, b'h', b'i', 0x00];
/// let mut reader = &data[..];
///
/// assert_eq!(reader.read_u32_le().unwrap(), 0x04030201);
/// assert_eq!(reader.read_cstring().unwrap(), "hi");
/// ```
pub trait CastReadExt: BufRead {
    /// Read a single byte.
    #[inline]
    fn read_u8_le(&mut self) -> Result<u8> {
        Ok(self.read_u8()?)
    }

    /// Read a little-endian u16.
    #[inline]
    fn read_u16_le(&mut self) -> Result<u16> {
        Ok(self.read_u16::<LittleEndian>()?)
    }

    /// Read a little-endian u32.
    #[inline]
    fn read_u32_le(&mut self) -> Result<u32> {
        Ok(self.read_u32::<LittleEndian>()?)
    }

    /// Read a little-endian u64.
    #[inline]
    fn read_u64_le(&mut self) -> Result<u64> {
        Ok(self.read_u64::<LittleEndian>()?)
    }

    /// Read a little-endian f32.
    #[inline]
    fn read_f32_le(&mut self) -> Result<f32> {
        Ok(self.read_f32::<LittleEndian>()?)
    }

    /// Read a little-endian f64.
    #[inline]
    fn read_f64_le(&mut self) -> Result<f64> {
        Ok(self.read_f64::<LittleEndian>()?)
    }

    /// Read `N` consecutive little-endian f32 components.
    #[inline]
    fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut out = [0f32; N];
        self.read_f32_into::<LittleEndian>(&mut out)?;
        Ok(out)
    }

    /// Read a fixed-size byte array.
    #[inline]
    fn read_byte_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        self.read_exact(&mut out)?;
        Ok(out)
    }

    /// Read exactly `count` bytes.
    ///
    /// The buffer grows with the data actually read, so a corrupt length field
    /// cannot trigger a huge up-front allocation.
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        Read::take(&mut *self, count as u64).read_to_end(&mut bytes)?;
        if bytes.len() != count {
            return Err(Error::UnexpectedEof);
        }
        Ok(bytes)
    }

    /// Read a string of a specific byte length.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    fn read_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        Ok(into_string_lossy(bytes))
    }

    /// Read a null-terminated string, consuming the terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    fn read_cstring(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        self.read_until(0, &mut bytes)?;

        if bytes.pop() != Some(0) {
            return Err(Error::UnexpectedEof);
        }

        Ok(into_string_lossy(bytes))
    }
}

impl<R: BufRead + ?Sized> CastReadExt for R {}

/// Extension trait for writing Cast scalars.
pub trait CastWriteExt: Write {
    /// Write a single byte.
    #[inline]
    fn write_u8_le(&mut self, value: u8) -> Result<()> {
        Ok(self.write_u8(value)?)
    }

    /// Write a little-endian u16.
    #[inline]
    fn write_u16_le(&mut self, value: u16) -> Result<()> {
        Ok(self.write_u16::<LittleEndian>(value)?)
    }

    /// Write a little-endian u32.
    #[inline]
    fn write_u32_le(&mut self, value: u32) -> Result<()> {
        Ok(self.write_u32::<LittleEndian>(value)?)
    }

    /// Write a little-endian u64.
    #[inline]
    fn write_u64_le(&mut self, value: u64) -> Result<()> {
        Ok(self.write_u64::<LittleEndian>(value)?)
    }

    /// Write a little-endian f32.
    #[inline]
    fn write_f32_le(&mut self, value: f32) -> Result<()> {
        Ok(self.write_f32::<LittleEndian>(value)?)
    }

    /// Write a little-endian f64.
    #[inline]
    fn write_f64_le(&mut self, value: f64) -> Result<()> {
        Ok(self.write_f64::<LittleEndian>(value)?)
    }

    /// Write consecutive little-endian f32 components.
    #[inline]
    fn write_f32_array(&mut self, values: &[f32]) -> Result<()> {
        for &value in values {
            self.write_f32::<LittleEndian>(value)?;
        }
        Ok(())
    }

    /// Write a string followed by a single null terminator.
    fn write_cstring(&mut self, value: &str) -> Result<()> {
        self.write_all(value.as_bytes())?;
        self.write_u8(0)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> CastWriteExt for W {}

fn into_string_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, // u16: 0xFFFF
            0x2A, // u8
        ];
        let mut reader = &data[..];

        assert_eq!(reader.read_u32_le().unwrap(), 0x04030201);
        assert_eq!(reader.read_u16_le().unwrap(), 0xFFFF);
        assert_eq!(reader.read_u8_le().unwrap(), 42);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_cstring() {
        let data = b"hello\0world\0";
        let mut reader = &data[..];

        assert_eq!(reader.read_cstring().unwrap(), "hello");
        assert_eq!(reader.read_cstring().unwrap(), "world");
    }

    #[test]
    fn test_unterminated_cstring_is_eof() {
        let data = b"dangling";
        let mut reader = &data[..];

        assert!(matches!(reader.read_cstring(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_invalid_utf8_passes_through() {
        let data = [b'a', 0xFF, b'b', 0x00];
        let mut reader = &data[..];

        let s = reader.read_cstring().unwrap();
        assert!(s.starts_with('a'));
        assert!(s.ends_with('b'));
    }

    #[test]
    fn test_read_bytes_short() {
        let data = [0x01, 0x02];
        let mut reader = &data[..];

        assert!(matches!(reader.read_bytes(3), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = &data[..];

        assert!(matches!(reader.read_u32_le(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_write_then_read_vector() {
        let mut out = Vec::new();
        out.write_f32_array(&[1.0, -2.5, 3.25]).unwrap();
        out.write_cstring("bone").unwrap();
        assert_eq!(out.len(), 12 + 5);

        let mut reader = &out[..];
        assert_eq!(reader.read_f32_array::<3>().unwrap(), [1.0, -2.5, 3.25]);
        assert_eq!(reader.read_cstring().unwrap(), "bone");
    }
}
