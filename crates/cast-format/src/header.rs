//! Fixed-size Cast record headers.
//!
//! All fields are little-endian on disk regardless of host byte order, so the
//! structures are built from `zerocopy`'s little-endian integer wrappers.

use std::io::{BufRead, Write};

use cast_common::CastReadExt;
use zerocopy::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Cast file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FileHeader {
    /// Always [`FileHeader::MAGIC`].
    pub magic: U32,
    /// Format version, written as [`FileHeader::VERSION`]; not enforced on load.
    pub version: U32,
    /// Number of root nodes that follow.
    pub root_node_count: U32,
    /// Reserved, written as zero.
    pub flags: U32,
}

impl FileHeader {
    /// The magic at the start of a Cast file (`"cast"`).
    pub const MAGIC: u32 = 0x7473_6163;

    /// The version written by this crate.
    pub const VERSION: u32 = 1;

    /// Size of the header on disk.
    pub const SIZE: usize = 16;

    /// Create a header for a file with `root_node_count` roots.
    pub fn new(root_node_count: u32) -> Self {
        Self {
            magic: U32::new(Self::MAGIC),
            version: U32::new(Self::VERSION),
            root_node_count: U32::new(root_node_count),
            flags: U32::new(0),
        }
    }

    /// Read the header and check the magic.
    pub fn load<R: BufRead + ?Sized>(reader: &mut R) -> Result<Self> {
        let bytes: [u8; Self::SIZE] = reader.read_byte_array()?;
        let header = Self::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEndOfStream)?;

        if header.magic.get() != Self::MAGIC {
            return Err(Error::BadMagic {
                actual: header.magic.get(),
            });
        }

        Ok(header)
    }

    /// Write the header.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.as_bytes())?;
        Ok(())
    }
}

/// Node record header.
///
/// Precedes every node's properties and children.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct NodeHeader {
    /// Kind tag of the node.
    pub identifier: U32,
    /// Total size of the node and its subtree in bytes (informational on load).
    pub node_size: U32,
    /// Identity hash, zero when the writer did not assign one.
    pub node_hash: U64,
    /// Number of property records that follow.
    pub property_count: U32,
    /// Number of child nodes that follow the properties.
    pub child_count: U32,
}

impl NodeHeader {
    /// Size of the header on disk.
    pub const SIZE: usize = 24;

    /// Read a node header.
    pub fn load<R: BufRead + ?Sized>(reader: &mut R) -> Result<Self> {
        let bytes: [u8; Self::SIZE] = reader.read_byte_array()?;
        Self::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEndOfStream)
    }

    /// Write a node header.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.as_bytes())?;
        Ok(())
    }
}

/// Property record header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct PropertyHeader {
    /// ASCII type tag, right-padded with zero for single-character tags.
    pub type_tag: [u8; 2],
    /// Length of the name in bytes.
    pub name_length: U16,
    /// Number of values in the payload.
    pub value_count: U32,
}

impl PropertyHeader {
    /// Size of the header on disk.
    pub const SIZE: usize = 8;

    /// Read a property header.
    pub fn load<R: BufRead + ?Sized>(reader: &mut R) -> Result<Self> {
        let bytes: [u8; Self::SIZE] = reader.read_byte_array()?;
        Self::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEndOfStream)
    }

    /// Write a property header.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.as_bytes())?;
        Ok(())
    }
}

const _: () = assert!(std::mem::size_of::<FileHeader>() == FileHeader::SIZE);
const _: () = assert!(std::mem::size_of::<NodeHeader>() == NodeHeader::SIZE);
const _: () = assert!(std::mem::size_of::<PropertyHeader>() == PropertyHeader::SIZE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_header_layout() {
        let header = FileHeader::new(2);
        assert_eq!(
            header.as_bytes(),
            &[b'c', b'a', b's', b't', 1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_bad_magic() {
        let data = [0u8; 16];
        let result = FileHeader::load(&mut &data[..]);
        assert!(matches!(result, Err(Error::BadMagic { actual: 0 })));
    }

    #[test]
    fn test_truncated_node_header() {
        let data = [0u8; 10];
        let result = NodeHeader::load(&mut &data[..]);
        assert!(matches!(result, Err(Error::UnexpectedEndOfStream)));
    }

    #[test]
    fn test_node_header_fields() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x6C656B73u32.to_le_bytes());
        data.extend_from_slice(&24u32.to_le_bytes());
        data.extend_from_slice(&0x1122334455667788u64.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());

        let header = NodeHeader::load(&mut &data[..]).unwrap();
        assert_eq!(header.identifier.get(), 0x6C656B73);
        assert_eq!(header.node_hash.get(), 0x1122334455667788);
        assert_eq!(header.property_count.get(), 3);
        assert_eq!(header.child_count.get(), 1);
    }
}
