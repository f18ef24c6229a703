//! The Cast container.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::header::FileHeader;
use crate::node::Node;
use crate::{Error, HashGenerator, NodeId, NodeKind, NodeMut, NodeRef, Result};

/// A Cast file: a forest of root nodes.
///
/// Nodes live in an arena owned by the container. [`NodeRef`] and [`NodeMut`]
/// borrow from it, and [`NodeId`] handles stay valid for the container's lifetime.
///
/// # Example
///
/// ```
/// use cast_format::{Cast, NodeKind};
///
/// let mut cast = Cast::new();
/// let root = cast.create_root();
/// let model = cast.add_child(root, NodeKind::Model);
/// cast.node_mut(model).unwrap().set_str("n", "crate");
///
/// let bytes = cast.to_bytes().unwrap();
/// let loaded = Cast::parse(&bytes).unwrap();
/// assert_eq!(loaded, cast);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cast {
    pub(crate) nodes: Vec<Node>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) hashes: HashGenerator,
}

impl Cast {
    /// Create an empty file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty file that assigns hashes from `hashes`.
    pub fn with_hash_generator(hashes: HashGenerator) -> Self {
        Self {
            hashes,
            ..Self::default()
        }
    }

    /// Check if `data` starts with the Cast magic.
    pub fn is_cast(data: &[u8]) -> bool {
        data.len() >= 4 && data[..4] == FileHeader::MAGIC.to_le_bytes()
    }

    /// Read a file from a stream.
    ///
    /// The stream is wrapped in a [`BufReader`], so bytes past the end of the
    /// file may be consumed. Use [`Cast::load_with`] with a buffered reader to
    /// keep the stream positioned right after the last node.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Self::load_with(BufReader::new(reader), HashGenerator::default())
    }

    /// Read a file from a buffered stream, synthesizing missing hashes from `hashes`.
    ///
    /// Reads stop exactly at the end of the last node.
    pub fn load_with<R: BufRead>(mut reader: R, hashes: HashGenerator) -> Result<Self> {
        Self::load_buffered(&mut reader, hashes)
    }

    /// Parse a file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::load_buffered(&mut &data[..], HashGenerator::default())
    }

    /// Read a file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening cast file");
        Self::load(File::open(path)?)
    }

    fn load_buffered<R: BufRead + ?Sized>(reader: &mut R, hashes: HashGenerator) -> Result<Self> {
        let header = FileHeader::load(reader)?;
        let version = header.version.get();
        if version != FileHeader::VERSION {
            warn!(version, "unexpected cast version");
        }

        let root_count = header.root_node_count.get();
        debug!(version, root_count, "loading cast file");

        let mut cast = Self::with_hash_generator(hashes);
        for _ in 0..root_count {
            let root = cast.load_node(reader, None)?;
            cast.roots.push(root);
        }

        debug!(nodes = cast.nodes.len(), "loaded cast file");
        Ok(cast)
    }

    /// Write the file to a stream.
    ///
    /// Node sizes are recomputed from the current tree.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let root_count = u32::try_from(self.roots.len()).map_err(|_| Error::TooManyRoots {
            count: self.roots.len(),
        })?;
        debug!(root_count, nodes = self.nodes.len(), "saving cast file");

        FileHeader::new(root_count).save(writer)?;
        for root in self.roots() {
            root.save(writer)?;
        }
        Ok(())
    }

    /// Encode the file into a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.save(&mut out)?;
        Ok(out)
    }

    /// Write the file to disk.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "writing cast file");
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Iterate over the root nodes in file order.
    pub fn roots(&self) -> impl ExactSizeIterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().map(move |&id| NodeRef::new(self, id))
    }

    /// Number of root nodes.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Iterate over every node, parents before their children.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |index| NodeRef::new(self, NodeId::from_index(index)))
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by handle.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then(|| NodeRef::new(self, id))
    }

    /// Get mutable access to a node by handle.
    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if id.index() < self.nodes.len() {
            Some(NodeMut::new(self, id))
        } else {
            None
        }
    }

    /// Get the hash generator used for new nodes.
    pub fn hash_generator(&self) -> &HashGenerator {
        &self.hashes
    }

    /// Append a new [`NodeKind::Root`] node.
    pub fn create_root(&mut self) -> NodeId {
        self.add_root(NodeKind::Root)
    }

    /// Append a new root node of any kind.
    pub fn add_root(&mut self, kind: NodeKind) -> NodeId {
        let hash = self.hashes.next_hash();
        let id = self.push_node(Node::new(kind, hash, None));
        self.roots.push(id);
        id
    }

    /// Append a new child under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this file.
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        assert!(parent.index() < self.nodes.len(), "parent {parent:?} out of range");
        let hash = self.hashes.next_hash();
        let id = self.push_node(Node::new(kind, hash, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }
}

/// Structural equality over the root forests.
impl PartialEq for Cast {
    fn eq(&self, other: &Self) -> bool {
        self.root_count() == other.root_count() && self.roots().eq(other.roots())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Cast {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.roots())
    }
}
