//! Node records.
//!
//! Nodes are stored in a flat arena owned by [`Cast`] and reference each other by
//! [`NodeId`]. A node owns its properties and the ids of its children; the parent
//! link is a plain index, so the tree has no shared ownership.

use std::fmt;
use std::io::{BufRead, Write};

use indexmap::IndexMap;
use tracing::trace;
use zerocopy::little_endian::{U32, U64};

use crate::header::NodeHeader;
use crate::views::NodeView;
use crate::{Buffer, Cast, Error, NodeKind, Property, PropertyType, Result, Value};

/// Upper bound on children reserved before any of them has been read.
const MAX_PREALLOCATED_CHILDREN: usize = 1 << 16;

/// Handle to a node inside a [`Cast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in its file's arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Storage for a single node.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) hash: u64,
    pub(crate) properties: IndexMap<String, Property>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// `Generic` kinds carrying a known tag are stored as that known kind, the
    /// same way a load would resolve them.
    pub(crate) fn new(kind: NodeKind, hash: u64, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::from_tag(kind.tag()),
            hash,
            properties: IndexMap::new(),
            children: Vec::new(),
            parent,
        }
    }
}

impl Cast {
    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Read one node record and its subtree, appending them to the arena.
    ///
    /// The walk keeps its own stack of open nodes, so nesting depth is bounded
    /// by memory rather than by the thread's stack.
    pub(crate) fn load_node<R: BufRead + ?Sized>(
        &mut self,
        reader: &mut R,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let (root, child_count) = self.load_record(reader, parent)?;
        let mut open = vec![(root, child_count)];

        while let Some((parent, remaining)) = open.last_mut() {
            if *remaining == 0 {
                open.pop();
                continue;
            }
            *remaining -= 1;
            let parent = *parent;

            let (child, child_count) = self.load_record(reader, Some(parent))?;
            self.nodes[parent.index()].children.push(child);
            open.push((child, child_count));
        }

        Ok(root)
    }

    /// Read a node header and its properties. Children are left to the caller.
    fn load_record<R: BufRead + ?Sized>(
        &mut self,
        reader: &mut R,
        parent: Option<NodeId>,
    ) -> Result<(NodeId, u32)> {
        let header = NodeHeader::load(reader)?;
        let kind = NodeKind::from_tag(header.identifier.get());
        let hash = match header.node_hash.get() {
            0 => self.hashes.next_hash(),
            hash => hash,
        };
        let property_count = header.property_count.get();
        let child_count = header.child_count.get();

        trace!(%kind, hash, property_count, child_count, "loading node");

        let id = self.push_node(Node::new(kind, hash, parent));

        for _ in 0..property_count {
            let property = Property::load(reader)?;
            let properties = &mut self.nodes[id.index()].properties;
            if properties.contains_key(property.name()) {
                trace!(name = property.name(), "dropping duplicate property");
                continue;
            }
            properties.insert(property.name().to_string(), property);
        }

        self.nodes[id.index()]
            .children
            .reserve((child_count as usize).min(MAX_PREALLOCATED_CHILDREN));

        Ok((id, child_count))
    }
}

/// Shared view of a node and its position in the tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    cast: &'a Cast,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(cast: &'a Cast, id: NodeId) -> Self {
        Self { cast, id }
    }

    #[inline]
    fn node(&self) -> &'a Node {
        &self.cast.nodes[self.id.index()]
    }

    /// Get the node's handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's kind.
    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    /// Get the node's identity hash.
    pub fn hash(&self) -> u64 {
        self.node().hash
    }

    /// Get the parent node, or `None` for a root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let cast = self.cast;
        self.node().parent.map(|id| NodeRef::new(cast, id))
    }

    /// Iterate over the direct children in file order.
    pub fn children(
        &self,
    ) -> impl ExactSizeIterator<Item = NodeRef<'a>> + DoubleEndedIterator + 'a {
        let cast = self.cast;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef::new(cast, id))
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Iterate over the direct children of view type `V`.
    pub fn children_of<V: NodeView<'a>>(&self) -> impl Iterator<Item = V> + 'a {
        self.children().filter_map(V::from_node)
    }

    /// Get the first direct child of view type `V`.
    pub fn child_of<V: NodeView<'a>>(&self) -> Option<V> {
        self.children().find_map(V::from_node)
    }

    /// Find a direct child by identity hash.
    ///
    /// Only direct children are searched; a miss is not an error.
    pub fn child_by_hash(&self, hash: u64) -> Option<NodeRef<'a>> {
        self.children().find(|child| child.hash() == hash)
    }

    /// View this node as `V` if the kind matches.
    pub fn view<V: NodeView<'a>>(&self) -> Option<V> {
        V::from_node(*self)
    }

    /// Iterate over the properties in stored order.
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &'a Property> + 'a {
        self.node().properties.values()
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&'a Property> {
        self.node().properties.get(name)
    }

    /// Number of properties.
    pub fn property_count(&self) -> usize {
        self.node().properties.len()
    }

    /// Encoded size of this node and its subtree, saturating at `u32::MAX`.
    ///
    /// Always computed from the current tree, never cached.
    pub fn length(&self) -> u32 {
        u32::try_from(self.encoded_len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn encoded_len(&self) -> u64 {
        self.descendants().map(|node| node.record_len()).sum()
    }

    /// Iterate over this node and everything below it, in file order.
    ///
    /// The walk keeps its own stack, so arbitrarily deep trees are fine.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            cast: self.cast,
            pending: vec![self.id],
        }
    }

    /// Size of the header and properties, without children.
    fn record_len(&self) -> u64 {
        let properties: u64 = self.properties().map(Property::encoded_len).sum();
        NodeHeader::SIZE as u64 + properties
    }

    /// Every node of the subtree in file order, paired with its subtree size.
    fn layout(&self) -> Vec<(NodeRef<'a>, u64)> {
        let mut layout: Vec<_> = self
            .descendants()
            .map(|node| (node, node.record_len()))
            .collect();

        // Walking backwards, each node's children have already been summed and
        // sit on top of `finished`, first child topmost.
        let mut finished: Vec<u64> = Vec::new();
        for (node, len) in layout.iter_mut().rev() {
            let split = finished.len() - node.child_count();
            *len += finished.drain(split..).sum::<u64>();
            finished.push(*len);
        }

        layout
    }

    /// Write this node and its subtree.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        for (node, len) in self.layout() {
            let node_size = u32::try_from(len).map_err(|_| Error::NodeTooLarge { len })?;

            // Every property and child takes at least one byte of the subtree, so
            // both counts fit once the subtree size does.
            NodeHeader {
                identifier: U32::new(node.kind().tag()),
                node_size: U32::new(node_size),
                node_hash: U64::new(node.hash()),
                property_count: U32::new(node.property_count() as u32),
                child_count: U32::new(node.child_count() as u32),
            }
            .save(writer)?;

            for property in node.properties() {
                property.save(writer)?;
            }
        }

        Ok(())
    }

    /// Kind, hash and properties match, and both have the same number of children.
    fn shallow_eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.hash() == other.hash()
            && self.property_count() == other.property_count()
            && self.properties().eq(other.properties())
            && self.child_count() == other.child_count()
    }

    pub(crate) fn first_value(&self, name: &str) -> Option<&'a Value> {
        self.property(name)?.first()
    }

    pub(crate) fn str_value(&self, name: &str) -> Option<&'a str> {
        self.first_value(name)?.as_str()
    }

    pub(crate) fn u32_value(&self, name: &str) -> Option<u32> {
        self.first_value(name)?.as_u32()
    }

    pub(crate) fn u64_value(&self, name: &str) -> Option<u64> {
        self.first_value(name)?.as_u64()
    }

    pub(crate) fn f32_value(&self, name: &str) -> Option<f32> {
        self.first_value(name)?.as_f32()
    }

    pub(crate) fn bool_value(&self, name: &str) -> Option<bool> {
        self.u32_value(name).map(|v| v == 1)
    }

    pub(crate) fn vec3_value(&self, name: &str) -> Option<[f32; 3]> {
        self.first_value(name)?.as_vec3()
    }

    pub(crate) fn vec4_value(&self, name: &str) -> Option<[f32; 4]> {
        self.first_value(name)?.as_vec4()
    }

    pub(crate) fn buffer<T>(
        &self,
        name: &str,
        project: fn(&Value) -> Option<T>,
    ) -> Option<Buffer<'a, T>> {
        Buffer::new(self.property(name)?.values(), project)
    }

    /// Resolve a hash stored in `name` against this node's siblings.
    pub(crate) fn sibling_reference<V: NodeView<'a>>(&self, name: &str) -> Option<V> {
        let hash = self.u64_value(name)?;
        self.parent()?.child_by_hash(hash)?.view()
    }

    /// Resolve a hash stored in `name` against this node's children.
    pub(crate) fn child_reference<V: NodeView<'a>>(&self, name: &str) -> Option<V> {
        let hash = self.u64_value(name)?;
        self.child_by_hash(hash)?.view()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("hash", &format_args!("{:#018x}", self.hash()))
            .field("properties", &self.property_count())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Structural equality: kind, hash, properties in order, and children recursively.
impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        // Matching child counts at every step make the two pre-order walks line
        // up node for node.
        let mut ours = self.descendants();
        let mut theirs = other.descendants();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.shallow_eq(&b) => {}
                _ => return false,
            }
        }
    }
}

/// Pre-order iterator over a subtree, see [`NodeRef::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    cast: &'a Cast,
    pending: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let cast = self.cast;
        let id = self.pending.pop()?;
        self.pending
            .extend(cast.nodes[id.index()].children.iter().rev());
        Some(NodeRef::new(cast, id))
    }
}

/// Mutable access to a node.
pub struct NodeMut<'a> {
    cast: &'a mut Cast,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(cast: &'a mut Cast, id: NodeId) -> Self {
        Self { cast, id }
    }

    #[inline]
    fn node(&mut self) -> &mut Node {
        &mut self.cast.nodes[self.id.index()]
    }

    /// Get the node's handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get a shared view of this node.
    pub fn as_node(&self) -> NodeRef<'_> {
        NodeRef::new(self.cast, self.id)
    }

    /// Override the node's identity hash.
    pub fn set_hash(&mut self, hash: u64) -> &mut Self {
        self.node().hash = hash;
        self
    }

    /// Insert a property, replacing any property of the same name in place.
    ///
    /// Returns the replaced property.
    pub fn set_property(&mut self, property: Property) -> Option<Property> {
        self.node()
            .properties
            .insert(property.name().to_string(), property)
    }

    /// Set a single-valued property typed after `value`.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.set_property(Property::from_value(name, value));
        self
    }

    /// Set a string property.
    pub fn set_str(&mut self, name: &str, value: &str) -> &mut Self {
        self.set_value(name, value)
    }

    /// Set a property from a list of values of type `ty`.
    pub fn set_values<I>(&mut self, name: &str, ty: PropertyType, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let property = Property::with_values(name, ty, values)?;
        self.set_property(property);
        Ok(self)
    }

    /// Get mutable access to a property.
    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.node().properties.get_mut(name)
    }

    /// Remove a property, keeping the order of the rest.
    pub fn remove_property(&mut self, name: &str) -> Option<Property> {
        self.node().properties.shift_remove(name)
    }

    /// Append a new child of the given kind and return its handle.
    pub fn add_child(&mut self, kind: NodeKind) -> NodeId {
        self.cast.add_child(self.id, kind)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("hash", &format!("{:#018x}", self.hash()))?;
        let properties: Vec<_> = self.properties().collect();
        state.serialize_field("properties", &properties)?;
        state.serialize_field("children", &self.children().collect::<Vec<_>>())?;
        state.end()
    }
}
