//! Reader and writer for Cast scene files.
//!
//! A Cast file is a little-endian binary tree of typed nodes carrying models,
//! meshes, skeletons, materials and animations. This crate decodes the tree into
//! an in-memory [`Cast`], offers typed read-only views over the known node kinds,
//! and encodes it back with node sizes recomputed from the current contents.
//!
//! # Layout
//!
//! - [`FileHeader`] - 16 bytes: magic, version, root count, flags
//! - Node records - [`NodeHeader`] (24 bytes), properties, then children
//! - Property records - [`PropertyHeader`] (8 bytes), name, values
//!
//! # Example
//!
//! ```no_run
//! use cast_format::views::Root;
//! use cast_format::Cast;
//!
//! let cast = Cast::open("soldier.cast")?;
//!
//! for root in cast.roots().filter_map(|node| node.view::<Root>()) {
//!     for model in root.models() {
//!         for mesh in model.meshes() {
//!             println!("{:?}: {} vertices", mesh.name(), mesh.vertex_count());
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod buffer;
pub mod color;
mod error;
mod file;
mod hash;
mod header;
mod kind;
mod node;
mod property;
mod value;
pub mod views;

pub use buffer::{Buffer, BufferIter};
pub use error::{Error, Result};
pub use file::Cast;
pub use hash::HashGenerator;
pub use header::{FileHeader, NodeHeader, PropertyHeader};
pub use kind::NodeKind;
pub use node::{Descendants, NodeId, NodeMut, NodeRef};
pub use property::Property;
pub use value::{PropertyType, Value};
pub use views::NodeView;
