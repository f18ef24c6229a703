//! Cast - scene interchange file library.
//!
//! This crate provides a unified interface to the Cast crates.
//!
//! # Crates
//!
//! - [`cast_common`] - Little-endian stream primitives
//! - [`cast_format`] - Cast file reading, writing and typed node views
//!
//! # Example
//!
//! ```no_run
//! use cast::prelude::*;
//!
//! let cast = Cast::open("soldier.cast")?;
//! for root in cast.roots().filter_map(|node| node.view::<Root>()) {
//!     for model in root.models() {
//!         if let Some(skeleton) = model.skeleton() {
//!             println!("{:?}: {} bones", model.name(), skeleton.bones().count());
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use cast_common as common;
pub use cast_format as format;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use cast_format::views::{
        Animation, BlendShape, Bone, Constraint, Curve, CurveModeOverride, FileRef, IkHandle,
        Material, Mesh, Model, NotificationTrack, Root, Skeleton,
    };
    pub use cast_format::{
        Buffer, Cast, HashGenerator, NodeId, NodeKind, NodeRef, NodeView, Property,
        PropertyType, Value,
    };
}

pub use cast_format::{Cast, Error, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
