//! Typed views over known node kinds.
//!
//! A view wraps a [`NodeRef`] of the matching kind and adds accessors for the
//! properties and children that kind defines. Views hold no data of their own;
//! they dereference to the underlying [`NodeRef`] for the generic API.

use crate::{NodeKind, NodeRef};

/// A typed view of one node kind.
pub trait NodeView<'a>: Copy + 'a {
    /// The kind this view accepts.
    const KIND: NodeKind;

    /// Wrap `node` without checking its kind.
    #[doc(hidden)]
    fn wrap(node: NodeRef<'a>) -> Self;

    /// The underlying node.
    fn node(&self) -> NodeRef<'a>;

    /// View `node` as `Self` if its kind matches.
    fn from_node(node: NodeRef<'a>) -> Option<Self> {
        (node.kind() == Self::KIND).then(|| Self::wrap(node))
    }
}

macro_rules! node_view {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<'a>(crate::NodeRef<'a>);

        impl<'a> crate::views::NodeView<'a> for $name<'a> {
            const KIND: crate::NodeKind = crate::NodeKind::$kind;

            fn wrap(node: crate::NodeRef<'a>) -> Self {
                Self(node)
            }

            fn node(&self) -> crate::NodeRef<'a> {
                self.0
            }
        }

        impl<'a> std::ops::Deref for $name<'a> {
            type Target = crate::NodeRef<'a>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

/// Adds `name()` reading the `n` property.
macro_rules! named {
    ($($name:ident),+ $(,)?) => {
        $(
            impl<'a> $name<'a> {
                /// Get the node name.
                pub fn name(&self) -> Option<&'a str> {
                    self.0.str_value("n")
                }
            }
        )+
    };
}

mod animation;
mod material;
mod mesh;
mod scene;
mod skeleton;

pub use animation::{Animation, Curve, CurveMode, CurveModeOverride, NotificationTrack};
pub use material::{FileRef, Material};
pub use mesh::{BlendShape, Mesh, SkinningMethod};
pub use scene::{Model, Root};
pub use skeleton::{Bone, Constraint, ConstraintType, IkHandle, Skeleton};

#[cfg(test)]
pub(crate) mod test_util {
    use crate::{Cast, NodeId, NodeKind, NodeMut};

    /// Build a file with one root and return it with the root id.
    pub fn with_root() -> (Cast, NodeId) {
        let mut cast = Cast::new();
        let root = cast.create_root();
        (cast, root)
    }

    /// Add a child and hand back mutable access to it.
    pub fn child(cast: &mut Cast, parent: NodeId, kind: NodeKind) -> NodeMut<'_> {
        let id = cast.add_child(parent, kind);
        cast.node_mut(id).unwrap()
    }
}
