//! Node kind tags.

use std::fmt;

/// The kind of a node, identified on disk by a 32-bit tag.
///
/// Each tag is four ASCII characters read as a little-endian `u32`. Tags outside
/// the known set are preserved as [`NodeKind::Generic`] so that unknown nodes
/// survive a load/save cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Model,
    Mesh,
    BlendShape,
    Skeleton,
    Bone,
    IkHandle,
    Constraint,
    Animation,
    Curve,
    CurveModeOverride,
    NotificationTrack,
    Material,
    File,
    /// A node with a tag this crate has no view for.
    Generic(u32),
}

impl NodeKind {
    pub const ROOT: u32 = 0x746F_6F72;
    pub const MODEL: u32 = 0x6C64_6F6D;
    pub const MESH: u32 = 0x6873_656D;
    pub const BLEND_SHAPE: u32 = 0x6873_6C62;
    pub const SKELETON: u32 = 0x6C65_6B73;
    pub const BONE: u32 = 0x656E_6F62;
    pub const IK_HANDLE: u32 = 0x6468_6B69;
    pub const CONSTRAINT: u32 = 0x7473_6E63;
    pub const ANIMATION: u32 = 0x6D69_6E61;
    pub const CURVE: u32 = 0x7672_7563;
    pub const CURVE_MODE_OVERRIDE: u32 = 0x564F_4D43;
    pub const NOTIFICATION_TRACK: u32 = 0x6669_746E;
    pub const MATERIAL: u32 = 0x6C74_616D;
    pub const FILE: u32 = 0x656C_6966;

    /// Resolve a tag read from disk. Never fails; unknown tags become `Generic`.
    pub const fn from_tag(tag: u32) -> Self {
        match tag {
            Self::ROOT => Self::Root,
            Self::MODEL => Self::Model,
            Self::MESH => Self::Mesh,
            Self::BLEND_SHAPE => Self::BlendShape,
            Self::SKELETON => Self::Skeleton,
            Self::BONE => Self::Bone,
            Self::IK_HANDLE => Self::IkHandle,
            Self::CONSTRAINT => Self::Constraint,
            Self::ANIMATION => Self::Animation,
            Self::CURVE => Self::Curve,
            Self::CURVE_MODE_OVERRIDE => Self::CurveModeOverride,
            Self::NOTIFICATION_TRACK => Self::NotificationTrack,
            Self::MATERIAL => Self::Material,
            Self::FILE => Self::File,
            other => Self::Generic(other),
        }
    }

    /// The tag written to disk for this kind.
    pub const fn tag(self) -> u32 {
        match self {
            Self::Root => Self::ROOT,
            Self::Model => Self::MODEL,
            Self::Mesh => Self::MESH,
            Self::BlendShape => Self::BLEND_SHAPE,
            Self::Skeleton => Self::SKELETON,
            Self::Bone => Self::BONE,
            Self::IkHandle => Self::IK_HANDLE,
            Self::Constraint => Self::CONSTRAINT,
            Self::Animation => Self::ANIMATION,
            Self::Curve => Self::CURVE,
            Self::CurveModeOverride => Self::CURVE_MODE_OVERRIDE,
            Self::NotificationTrack => Self::NOTIFICATION_TRACK,
            Self::Material => Self::MATERIAL,
            Self::File => Self::FILE,
            Self::Generic(tag) => tag,
        }
    }

    /// Get the display name for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Model => "Model",
            Self::Mesh => "Mesh",
            Self::BlendShape => "BlendShape",
            Self::Skeleton => "Skeleton",
            Self::Bone => "Bone",
            Self::IkHandle => "IKHandle",
            Self::Constraint => "Constraint",
            Self::Animation => "Animation",
            Self::Curve => "Curve",
            Self::CurveModeOverride => "CurveModeOverride",
            Self::NotificationTrack => "NotificationTrack",
            Self::Material => "Material",
            Self::File => "File",
            Self::Generic(_) => "Generic",
        }
    }

    /// Check if this kind has a semantic view.
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Generic(_))
    }
}

impl From<u32> for NodeKind {
    fn from(tag: u32) -> Self {
        Self::from_tag(tag)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic(tag) => {
                let bytes = tag.to_le_bytes();
                if bytes.iter().all(|b| b.is_ascii_graphic()) {
                    write!(f, "Generic({})", String::from_utf8_lossy(&bytes))
                } else {
                    write!(f, "Generic({tag:#010x})")
                }
            }
            known => f.write_str(known.as_str()),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_ascii() {
        assert_eq!(&NodeKind::ROOT.to_le_bytes(), b"root");
        assert_eq!(&NodeKind::MODEL.to_le_bytes(), b"modl");
        assert_eq!(&NodeKind::MATERIAL.to_le_bytes(), b"matl");
        assert_eq!(&NodeKind::CURVE_MODE_OVERRIDE.to_le_bytes(), b"CMOV");
    }

    #[test]
    fn test_known_round_trip() {
        for tag in [
            NodeKind::ROOT,
            NodeKind::MODEL,
            NodeKind::MESH,
            NodeKind::BLEND_SHAPE,
            NodeKind::SKELETON,
            NodeKind::BONE,
            NodeKind::IK_HANDLE,
            NodeKind::CONSTRAINT,
            NodeKind::ANIMATION,
            NodeKind::CURVE,
            NodeKind::CURVE_MODE_OVERRIDE,
            NodeKind::NOTIFICATION_TRACK,
            NodeKind::MATERIAL,
            NodeKind::FILE,
        ] {
            let kind = NodeKind::from_tag(tag);
            assert!(kind.is_known());
            assert_eq!(kind.tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_generic() {
        let kind = NodeKind::from_tag(0x1234_5678);
        assert_eq!(kind, NodeKind::Generic(0x1234_5678));
        assert_eq!(kind.tag(), 0x1234_5678);
        assert!(!kind.is_known());
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeKind::Bone.to_string(), "Bone");
        assert_eq!(
            NodeKind::Generic(u32::from_le_bytes(*b"inst")).to_string(),
            "Generic(inst)"
        );
    }
}
