node_view! {
    /// Bone hierarchy of a model, with IK handles and constraints.
    Skeleton => Skeleton
}

node_view! {
    /// A single joint. The hierarchy is encoded by index, not by nesting.
    Bone => Bone
}

node_view! {
    /// An inverse kinematics chain between two bones.
    IkHandle => IkHandle
}

node_view! {
    /// A constraint driving one bone from another.
    Constraint => Constraint
}

named!(Bone, IkHandle, Constraint);

/// Which channel a [`Constraint`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    Point,
    Orient,
    Scale,
}

impl ConstraintType {
    /// Parse the stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pt" => Some(Self::Point),
            "or" => Some(Self::Orient),
            "sc" => Some(Self::Scale),
            _ => None,
        }
    }

    /// The stored name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "pt",
            Self::Orient => "or",
            Self::Scale => "sc",
        }
    }
}

impl<'a> Skeleton<'a> {
    pub fn bones(&self) -> impl Iterator<Item = Bone<'a>> + 'a {
        self.0.children_of::<Bone<'a>>()
    }

    pub fn ik_handles(&self) -> impl Iterator<Item = IkHandle<'a>> + 'a {
        self.0.children_of::<IkHandle<'a>>()
    }

    pub fn constraints(&self) -> impl Iterator<Item = Constraint<'a>> + 'a {
        self.0.children_of::<Constraint<'a>>()
    }
}

impl<'a> Bone<'a> {
    /// Index of the parent bone within the skeleton, or -1 for a root bone.
    ///
    /// The value is stored unsigned; it is reinterpreted as a signed 32-bit integer.
    pub fn parent_index(&self) -> i32 {
        self.0.u32_value("p").map_or(-1, |index| index as i32)
    }

    pub fn segment_scale_compensate(&self) -> bool {
        self.0.bool_value("ssc").unwrap_or(true)
    }

    pub fn local_position(&self) -> Option<[f32; 3]> {
        self.0.vec3_value("lp")
    }

    /// Local rotation quaternion `[x, y, z, w]`.
    pub fn local_rotation(&self) -> Option<[f32; 4]> {
        self.0.vec4_value("lr")
    }

    pub fn world_position(&self) -> Option<[f32; 3]> {
        self.0.vec3_value("wp")
    }

    /// World rotation quaternion `[x, y, z, w]`.
    pub fn world_rotation(&self) -> Option<[f32; 4]> {
        self.0.vec4_value("wr")
    }

    pub fn scale(&self) -> Option<[f32; 3]> {
        self.0.vec3_value("s")
    }
}

impl<'a> IkHandle<'a> {
    pub fn start_bone(&self) -> Option<Bone<'a>> {
        self.0.sibling_reference("sb")
    }

    pub fn end_bone(&self) -> Option<Bone<'a>> {
        self.0.sibling_reference("eb")
    }

    pub fn target_bone(&self) -> Option<Bone<'a>> {
        self.0.sibling_reference("tb")
    }

    pub fn pole_vector_bone(&self) -> Option<Bone<'a>> {
        self.0.sibling_reference("pv")
    }

    pub fn pole_bone(&self) -> Option<Bone<'a>> {
        self.0.sibling_reference("pb")
    }

    pub fn use_target_rotation(&self) -> bool {
        self.0.bool_value("tr").unwrap_or(false)
    }
}

impl<'a> Constraint<'a> {
    pub fn constraint_type(&self) -> Option<ConstraintType> {
        self.0.str_value("ct").and_then(ConstraintType::from_name)
    }

    /// The bone being driven.
    pub fn constraint_bone(&self) -> Option<Bone<'a>> {
        self.0.sibling_reference("cb")
    }

    /// The bone driving the constraint.
    pub fn target_bone(&self) -> Option<Bone<'a>> {
        self.0.sibling_reference("tb")
    }

    pub fn maintain_offset(&self) -> bool {
        self.0.bool_value("mo").unwrap_or(false)
    }

    pub fn skip_x(&self) -> bool {
        self.0.bool_value("sx").unwrap_or(false)
    }

    pub fn skip_y(&self) -> bool {
        self.0.bool_value("sy").unwrap_or(false)
    }

    pub fn skip_z(&self) -> bool {
        self.0.bool_value("sz").unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_util::{child, with_root};
    use crate::{Cast, NodeId, NodeKind, PropertyType};

    fn skeleton() -> (Cast, NodeId) {
        let (mut cast, root) = with_root();
        let model = cast.add_child(root, NodeKind::Model);
        let skeleton = cast.add_child(model, NodeKind::Skeleton);
        (cast, skeleton)
    }

    #[test]
    fn test_bone_defaults() {
        let (mut cast, skeleton) = skeleton();
        let bone = cast.add_child(skeleton, NodeKind::Bone);
        let bone: Bone = cast.node(bone).unwrap().view().unwrap();

        assert_eq!(bone.name(), None);
        assert_eq!(bone.parent_index(), -1);
        assert!(bone.segment_scale_compensate());
        assert!(bone.local_position().is_none());
        assert!(bone.world_rotation().is_none());
    }

    #[test]
    fn test_bone_parent_index_is_signed() {
        let (mut cast, skeleton) = skeleton();
        child(&mut cast, skeleton, NodeKind::Bone).set_value("p", 0xFFFF_FFFFu32);
        child(&mut cast, skeleton, NodeKind::Bone).set_value("p", 0u32).set_value("ssc", 0u8);
        child(&mut cast, skeleton, NodeKind::Bone).set_value("p", 1u16);

        let skeleton: Skeleton = cast.node(skeleton).unwrap().view().unwrap();
        let parents: Vec<_> = skeleton.bones().map(|bone| bone.parent_index()).collect();
        assert_eq!(parents, [-1, 0, 1]);

        let flags: Vec<_> = skeleton
            .bones()
            .map(|bone| bone.segment_scale_compensate())
            .collect();
        assert_eq!(flags, [true, false, true]);
    }

    #[test]
    fn test_bone_transforms() {
        let (mut cast, skeleton) = skeleton();
        child(&mut cast, skeleton, NodeKind::Bone)
            .set_str("n", "tag_origin")
            .set_value("lp", [1.0f32, 2.0, 3.0])
            .set_value("lr", [0.0f32, 0.0, 0.0, 1.0])
            .set_value("s", [1.0f32; 3]);

        let skeleton: Skeleton = cast.node(skeleton).unwrap().view().unwrap();
        let bone = skeleton.bones().next().unwrap();
        assert_eq!(bone.name(), Some("tag_origin"));
        assert_eq!(bone.local_position(), Some([1.0, 2.0, 3.0]));
        assert_eq!(bone.local_rotation(), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(bone.scale(), Some([1.0; 3]));
    }

    #[test]
    fn test_ik_handle_resolves_bones() {
        let (mut cast, skeleton) = skeleton();
        let start = cast.add_child(skeleton, NodeKind::Bone);
        let end = cast.add_child(skeleton, NodeKind::Bone);
        let start_hash = cast.node(start).unwrap().hash();
        let end_hash = cast.node(end).unwrap().hash();
        child(&mut cast, skeleton, NodeKind::IkHandle)
            .set_value("sb", start_hash)
            .set_value("eb", end_hash)
            .set_value("tb", 0x1234u64)
            .set_value("tr", 1u8);

        let skeleton: Skeleton = cast.node(skeleton).unwrap().view().unwrap();
        let handle = skeleton.ik_handles().next().unwrap();
        assert_eq!(handle.start_bone().map(|b| b.id()), Some(start));
        assert_eq!(handle.end_bone().map(|b| b.id()), Some(end));
        assert!(handle.target_bone().is_none());
        assert!(handle.pole_bone().is_none());
        assert!(handle.use_target_rotation());
    }

    #[test]
    fn test_constraint() {
        let (mut cast, skeleton) = skeleton();
        let driven = cast.add_child(skeleton, NodeKind::Bone);
        let driven_hash = cast.node(driven).unwrap().hash();
        child(&mut cast, skeleton, NodeKind::Constraint)
            .set_str("ct", "or")
            .set_value("cb", driven_hash)
            .set_value("mo", 1u8)
            .set_value("sy", 1u8)
            .set_values("sz", PropertyType::Byte, [0u8])
            .unwrap();

        let skeleton: Skeleton = cast.node(skeleton).unwrap().view().unwrap();
        let constraint = skeleton.constraints().next().unwrap();
        assert_eq!(constraint.constraint_type(), Some(ConstraintType::Orient));
        assert_eq!(constraint.constraint_bone().map(|b| b.id()), Some(driven));
        assert!(constraint.target_bone().is_none());
        assert!(constraint.maintain_offset());
        assert!(!constraint.skip_x());
        assert!(constraint.skip_y());
        assert!(!constraint.skip_z());
    }
}
