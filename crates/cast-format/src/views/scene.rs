use super::{Animation, BlendShape, Material, Mesh, Skeleton};

node_view! {
    /// Top-level container node.
    Root => Root
}

node_view! {
    /// A model: meshes, materials and an optional skeleton.
    Model => Model
}

named!(Model);

impl<'a> Root<'a> {
    /// Iterate over the models under this root.
    pub fn models(&self) -> impl Iterator<Item = Model<'a>> + 'a {
        self.0.children_of::<Model<'a>>()
    }

    /// Iterate over the animations under this root.
    pub fn animations(&self) -> impl Iterator<Item = Animation<'a>> + 'a {
        self.0.children_of::<Animation<'a>>()
    }
}

impl<'a> Model<'a> {
    /// Get the model's skeleton, if any.
    pub fn skeleton(&self) -> Option<Skeleton<'a>> {
        self.0.child_of()
    }

    /// Iterate over the model's meshes.
    pub fn meshes(&self) -> impl Iterator<Item = Mesh<'a>> + 'a {
        self.0.children_of::<Mesh<'a>>()
    }

    /// Iterate over the model's materials.
    pub fn materials(&self) -> impl Iterator<Item = Material<'a>> + 'a {
        self.0.children_of::<Material<'a>>()
    }

    /// Iterate over the model's blend shapes.
    pub fn blend_shapes(&self) -> impl Iterator<Item = BlendShape<'a>> + 'a {
        self.0.children_of::<BlendShape<'a>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_util::{child, with_root};
    use crate::views::NodeView;
    use crate::NodeKind;

    #[test]
    fn test_model_children_by_kind() {
        let (mut cast, root) = with_root();
        let model = cast.add_child(root, NodeKind::Model);
        cast.node_mut(model).unwrap().set_str("n", "rifle");
        child(&mut cast, model, NodeKind::Mesh).set_str("n", "body");
        child(&mut cast, model, NodeKind::Material).set_str("n", "steel");
        child(&mut cast, model, NodeKind::Mesh).set_str("n", "stock");
        child(&mut cast, model, NodeKind::Skeleton);
        child(&mut cast, root, NodeKind::Animation);

        let root = Root::from_node(cast.roots().next().unwrap()).unwrap();
        assert_eq!(root.animations().count(), 1);

        let model = root.models().next().unwrap();
        assert_eq!(model.name(), Some("rifle"));
        let meshes: Vec<_> = model.meshes().filter_map(|mesh| mesh.name()).collect();
        assert_eq!(meshes, ["body", "stock"]);
        assert_eq!(model.materials().count(), 1);
        assert!(model.skeleton().is_some());
        assert_eq!(model.blend_shapes().count(), 0);
    }

    #[test]
    fn test_view_requires_matching_kind() {
        let (cast, _) = with_root();
        let node = cast.roots().next().unwrap();
        assert!(Model::from_node(node).is_none());
        assert!(node.view::<Root>().is_some());
    }
}
