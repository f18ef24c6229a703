use super::NodeView;

node_view! {
    /// A material. Every property other than `n` and `t` names a texture slot
    /// holding the hash of a child [`FileRef`].
    Material => Material
}

node_view! {
    /// An external file reference, usually a texture.
    FileRef => File
}

named!(Material);

impl<'a> Material<'a> {
    /// Shading model name, e.g. `pbr`.
    pub fn material_type(&self) -> Option<&'a str> {
        self.0.str_value("t")
    }

    /// Iterate over `(slot, file)` pairs in stored order.
    ///
    /// A slot whose hash matches no child file yields `None`.
    pub fn slots(&self) -> impl Iterator<Item = (&'a str, Option<FileRef<'a>>)> + 'a {
        let node = self.0;
        node.properties()
            .filter(|property| !matches!(property.name(), "n" | "t"))
            .map(move |property| {
                let file = property
                    .first()
                    .and_then(|value| value.as_u64())
                    .and_then(|hash| node.child_by_hash(hash))
                    .and_then(FileRef::from_node);
                (property.name(), file)
            })
    }

    /// Resolve a single slot by name, e.g. `albedo`.
    pub fn slot(&self, name: &str) -> Option<FileRef<'a>> {
        match name {
            "n" | "t" => None,
            _ => self.0.child_reference(name),
        }
    }
}

impl<'a> FileRef<'a> {
    pub fn path(&self) -> Option<&'a str> {
        self.0.str_value("p")
    }
}
