use super::Material;
use crate::color::unpack_rgba;
use crate::{Buffer, Property, Value};

node_view! {
    /// Geometry: vertex streams, faces and skin weights.
    Mesh => Mesh
}

node_view! {
    /// A morph target relating a base mesh to target vertex positions.
    BlendShape => BlendShape
}

named!(Mesh, BlendShape);

/// How skin weights are blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SkinningMethod {
    #[default]
    Linear,
    Quaternion,
}

impl SkinningMethod {
    /// Parse the stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "quaternion" => Some(Self::Quaternion),
            _ => None,
        }
    }

    /// The stored name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quaternion => "quaternion",
        }
    }
}

fn packed_color(value: &Value) -> Option<[f32; 4]> {
    value.as_u32().map(unpack_rgba)
}

impl<'a> Mesh<'a> {
    /// Number of vertices, taken from the position stream.
    pub fn vertex_count(&self) -> usize {
        self.0.property("vp").map_or(0, Property::len)
    }

    /// Number of triangles.
    pub fn face_count(&self) -> usize {
        self.0.property("f").map_or(0, |faces| faces.len() / 3)
    }

    pub fn uv_layer_count(&self) -> u32 {
        self.0.u32_value("ul").unwrap_or(0)
    }

    /// Number of vertex color layers.
    ///
    /// Files without a layer count but with the single `vc` stream report one layer.
    pub fn color_layer_count(&self) -> u32 {
        self.0
            .u32_value("cl")
            .unwrap_or_else(|| u32::from(self.0.property("vc").is_some()))
    }

    pub fn maximum_weight_influence(&self) -> u32 {
        self.0.u32_value("mi").unwrap_or(0)
    }

    pub fn skinning_method(&self) -> SkinningMethod {
        self.0
            .str_value("sm")
            .and_then(SkinningMethod::from_name)
            .unwrap_or_default()
    }

    /// Triangle vertex indices, three per face.
    pub fn face_buffer(&self) -> Option<Buffer<'a, u32>> {
        self.0.buffer("f", Value::as_u32)
    }

    pub fn vertex_position_buffer(&self) -> Option<Buffer<'a, [f32; 3]>> {
        self.0.buffer("vp", Value::as_vec3)
    }

    pub fn vertex_normal_buffer(&self) -> Option<Buffer<'a, [f32; 3]>> {
        self.0.buffer("vn", Value::as_vec3)
    }

    pub fn vertex_tangent_buffer(&self) -> Option<Buffer<'a, [f32; 3]>> {
        self.0.buffer("vt", Value::as_vec3)
    }

    /// The single packed color stream used by older files.
    pub fn vertex_color_buffer(&self) -> Option<Buffer<'a, u32>> {
        self.0.buffer("vc", Value::as_u32)
    }

    /// Packed colors of layer `index`.
    pub fn vertex_color_layer_buffer(&self, index: u32) -> Option<Buffer<'a, u32>> {
        self.0.buffer(&format!("c{index}"), Value::as_u32)
    }

    /// Normalized colors of layer `index`, falling back to `vc` for layer 0.
    pub fn vertex_colors(&self, index: u32) -> Option<Buffer<'a, [f32; 4]>> {
        self.0
            .buffer(&format!("c{index}"), packed_color)
            .or_else(|| match index {
                0 => self.0.buffer("vc", packed_color),
                _ => None,
            })
    }

    /// Texture coordinates of layer `index`.
    pub fn vertex_uv_layer_buffer(&self, index: u32) -> Option<Buffer<'a, [f32; 2]>> {
        self.0.buffer(&format!("u{index}"), Value::as_vec2)
    }

    /// Bone indices, [`maximum_weight_influence`](Self::maximum_weight_influence) per vertex.
    pub fn vertex_weight_bone_buffer(&self) -> Option<Buffer<'a, u32>> {
        self.0.buffer("wb", Value::as_u32)
    }

    /// Bone weights, parallel to the bone index buffer.
    pub fn vertex_weight_value_buffer(&self) -> Option<Buffer<'a, f32>> {
        self.0.buffer("wv", Value::as_f32)
    }

    /// Resolve the mesh's material among its siblings.
    pub fn material(&self) -> Option<Material<'a>> {
        self.0.sibling_reference("m")
    }
}

impl<'a> BlendShape<'a> {
    /// Resolve the base mesh among the blend shape's siblings.
    pub fn base_shape(&self) -> Option<Mesh<'a>> {
        self.0.sibling_reference("b")
    }

    pub fn target_shape_vertex_indices(&self) -> Option<Buffer<'a, u32>> {
        self.0.buffer("vi", Value::as_u32)
    }

    pub fn target_shape_vertex_positions(&self) -> Option<Buffer<'a, [f32; 3]>> {
        self.0.buffer("vp", Value::as_vec3)
    }

    pub fn target_weight_scale(&self) -> Option<f32> {
        self.0.f32_value("ts")
    }
}
