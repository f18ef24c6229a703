use crate::{Buffer, Value};

node_view! {
    /// A clip: keyframed curves plus mode overrides and notifications.
    Animation => Animation
}

node_view! {
    /// Keyframes for one property of one node.
    Curve => Curve
}

node_view! {
    /// Overrides the blend mode of every curve under a node.
    CurveModeOverride => CurveModeOverride
}

node_view! {
    /// Named events at specific frames.
    NotificationTrack => NotificationTrack
}

named!(Animation, NotificationTrack);

/// How a curve's values combine with the rest pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveMode {
    Additive,
    Absolute,
    Relative,
}

impl CurveMode {
    /// Parse the stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "additive" => Some(Self::Additive),
            "absolute" => Some(Self::Absolute),
            "relative" => Some(Self::Relative),
            _ => None,
        }
    }

    /// The stored name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Absolute => "absolute",
            Self::Relative => "relative",
        }
    }
}

impl<'a> Animation<'a> {
    /// Playback rate in frames per second.
    pub fn framerate(&self) -> f32 {
        self.0.f32_value("fr").unwrap_or(30.0)
    }

    pub fn looping(&self) -> bool {
        self.0.bool_value("lo").unwrap_or(false)
    }

    pub fn curves(&self) -> impl Iterator<Item = Curve<'a>> + 'a {
        self.0.children_of::<Curve<'a>>()
    }

    pub fn curve_mode_overrides(&self) -> impl Iterator<Item = CurveModeOverride<'a>> + 'a {
        self.0.children_of::<CurveModeOverride<'a>>()
    }

    pub fn notifications(&self) -> impl Iterator<Item = NotificationTrack<'a>> + 'a {
        self.0.children_of::<NotificationTrack<'a>>()
    }
}

impl<'a> Curve<'a> {
    /// Name of the animated node.
    pub fn node_name(&self) -> Option<&'a str> {
        self.0.str_value("nn")
    }

    /// Name of the animated property, e.g. `rq` or `tx`.
    pub fn key_property_name(&self) -> Option<&'a str> {
        self.0.str_value("kp")
    }

    /// Frame numbers of the keys.
    pub fn key_frame_buffer(&self) -> Option<Buffer<'a, u32>> {
        self.0.buffer("kb", Value::as_u32)
    }

    /// Raw key values; their type depends on the animated property.
    pub fn key_value_buffer(&self) -> Option<&'a [Value]> {
        self.0.property("kv").map(|property| property.values())
    }

    pub fn float_key_values(&self) -> Option<Buffer<'a, f32>> {
        self.0.buffer("kv", Value::as_f32)
    }

    /// Rotation keys as `[x, y, z, w]` quaternions.
    pub fn quaternion_key_values(&self) -> Option<Buffer<'a, [f32; 4]>> {
        self.0.buffer("kv", Value::as_vec4)
    }

    /// Integer keys, e.g. visibility.
    pub fn integer_key_values(&self) -> Option<Buffer<'a, u32>> {
        self.0.buffer("kv", Value::as_u32)
    }

    pub fn mode(&self) -> Option<CurveMode> {
        self.0.str_value("m").and_then(CurveMode::from_name)
    }

    pub fn additive_blend_weight(&self) -> f32 {
        self.0.f32_value("ab").unwrap_or(1.0)
    }
}

impl<'a> CurveModeOverride<'a> {
    pub fn node_name(&self) -> Option<&'a str> {
        self.0.str_value("nn")
    }

    pub fn mode(&self) -> Option<CurveMode> {
        self.0.str_value("m").and_then(CurveMode::from_name)
    }

    pub fn override_translation_curves(&self) -> bool {
        self.0.bool_value("ot").unwrap_or(false)
    }

    pub fn override_rotation_curves(&self) -> bool {
        self.0.bool_value("or").unwrap_or(false)
    }

    pub fn override_scale_curves(&self) -> bool {
        self.0.bool_value("os").unwrap_or(false)
    }
}

impl<'a> NotificationTrack<'a> {
    pub fn key_frame_buffer(&self) -> Option<Buffer<'a, u32>> {
        self.0.buffer("kb", Value::as_u32)
    }
}
