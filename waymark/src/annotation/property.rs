//! Style property storage shared by annotations and managers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::style::PropertyMap;

/// Ordered table of style properties known to an annotation type.
///
/// Every known property has a slot that is either set or unset. Unset properties are not serialized and
/// fall back to the layer-wide value (for annotations) or to the engine default (for managers).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTable {
    entries: Vec<(&'static str, Option<Value>)>,
}

impl PropertyTable {
    /// Creates a table with all the given properties unset.
    pub fn new(names: &'static [&'static str]) -> Self {
        Self {
            entries: names.iter().map(|name| (*name, None)).collect(),
        }
    }

    /// Value of the property, if it is set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Sets or unsets (with `None`) the property.
    ///
    /// Returns `false` and leaves the table unchanged if the property is not known to the table.
    pub fn set(&mut self, name: &str, value: Option<Value>) -> bool {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => {
                log::warn!("Unknown style property {name} is ignored");
                false
            }
        }
    }

    /// Returns true if the table has a slot for the property.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    /// Names of all known properties, in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Iterates over the set properties in table order.
    pub fn iter_set(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| Some((*name, value.as_ref()?)))
    }

    /// Returns true if no property is set.
    pub fn is_empty(&self) -> bool {
        self.iter_set().next().is_none()
    }

    /// Set properties as a property dictionary.
    pub fn to_map(&self) -> PropertyMap {
        self.iter_set()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

/// Typed value of a style property.
pub trait StyleValue: Sized {
    /// Converts the value into its style JSON form.
    fn to_value(&self) -> Value;
    /// Parses the value from its style JSON form.
    fn from_value(value: &Value) -> Option<Self>;
}

impl StyleValue for f64 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl StyleValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl StyleValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl StyleValue for [f64; 2] {
    fn to_value(&self) -> Value {
        Value::from(self.to_vec())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.as_array()?.as_slice() {
            [a, b] => Some([a.as_f64()?, b.as_f64()?]),
            _ => None,
        }
    }
}

impl StyleValue for Vec<f64> {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(Value::as_f64).collect()
    }
}

impl StyleValue for Vec<String> {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// Color value of a style property. Serialized as `rgba(r, g, b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StyleColor {
    r: u8,
    g: u8,
    b: u8,
    a: f64,
}

impl StyleColor {
    /// Red color.
    pub const RED: StyleColor = StyleColor::rgb(255, 0, 0);
    /// Green color.
    pub const GREEN: StyleColor = StyleColor::rgb(0, 255, 0);
    /// Blue color.
    pub const BLUE: StyleColor = StyleColor::rgb(0, 0, 255);
    /// White color.
    pub const WHITE: StyleColor = StyleColor::rgb(255, 255, 255);
    /// Black color.
    pub const BLACK: StyleColor = StyleColor::rgb(0, 0, 0);

    /// Opaque color from its RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from its RGB channels and alpha in `0.0..=1.0`.
    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Red, green and blue channels.
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Alpha channel.
    pub fn alpha(&self) -> f64 {
        self.a
    }

    /// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#RRGGBB` or `#RRGGBBAA` strings.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let (args, has_alpha) = if let Some(args) = value.strip_prefix("rgba(") {
            (args, true)
        } else {
            (value.strip_prefix("rgb(")?, false)
        };

        let parts: Vec<&str> = args.strip_suffix(')')?.split(',').map(str::trim).collect();
        match (parts.as_slice(), has_alpha) {
            ([r, g, b, a], true) => Some(Self::rgba(
                r.parse().ok()?,
                g.parse().ok()?,
                b.parse().ok()?,
                a.parse().ok()?,
            )),
            ([r, g, b], false) => Some(Self::rgb(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?)),
            _ => None,
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let a = if hex.len() == 8 {
            channel(6)? as f64 / 255.0
        } else {
            1.0
        };

        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl From<StyleColor> for String {
    fn from(value: StyleColor) -> Self {
        format!("rgba({}, {}, {}, {})", value.r, value.g, value.b, value.a)
    }
}

impl TryFrom<String> for StyleColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl StyleValue for StyleColor {
    fn to_value(&self) -> Value {
        Value::String((*self).into())
    }

    fn from_value(value: &Value) -> Option<Self> {
        Self::parse(value.as_str()?)
    }
}

/// Declares a style enumeration that is stored as its string value.
macro_rules! style_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $value:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// String value used by the style.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl StyleValue for $name {
            fn to_value(&self) -> Value {
                Value::String(self.as_str().to_string())
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value.as_str()? {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

style_enum!(
    /// Orientation of circles when the map is pitched.
    CirclePitchAlignment {
        /// Circles lie on the plane of the map.
        Map => "map",
        /// Circles face the viewport.
        Viewport => "viewport",
    }
);

style_enum!(
    /// Scaling of circles when the map is pitched.
    CirclePitchScale {
        /// Circles are scaled according to their distance to the camera.
        Map => "map",
        /// Circles are not scaled.
        Viewport => "viewport",
    }
);

style_enum!(
    /// Frame of reference of a translation.
    TranslateAnchor {
        /// Translation is relative to the map.
        Map => "map",
        /// Translation is relative to the viewport.
        Viewport => "viewport",
    }
);

style_enum!(
    /// Display of line endings.
    LineCap {
        /// Line ends exactly at the end point.
        Butt => "butt",
        /// Line ends with a semicircle.
        Round => "round",
        /// Line ends with a square.
        Square => "square",
    }
);

style_enum!(
    /// Display of lines when joining.
    LineJoin {
        /// Beveled join.
        Bevel => "bevel",
        /// Rounded join.
        Round => "round",
        /// Sharp join.
        Miter => "miter",
    }
);

style_enum!(
    /// Part of an icon or a label placed closest to the anchor.
    SymbolAnchor {
        /// Center.
        Center => "center",
        /// Left side.
        Left => "left",
        /// Right side.
        Right => "right",
        /// Top side.
        Top => "top",
        /// Bottom side.
        Bottom => "bottom",
        /// Top left corner.
        TopLeft => "top-left",
        /// Top right corner.
        TopRight => "top-right",
        /// Bottom left corner.
        BottomLeft => "bottom-left",
        /// Bottom right corner.
        BottomRight => "bottom-right",
    }
);

style_enum!(
    /// Label placement relative to its geometry.
    SymbolPlacement {
        /// Label is placed at the point.
        Point => "point",
        /// Label is placed along the line.
        Line => "line",
        /// Label is placed at the center of the line.
        LineCenter => "line-center",
    }
);

/// Generates typed getters and setters for properties stored in a [`PropertyTable`] field.
macro_rules! annotation_properties {
    ($target:ident . $field:ident { $($(#[$meta:meta])* $getter:ident, $setter:ident: $ty:ty => $name:literal;)+ }) => {
        impl $target {
            $(
                $(#[$meta])*
                pub fn $getter(&self) -> Option<$ty> {
                    self.$field.get($name).and_then(<$ty as $crate::annotation::StyleValue>::from_value)
                }

                #[doc = concat!("Sets `", $name, "`. `None` falls back to the layer-wide value.")]
                pub fn $setter(&mut self, value: Option<$ty>) {
                    self.$field.set(
                        $name,
                        value.as_ref().map($crate::annotation::StyleValue::to_value),
                    );
                }
            )+
        }
    };
}

/// Generates typed layer-wide property accessors for a manager of the given annotation type.
macro_rules! layer_properties {
    ($annotation:ty { $($(#[$meta:meta])* $getter:ident, $setter:ident: $ty:ty => $name:literal;)+ }) => {
        impl $crate::manager::AnnotationManager<$annotation> {
            $(
                $(#[$meta])*
                pub fn $getter(&self) -> Option<$ty> {
                    self.layer_property($name)
                        .as_ref()
                        .and_then(<$ty as $crate::annotation::StyleValue>::from_value)
                }

                #[doc = concat!("Sets `", $name, "` for the whole layer. `None` resets it to the engine default.")]
                pub fn $setter(&self, value: Option<$ty>) {
                    self.set_layer_property(
                        $name,
                        value.as_ref().map($crate::annotation::StyleValue::to_value),
                    );
                }
            )+
        }
    };
}

pub(crate) use annotation_properties;
pub(crate) use layer_properties;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const NAMES: &[&str] = &["circle-radius", "circle-color", "circle-blur"];

    #[test]
    fn set_and_unset() {
        let mut table = PropertyTable::new(NAMES);
        assert!(table.is_empty());

        assert!(table.set("circle-radius", Some(json!(5.0))));
        assert_eq!(table.get("circle-radius"), Some(&json!(5.0)));
        assert!(!table.is_empty());

        assert!(table.set("circle-radius", None));
        assert_eq!(table.get("circle-radius"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_property_is_rejected() {
        let mut table = PropertyTable::new(NAMES);
        assert!(!table.set("line-width", Some(json!(1.0))));
        assert!(!table.contains("line-width"));
        assert!(table.is_empty());
    }

    #[test]
    fn set_properties_keep_table_order() {
        let mut table = PropertyTable::new(NAMES);
        table.set("circle-blur", Some(json!(0.5)));
        table.set("circle-radius", Some(json!(3.0)));

        let names: Vec<_> = table.iter_set().map(|(name, _)| name).collect();
        assert_eq!(names, ["circle-radius", "circle-blur"]);
        assert_eq!(table.to_map().len(), 2);
    }

    #[test]
    fn color_serialization() {
        let color = StyleColor::rgba(10, 20, 30, 0.5);
        assert_eq!(String::from(color), "rgba(10, 20, 30, 0.5)");
        assert_eq!(StyleColor::from_value(&color.to_value()), Some(color));
        assert_eq!(serde_json::to_value(color).ok(), Some(json!("rgba(10, 20, 30, 0.5)")));
    }

    #[test]
    fn color_parsing() {
        assert_eq!(StyleColor::parse("#FF0000"), Some(StyleColor::RED));
        assert_eq!(StyleColor::parse("rgb(0, 0, 255)"), Some(StyleColor::BLUE));
        assert_eq!(
            StyleColor::parse("#00000000").map(|c| c.alpha()),
            Some(0.0)
        );
        assert_eq!(StyleColor::parse("rgba(1, 2, 3)"), None);
        assert_eq!(StyleColor::parse("red"), None);
    }

    #[test]
    fn enum_values() {
        assert_eq!(CirclePitchAlignment::Viewport.to_value(), json!("viewport"));
        assert_eq!(
            SymbolAnchor::from_value(&json!("bottom-left")),
            Some(SymbolAnchor::BottomLeft)
        );
        assert_eq!(LineCap::from_value(&json!("diagonal")), None);
    }

    #[test]
    fn translate_value() {
        assert_eq!([1.0, -2.0].to_value(), json!([1.0, -2.0]));
        assert_eq!(<[f64; 2]>::from_value(&json!([1.0, 2.0, 3.0])), None);
    }
}
