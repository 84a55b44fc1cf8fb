//! Typed setting values and the conversions between them and the
//! untyped form kept by the store and the persistence backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Untyped setting value as stored and persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(String),
}

/// Discriminant of a [`SettingValue`], fixed per setting at declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Choice,
}

impl SettingValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SettingValue::Bool(_) => ValueKind::Bool,
            SettingValue::Int(_) => ValueKind::Int,
            SettingValue::Float(_) => ValueKind::Float,
            SettingValue::Choice(_) => ValueKind::Choice,
        }
    }

    /// Coerce a restored value into `kind`, accepting compatible numeric forms.
    /// An integer is accepted for a float setting, a whole float for an integer one.
    pub fn coerce(self, kind: ValueKind) -> Option<SettingValue> {
        match (self, kind) {
            (value, kind) if value.kind() == kind => Some(value),
            (SettingValue::Int(i), ValueKind::Float) => Some(SettingValue::Float(i as f64)),
            (SettingValue::Float(f), ValueKind::Int) if f.fract() == 0.0 => {
                Some(SettingValue::Int(f as i64))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Float(x) => write!(f, "{x}"),
            SettingValue::Choice(s) => write!(f, "{s}"),
        }
    }
}

/// Rust types that can back a setting handle
pub trait SettingType: Copy + PartialEq + fmt::Debug + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> SettingValue;

    fn from_value(value: &SettingValue) -> Option<Self>;

    /// Valid names for enumerated settings, empty for everything else
    fn choices() -> &'static [&'static str] {
        &[]
    }
}

impl SettingType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> SettingValue {
        SettingValue::Bool(self)
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl SettingType for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn into_value(self) -> SettingValue {
        SettingValue::Int(self as i64)
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl SettingType for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> SettingValue {
        SettingValue::Float(self as f64)
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Float(f) => Some(*f as f32),
            _ => None,
        }
    }
}

/// How far the camera may be zoomed out while tracked objects stay visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraZoomRange {
    Closest,
    Close,
    Middle,
    Far,
    Furthest,
}

impl CameraZoomRange {
    pub const ALL: [CameraZoomRange; 5] = [
        CameraZoomRange::Closest,
        CameraZoomRange::Close,
        CameraZoomRange::Middle,
        CameraZoomRange::Far,
        CameraZoomRange::Furthest,
    ];

    pub const NAMES: &'static [&'static str] = &["Closest", "Close", "Middle", "Far", "Furthest"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraZoomRange::Closest => "Closest",
            CameraZoomRange::Close => "Close",
            CameraZoomRange::Middle => "Middle",
            CameraZoomRange::Far => "Far",
            CameraZoomRange::Furthest => "Furthest",
        }
    }
}

impl FromStr for CameraZoomRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CameraZoomRange::ALL
            .into_iter()
            .find(|zoom| zoom.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown camera zoom range '{s}'"))
    }
}

impl SettingType for CameraZoomRange {
    const KIND: ValueKind = ValueKind::Choice;

    fn into_value(self) -> SettingValue {
        SettingValue::Choice(self.as_str().to_string())
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Choice(name) => name.parse().ok(),
            _ => None,
        }
    }

    fn choices() -> &'static [&'static str] {
        Self::NAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int_to_float() {
        let coerced = SettingValue::Int(0).coerce(ValueKind::Float);
        assert_eq!(coerced, Some(SettingValue::Float(0.0)));
    }

    #[test]
    fn test_coerce_fractional_float_to_int_fails() {
        assert_eq!(SettingValue::Float(1.5).coerce(ValueKind::Int), None);
        assert_eq!(SettingValue::Float(12.0).coerce(ValueKind::Int), Some(SettingValue::Int(12)));
    }

    #[test]
    fn test_coerce_bool_to_choice_fails() {
        assert_eq!(SettingValue::Bool(true).coerce(ValueKind::Choice), None);
    }

    #[test]
    fn test_i32_out_of_range_rejected() {
        assert_eq!(i32::from_value(&SettingValue::Int(i64::MAX)), None);
        assert_eq!(i32::from_value(&SettingValue::Int(-4)), Some(-4));
    }

    #[test]
    fn test_zoom_range_names_match_variants() {
        for zoom in CameraZoomRange::ALL {
            let value = zoom.into_value();
            assert_eq!(CameraZoomRange::from_value(&value), Some(zoom));
            assert!(CameraZoomRange::choices().contains(&zoom.as_str()));
        }
        assert!("Sideways".parse::<CameraZoomRange>().is_err());
    }

    #[test]
    fn test_untagged_toml_values() {
        let parsed: std::collections::BTreeMap<String, SettingValue> =
            toml::from_str("a = true\nb = 10\nc = 0.5\nd = \"Far\"").unwrap();
        assert_eq!(parsed["a"], SettingValue::Bool(true));
        assert_eq!(parsed["b"], SettingValue::Int(10));
        assert_eq!(parsed["c"], SettingValue::Float(0.5));
        assert_eq!(parsed["d"], SettingValue::Choice("Far".to_string()));
    }
}
