//! Pure predicates accepting or rejecting a candidate setting value

use std::fmt;
use std::sync::Arc;

use super::value::SettingValue;

/// A stateless predicate over candidate values plus a description for logs
#[derive(Clone)]
pub struct Validator {
    description: String,
    check: Arc<dyn Fn(&SettingValue) -> bool + Send + Sync>,
}

impl Validator {
    pub fn new(
        description: impl Into<String>,
        check: impl Fn(&SettingValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    pub fn accepts(&self, candidate: &SettingValue) -> bool {
        (self.check)(candidate)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("description", &self.description)
            .finish()
    }
}

/// Accepts integers within `min..=max`
pub fn int_range(min: i32, max: i32) -> Validator {
    Validator::new(format!("integer in [{min}, {max}]"), move |candidate| {
        matches!(candidate, SettingValue::Int(i) if (min as i64..=max as i64).contains(i))
    })
}

/// Accepts finite floats within `min..=max`
pub fn float_range(min: f32, max: f32) -> Validator {
    Validator::new(format!("float in [{min}, {max}]"), move |candidate| {
        matches!(candidate, SettingValue::Float(f) if f.is_finite() && *f >= min as f64 && *f <= max as f64)
    })
}

/// Accepts choice values whose name is one of `names`
pub fn one_of(names: &'static [&'static str]) -> Validator {
    Validator::new(format!("one of {names:?}"), move |candidate| {
        matches!(candidate, SettingValue::Choice(name) if names.contains(&name.as_str()))
    })
}
