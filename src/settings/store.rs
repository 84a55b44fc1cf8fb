//! Setting descriptor store
//!
//! Owns every declared setting: its current value, default, validator,
//! visibility rules and optional custom editor. Values restored from
//! persistence are validated at declaration time and replaced by the
//! default when they no longer pass.

use anyhow::{bail, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::validators::{one_of, Validator};
use super::value::{SettingType, SettingValue, ValueKind};
use crate::widgets::CustomEditor;

/// Key → value map exchanged with the persistence backend
pub type PersistedValues = BTreeMap<String, SettingValue>;

/// Decides whether a setting is currently listed by the settings UI
pub type VisibilityPredicate = Arc<dyn Fn(&SettingsStore) -> bool + Send + Sync>;

/// Result of an attempted edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Changed,
    Unchanged,
    /// Candidate failed validation, stored value kept
    Rejected,
}

impl EditOutcome {
    pub fn changed(self) -> bool {
        self == EditOutcome::Changed
    }
}

/// Typed handle to a declared setting
#[derive(Debug)]
pub struct SettingHandle<T> {
    key: &'static str,
    default: T,
}

impl<T: Copy> Clone for SettingHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy> Copy for SettingHandle<T> {}

impl<T> SettingHandle<T> {
    pub fn key(&self) -> &'static str {
        self.key
    }
}

/// Everything needed to declare one setting
pub struct Declaration<T> {
    key: &'static str,
    title: String,
    description: String,
    default: T,
    validator: Option<Validator>,
    editor: Option<Arc<dyn CustomEditor>>,
    visible_when: Option<VisibilityPredicate>,
    step: Option<f64>,
    hidden: bool,
    transient: bool,
}

impl<T: SettingType> Declaration<T> {
    pub fn new(
        key: &'static str,
        title: impl Into<String>,
        description: impl Into<String>,
        default: T,
    ) -> Self {
        Self {
            key,
            title: title.into(),
            description: description.into(),
            default,
            validator: None,
            editor: None,
            visible_when: None,
            step: None,
            hidden: false,
            transient: false,
        }
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn editor(mut self, editor: impl CustomEditor + 'static) -> Self {
        self.editor = Some(Arc::new(editor));
        self
    }

    pub fn visible_when(
        mut self,
        predicate: impl Fn(&SettingsStore) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.visible_when = Some(Arc::new(predicate));
        self
    }

    /// Spinner increment, numeric settings only
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Never listed by any settings UI
    pub fn never_visible(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Neither restored from nor written to persistence
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// A declared setting
pub struct Setting {
    key: &'static str,
    title: String,
    description: String,
    value: SettingValue,
    default: SettingValue,
    validator: Option<Validator>,
    editor: Option<Arc<dyn CustomEditor>>,
    visible_when: Option<VisibilityPredicate>,
    step: Option<f64>,
    choices: &'static [&'static str],
    /// Whether a value converts back into the handle's Rust type
    representable: fn(&SettingValue) -> bool,
    hidden: bool,
    transient: bool,
}

fn representable<T: SettingType>(value: &SettingValue) -> bool {
    T::from_value(value).is_some()
}

impl Setting {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    pub fn default_value(&self) -> &SettingValue {
        &self.default
    }

    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }

    pub fn choices(&self) -> &'static [&'static str] {
        self.choices
    }

    pub fn editor(&self) -> Option<Arc<dyn CustomEditor>> {
        self.editor.clone()
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    /// Checks kind, range of the Rust type, choice membership and the validator
    fn accepts(&self, candidate: &SettingValue) -> bool {
        if candidate.kind() != self.kind() || !(self.representable)(candidate) {
            return false;
        }
        if !self.choices.is_empty() && !one_of(self.choices).accepts(candidate) {
            return false;
        }
        self.validator.as_ref().is_none_or(|v| v.accepts(candidate))
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("default", &self.default)
            .field("validator", &self.validator)
            .field("custom_editor", &self.editor.is_some())
            .field("hidden", &self.hidden)
            .field("transient", &self.transient)
            .finish()
    }
}

/// Ordered collection of declared settings
#[derive(Default)]
pub struct SettingsStore {
    settings: Vec<Setting>,
    index: HashMap<&'static str, usize>,
    persisted: PersistedValues,
}

impl SettingsStore {
    /// Store for a fresh environment with nothing persisted
    pub fn new() -> Self {
        Self::default()
    }

    /// Store restoring from values loaded by the persistence backend
    pub fn with_persisted(persisted: PersistedValues) -> Self {
        Self {
            persisted,
            ..Self::default()
        }
    }

    /// Register a setting and restore its value.
    ///
    /// Fails when the key is already declared or when the default itself
    /// does not pass the validator; both are programming errors.
    pub fn declare<T: SettingType>(&mut self, decl: Declaration<T>) -> Result<SettingHandle<T>> {
        if self.index.contains_key(decl.key) {
            bail!("setting '{}' declared twice", decl.key);
        }

        let mut setting = Setting {
            key: decl.key,
            title: decl.title,
            description: decl.description,
            value: decl.default.into_value(),
            default: decl.default.into_value(),
            validator: decl.validator,
            editor: decl.editor,
            visible_when: decl.visible_when,
            step: decl.step,
            choices: T::choices(),
            representable: representable::<T>,
            hidden: decl.hidden,
            transient: decl.transient,
        };

        if !setting.accepts(&setting.default) {
            bail!(
                "default {} of setting '{}' fails its own validation",
                setting.default,
                setting.key
            );
        }

        if !setting.transient {
            if let Some(restored) = self.restore(&setting) {
                setting.value = restored;
            }
        }

        debug!(key = %setting.key, value = %setting.value, "Declared setting");
        self.index.insert(setting.key, self.settings.len());
        self.settings.push(setting);

        Ok(SettingHandle {
            key: decl.key,
            default: decl.default,
        })
    }

    /// Persisted value for `setting` if it can still be used
    fn restore(&self, setting: &Setting) -> Option<SettingValue> {
        let raw = self.persisted.get(setting.key)?.clone();
        let candidate = raw.clone().coerce(setting.kind()).filter(|v| setting.accepts(v));
        if candidate.is_none() {
            warn!(key = %setting.key, persisted = %raw, default = %setting.default, "Persisted value invalid, using default");
        }
        candidate
    }

    pub fn get<T: SettingType>(&self, handle: &SettingHandle<T>) -> T {
        self.setting(handle.key)
            .and_then(|s| T::from_value(&s.value))
            .unwrap_or(handle.default)
    }

    /// Typed read by key, for editors that are registered before their handle exists
    pub fn get_by_key<T: SettingType>(&self, key: &str) -> Option<T> {
        self.setting(key).and_then(|s| T::from_value(&s.value))
    }

    pub fn set<T: SettingType>(&mut self, handle: &SettingHandle<T>, value: T) -> EditOutcome {
        match self.set_value(handle.key, value.into_value()) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(key = %handle.key, error = %e, "Handle does not belong to this store");
                EditOutcome::Rejected
            }
        }
    }

    /// Validated write of an untyped value
    pub fn set_value(&mut self, key: &str, candidate: SettingValue) -> Result<EditOutcome> {
        let Some(&idx) = self.index.get(key) else {
            bail!("unknown setting '{key}'");
        };
        let setting = &mut self.settings[idx];

        if !setting.accepts(&candidate) {
            let rule = setting
                .validator
                .as_ref()
                .map(|v| v.description().to_string())
                .unwrap_or_else(|| format!("{:?} value", setting.kind()));
            warn!(key = %key, rejected = %candidate, rule = %rule, "Rejected setting edit");
            return Ok(EditOutcome::Rejected);
        }
        if setting.value == candidate {
            return Ok(EditOutcome::Unchanged);
        }

        info!(key = %key, old = %setting.value, new = %candidate, "Setting changed");
        setting.value = candidate;
        Ok(EditOutcome::Changed)
    }

    pub fn reset_to_default(&mut self, key: &str) -> Result<EditOutcome> {
        let default = match self.setting(key) {
            Some(setting) => setting.default.clone(),
            None => bail!("unknown setting '{key}'"),
        };
        self.set_value(key, default)
    }

    /// Whether `candidate` would be accepted by `key`, without writing it
    pub fn validates(&self, key: &str, candidate: &SettingValue) -> bool {
        self.setting(key).is_some_and(|s| s.accepts(candidate))
    }

    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.index.get(key).map(|&idx| &self.settings[idx])
    }

    /// Whether the settings UI should list `key` right now
    pub fn is_visible(&self, key: &str) -> bool {
        self.setting(key).is_some_and(|s| {
            !s.hidden && s.visible_when.as_ref().is_none_or(|predicate| predicate(self))
        })
    }

    /// Keys listed by the settings UI, in declaration order
    pub fn visible_keys(&self) -> Vec<&'static str> {
        self.settings
            .iter()
            .map(|s| s.key)
            .filter(|key| self.is_visible(key))
            .collect()
    }

    /// Values to hand to the persistence backend. Persisted entries no
    /// declared setting claims are carried over untouched.
    pub fn persisted_snapshot(&self) -> PersistedValues {
        let mut snapshot: PersistedValues = self
            .persisted
            .iter()
            .filter(|(key, _)| !self.index.contains_key(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        snapshot.extend(
            self.settings
                .iter()
                .filter(|s| !s.transient)
                .map(|s| (s.key.to_string(), s.value.clone())),
        );
        snapshot
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}
