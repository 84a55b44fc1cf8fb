//! Typed, validated, persisted settings
//!
//! - **store**: declaration, restore-with-validation, edits, enumeration
//! - **validators**: pure accept/reject predicates
//! - **value**: untyped values and the typed [`SettingType`] bridge
//! - **persistence**: TOML and in-memory backends

pub mod persistence;
pub mod store;
pub mod validators;
pub mod value;

pub use persistence::{MemoryStore, SettingsPersistence, TomlFileStore};
pub use store::{
    Declaration, EditOutcome, PersistedValues, Setting, SettingHandle, SettingsStore,
};
pub use validators::Validator;
pub use value::{CameraZoomRange, SettingType, SettingValue, ValueKind};
