//! Custom editors drawn in place of the generic settings row

pub mod opacity;
pub mod position;

pub use opacity::OpacitySlider;
pub use position::TipPositionEditor;

use crate::settings::SettingsStore;

/// Draws and edits one logical setting inside `region`.
///
/// Returns true iff a stored value changed during this call, which tells the
/// host to persist and broadcast.
pub trait CustomEditor {
    fn show(&self, ui: &mut egui::Ui, region: egui::Rect, store: &mut SettingsStore) -> bool;
}
