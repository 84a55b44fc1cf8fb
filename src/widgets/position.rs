//! Tooltip anchor position editor
//!
//! One editor owns both coordinates: it is registered on the x setting, the
//! y setting stays out of the generic settings listing, and the combined
//! change result is returned directly.

use tracing::warn;

use crate::constants::limits::{TIP_POSITION_MAX, TIP_POSITION_MIN};
use crate::settings::{SettingType, SettingValue, SettingsStore};

use super::CustomEditor;

#[derive(Debug, Clone)]
pub struct TipPositionEditor {
    x_key: &'static str,
    y_key: &'static str,
}

impl TipPositionEditor {
    pub fn new(x_key: &'static str, y_key: &'static str) -> Self {
        Self { x_key, y_key }
    }

    fn current(&self, store: &SettingsStore) -> Option<(i32, i32)> {
        Some((
            store.get_by_key::<i32>(self.x_key)?,
            store.get_by_key::<i32>(self.y_key)?,
        ))
    }

    /// Write both coordinates as a pair, true if either one changed.
    /// Nothing is written when either coordinate is rejected.
    pub fn commit(&self, store: &mut SettingsStore, x: i32, y: i32) -> bool {
        let (x_value, y_value) = (x.into_value(), y.into_value());
        if !store.validates(self.x_key, &x_value) || !store.validates(self.y_key, &y_value) {
            warn!(x, y, "Tip position rejected, keeping previous position");
            return false;
        }

        let x_changed = self.commit_one(store, self.x_key, x_value);
        let y_changed = self.commit_one(store, self.y_key, y_value);
        x_changed || y_changed
    }

    fn commit_one(&self, store: &mut SettingsStore, key: &'static str, value: SettingValue) -> bool {
        match store.set_value(key, value) {
            Ok(outcome) => outcome.changed(),
            Err(e) => {
                warn!(key = %key, error = %e, "Tip position write failed");
                false
            }
        }
    }
}

impl CustomEditor for TipPositionEditor {
    fn show(&self, ui: &mut egui::Ui, region: egui::Rect, store: &mut SettingsStore) -> bool {
        let Some((mut x, mut y)) = self.current(store) else {
            warn!(x_key = %self.x_key, y_key = %self.y_key, "Tip position editor bound to missing settings");
            return false;
        };

        ui.scope_builder(egui::UiBuilder::new().max_rect(region), |ui| {
            ui.horizontal(|ui| {
                ui.label("X:");
                ui.add(egui::DragValue::new(&mut x).range(TIP_POSITION_MIN..=TIP_POSITION_MAX).suffix("%"));
                ui.add_space(5.0);
                ui.label("Y:");
                ui.add(egui::DragValue::new(&mut y).range(TIP_POSITION_MIN..=TIP_POSITION_MAX).suffix("%"));
            });
        });

        self.commit(store, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::validators::int_range;
    use crate::settings::{Declaration, SettingHandle};

    fn store_with_position() -> (SettingsStore, SettingHandle<i32>, SettingHandle<i32>) {
        let mut store = SettingsStore::new();
        let x = store
            .declare(
                Declaration::new("tipX", "Position", "", 8)
                    .validator(int_range(0, 100))
                    .editor(TipPositionEditor::new("tipX", "tipY")),
            )
            .unwrap();
        let y = store
            .declare(
                Declaration::new("tipY", "", "", 2)
                    .validator(int_range(0, 100))
                    .visible_when(|_| false),
            )
            .unwrap();
        (store, x, y)
    }

    #[test]
    fn test_commit_reports_single_coordinate_change() {
        let (mut store, x, y) = store_with_position();
        let editor = TipPositionEditor::new("tipX", "tipY");

        assert!(!editor.commit(&mut store, 8, 2));
        assert!(editor.commit(&mut store, 8, 40));
        assert_eq!((store.get(&x), store.get(&y)), (8, 40));
        assert!(editor.commit(&mut store, 12, 40));
        assert_eq!(store.get(&x), 12);
    }

    #[test]
    fn test_commit_rejected_coordinate_is_no_change() {
        let (mut store, x, y) = store_with_position();
        let editor = TipPositionEditor::new("tipX", "tipY");

        assert!(!editor.commit(&mut store, 8, 250));
        assert_eq!((store.get(&x), store.get(&y)), (8, 2));
    }

    #[test]
    fn test_commit_is_all_or_nothing() {
        let (mut store, x, y) = store_with_position();
        let editor = TipPositionEditor::new("tipX", "tipY");

        assert!(!editor.commit(&mut store, 50, 250));
        assert_eq!((store.get(&x), store.get(&y)), (8, 2));

        assert!(!editor.commit(&mut store, -1, 40));
        assert_eq!((store.get(&x), store.get(&y)), (8, 2));

        assert!(editor.commit(&mut store, 50, 40));
        assert_eq!((store.get(&x), store.get(&y)), (50, 40));
    }

    #[test]
    fn test_y_component_never_listed() {
        let (store, _, _) = store_with_position();
        assert_eq!(store.visible_keys(), vec!["tipX"]);
    }

    #[test]
    fn test_show_without_interaction_reports_no_change() {
        let (mut store, x, y) = store_with_position();
        let editor = store.setting("tipX").and_then(|s| s.editor()).unwrap();

        let ctx = egui::Context::default();
        let mut changed = true;
        let _ = ctx.run(Default::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let region = egui::Rect::from_min_size(ui.min_rect().min, egui::vec2(240.0, 20.0));
                changed = editor.show(ui, region, &mut store);
            });
        });

        assert!(!changed);
        assert_eq!((store.get(&x), store.get(&y)), (8, 2));
    }
}
