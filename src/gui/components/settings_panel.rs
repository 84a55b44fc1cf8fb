use eframe::egui;
use tracing::warn;

use crate::gui::constants::*;
use crate::settings::{SettingValue, SettingsStore};

/// Draw every visible setting in declaration order. Returns true if any stored value changed.
pub fn ui(ui: &mut egui::Ui, store: &mut SettingsStore) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Totals Tooltip").strong());
        ui.add_space(ITEM_SPACING);

        for key in store.visible_keys() {
            changed |= setting_row(ui, store, key);
            ui.add_space(ITEM_SPACING);
        }

        ui.separator();
        if ui.button("Reset to defaults").clicked() {
            changed |= reset_all(store);
        }
    });

    changed
}

fn setting_row(ui: &mut egui::Ui, store: &mut SettingsStore, key: &'static str) -> bool {
    let Some(setting) = store.setting(key) else {
        return false;
    };
    let title = setting.title().to_string();
    let description = setting.description().to_string();
    let value = setting.value().clone();
    let step = setting.step();
    let choices = setting.choices();
    let editor = setting.editor();

    ui.horizontal(|ui| {
        ui.label(format!("{title}:")).on_hover_text(description.as_str());

        if let Some(editor) = editor {
            let (region, _) =
                ui.allocate_exact_size(egui::vec2(EDITOR_WIDTH, EDITOR_HEIGHT), egui::Sense::hover());
            return editor.show(ui, region, store);
        }

        let candidate = match &value {
            SettingValue::Bool(current) => {
                let mut checked = *current;
                ui.checkbox(&mut checked, "").on_hover_text(description.as_str());
                SettingValue::Bool(checked)
            }
            SettingValue::Int(current) => {
                SettingValue::Int(int_spinner(ui, *current, step.unwrap_or(1.0) as i64))
            }
            SettingValue::Float(current) => {
                let mut edited = *current;
                ui.add(egui::DragValue::new(&mut edited).speed(step.unwrap_or(0.01)));
                SettingValue::Float(edited)
            }
            SettingValue::Choice(current) => {
                let mut selected = current.clone();
                egui::ComboBox::from_id_salt(key)
                    .selected_text(selected.clone())
                    .show_ui(ui, |ui| {
                        for choice in choices {
                            ui.selectable_value(&mut selected, choice.to_string(), *choice);
                        }
                    });
                SettingValue::Choice(selected)
            }
        };

        candidate != value && commit(store, key, candidate)
    })
    .inner
}

/// Drag value flanked by step buttons
fn int_spinner(ui: &mut egui::Ui, current: i64, step: i64) -> i64 {
    let mut edited = current;
    if ui.small_button("-").clicked() {
        edited -= step;
    }
    ui.add(egui::DragValue::new(&mut edited).speed(step as f64));
    if ui.small_button("+").clicked() {
        edited += step;
    }
    edited
}

fn commit(store: &mut SettingsStore, key: &str, candidate: SettingValue) -> bool {
    match store.set_value(key, candidate) {
        Ok(outcome) => outcome.changed(),
        Err(e) => {
            warn!(key = %key, error = %e, "Settings panel write failed");
            false
        }
    }
}

fn reset_all(store: &mut SettingsStore) -> bool {
    let keys: Vec<&'static str> = store
        .iter()
        .filter(|setting| !setting.is_transient())
        .map(|setting| setting.key())
        .collect();

    keys.into_iter().fold(false, |changed, key| {
        match store.reset_to_default(key) {
            Ok(outcome) => outcome.changed() || changed,
            Err(e) => {
                warn!(key = %key, error = %e, "Reset failed");
                changed
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::validators::int_range;
    use crate::settings::{Declaration, EditOutcome};

    fn run_panel(store: &mut SettingsStore) -> bool {
        let ctx = egui::Context::default();
        let mut changed = true;
        let _ = ctx.run(Default::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                changed = super::ui(ui, store);
            });
        });
        changed
    }

    #[test]
    fn test_idle_frame_reports_no_change() {
        let mut store = SettingsStore::new();
        store.declare(Declaration::new("flag", "Flag", "", true)).unwrap();
        store
            .declare(Declaration::new("margin", "Margin", "", 10).validator(int_range(0, 50)).step(10.0))
            .unwrap();

        assert!(!run_panel(&mut store));
    }

    #[test]
    fn test_reset_restores_defaults_except_transient() {
        let mut store = SettingsStore::new();
        let flag = store.declare(Declaration::new("flag", "Flag", "", true)).unwrap();
        let hidden = store
            .declare(Declaration::new("hidden", "", "", false).never_visible().transient())
            .unwrap();

        assert_eq!(store.set(&flag, false), EditOutcome::Changed);
        assert_eq!(store.set(&hidden, true), EditOutcome::Changed);

        assert!(reset_all(&mut store));
        assert!(store.get(&flag));
        assert!(store.get(&hidden));
        assert!(!reset_all(&mut store));
    }

    #[test]
    fn test_commit_rejected_value_is_no_change() {
        let mut store = SettingsStore::new();
        let margin = store
            .declare(Declaration::new("margin", "Margin", "", 10).validator(int_range(0, 50)))
            .unwrap();

        assert!(!commit(&mut store, "margin", SettingValue::Int(60)));
        assert!(commit(&mut store, "margin", SettingValue::Int(20)));
        assert!(!commit(&mut store, "unknown", SettingValue::Int(20)));
        assert_eq!(store.get(&margin), 20);
    }
}
