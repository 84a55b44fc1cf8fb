//! Highlight opacity slider

use tracing::warn;

use crate::constants::limits::{OPACITY_MAX, OPACITY_MIN, OPACITY_STEP};
use crate::settings::{SettingType, SettingsStore};

use super::CustomEditor;

/// Horizontal space left free to the right of the slider
const SLIDER_INSET: f32 = 3.0;

/// Slider over a float setting, quantized to a fixed step
#[derive(Debug, Clone)]
pub struct OpacitySlider {
    key: &'static str,
    min: f32,
    max: f32,
    step: f32,
}

impl OpacitySlider {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            min: OPACITY_MIN,
            max: OPACITY_MAX,
            step: OPACITY_STEP,
        }
    }

    fn quantize(&self, value: f32) -> f32 {
        ((value / self.step).round() * self.step).clamp(self.min, self.max)
    }

    /// Value to store after the slider produced `slider`, or None when the
    /// quantized result lands on the same step as `current`. A stored value
    /// off the step grid is snapped onto it once the slider moves.
    pub fn write_back(&self, current: f32, slider: f32) -> Option<f32> {
        let quantized = self.quantize(slider);
        let other_step = (quantized - self.quantize(current)).abs() >= self.step * 0.5;
        let snaps_off_grid = slider != current && (quantized - current).abs() > self.step * 1e-3;
        if other_step || snaps_off_grid {
            Some(quantized)
        } else {
            None
        }
    }
}

impl CustomEditor for OpacitySlider {
    fn show(&self, ui: &mut egui::Ui, region: egui::Rect, store: &mut SettingsStore) -> bool {
        let Some(current) = store.get_by_key::<f32>(self.key) else {
            warn!(key = %self.key, "Opacity slider bound to a missing or non-float setting");
            return false;
        };

        let slider_rect = egui::Rect::from_min_size(
            region.min,
            egui::vec2((region.width() - SLIDER_INSET).max(0.0), region.height()),
        );
        let mut slider_value = current;
        ui.put(
            slider_rect,
            egui::Slider::new(&mut slider_value, self.min..=self.max).step_by(self.step as f64),
        );

        match self.write_back(current, slider_value) {
            Some(new_value) => match store.set_value(self.key, new_value.into_value()) {
                Ok(outcome) => outcome.changed(),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Opacity write-back failed");
                    false
                }
            },
            None => false,
        }
    }
}
