//! In-window stand-in for the totals overlay
//!
//! Paints a placeholder tooltip frame on a foreground layer, placed and tinted
//! from the last resolved settings.

use eframe::egui;
use tracing::{debug, info};

use crate::collaborators::OverlayDrawer;
use crate::controller::ResolvedSettings;
use crate::gui::constants::*;
use crate::toggle::Visibility;

pub struct PreviewOverlay {
    ctx: egui::Context,
    resolved: Option<ResolvedSettings>,
}

impl PreviewOverlay {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            resolved: None,
        }
    }

    fn paint(&self, settings: &ResolvedSettings) {
        let screen = self.ctx.screen_rect();
        let tip = place_tip(screen, settings);
        let painter = self.ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("totals_tip_preview"),
        ));

        painter.rect_filled(tip, TIP_ROUNDING, TIP_FILL);
        painter.rect_stroke(
            tip,
            TIP_ROUNDING,
            egui::Stroke::new(1.0, TIP_STROKE),
            egui::StrokeKind::Inside,
        );

        let font = egui::FontId::proportional(13.0);
        let lines = [
            "Totals".to_string(),
            format!("Zoom: {}", settings.zoom_for_tracking.as_str()),
            format!("In storage: {}", on_off(settings.count_in_storage)),
            format!("Row tips: {}", on_off(settings.show_row_tips)),
        ];
        for (row, line) in lines.iter().enumerate() {
            painter.text(
                tip.min + egui::vec2(8.0, 6.0 + row as f32 * 18.0),
                egui::Align2::LEFT_TOP,
                line,
                font.clone(),
                egui::Color32::WHITE,
            );
        }

        let swatch = egui::Rect::from_min_size(
            tip.right_top() + egui::vec2(-26.0, 8.0),
            egui::vec2(18.0, 18.0),
        );
        painter.rect_filled(swatch, 2.0, highlight_color(settings.highlight_opacity));
    }
}

impl OverlayDrawer for PreviewOverlay {
    fn resolve_settings(&mut self, settings: &ResolvedSettings) {
        info!(
            x = settings.tip_position.x_percent,
            y = settings.tip_position.y_percent,
            clamp = settings.clamp_tip_to_screen,
            opacity = settings.highlight_opacity,
            "Overlay settings resolved"
        );
        self.resolved = Some(settings.clone());
    }

    fn on_frame(&mut self, visibility: Visibility) {
        if !visibility.is_visible() {
            return;
        }
        match &self.resolved {
            Some(settings) => self.paint(settings),
            None => debug!("Overlay frame before settings were resolved"),
        }
    }
}

/// Tooltip rect anchored at the configured screen percentage, optionally kept
/// `clamp_margin` pixels inside the screen
pub fn place_tip(screen: egui::Rect, settings: &ResolvedSettings) -> egui::Rect {
    let anchor = screen.min
        + egui::vec2(
            screen.width() * settings.tip_position.x_percent as f32 / 100.0,
            screen.height() * settings.tip_position.y_percent as f32 / 100.0,
        );

    if !settings.clamp_tip_to_screen {
        return egui::Rect::from_min_size(anchor, TIP_SIZE);
    }

    let bounds = screen.shrink(settings.clamp_margin as f32);
    let max_x = (bounds.max.x - TIP_SIZE.x).max(bounds.min.x);
    let max_y = (bounds.max.y - TIP_SIZE.y).max(bounds.min.y);
    let min = egui::pos2(
        anchor.x.clamp(bounds.min.x, max_x),
        anchor.y.clamp(bounds.min.y, max_y),
    );
    egui::Rect::from_min_size(min, TIP_SIZE)
}

fn highlight_color(opacity: f32) -> egui::Color32 {
    let (r, g, b) = HIGHLIGHT_COLOR;
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::TipPosition;
    use crate::settings::CameraZoomRange;

    fn settings(x: i32, y: i32, clamp: bool, margin: i32) -> ResolvedSettings {
        ResolvedSettings {
            tracking_visible: true,
            tracking_forbidden: false,
            zoom_for_tracking: CameraZoomRange::Middle,
            visibility_margin: 100,
            clamp_tip_to_screen: clamp,
            clamp_margin: margin,
            highlight_opacity: 0.1,
            show_row_tips: true,
            count_in_storage: false,
            count_forbidden: false,
            tip_position: TipPosition {
                x_percent: x,
                y_percent: y,
            },
        }
    }

    fn screen() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1000.0, 500.0))
    }

    #[test]
    fn test_anchor_from_percentages() {
        let tip = place_tip(screen(), &settings(8, 2, true, 10));
        assert_eq!(tip.min, egui::pos2(80.0, 10.0));
        assert_eq!(tip.size(), TIP_SIZE);
    }

    #[test]
    fn test_clamped_inside_margin() {
        let tip = place_tip(screen(), &settings(100, 100, true, 10));
        assert_eq!(tip.max, egui::pos2(990.0, 490.0));

        let tip = place_tip(screen(), &settings(0, 0, true, 30));
        assert_eq!(tip.min, egui::pos2(30.0, 30.0));
    }

    #[test]
    fn test_unclamped_may_leave_screen() {
        let tip = place_tip(screen(), &settings(100, 100, false, 10));
        assert_eq!(tip.min, egui::pos2(1000.0, 500.0));
    }

    #[test]
    fn test_margin_wider_than_screen_half() {
        // vertical bounds collapse to the top margin
        let tip = place_tip(screen(), &settings(50, 50, true, 400));
        assert_eq!(tip.min, egui::pos2(420.0, 400.0));
    }

    #[test]
    fn test_highlight_alpha_follows_opacity() {
        assert_eq!(highlight_color(0.0).a(), 0);
        assert_eq!(highlight_color(0.25).a(), 64);
    }

    fn painted_shapes(overlay: &mut PreviewOverlay, ctx: &egui::Context, visibility: Visibility) -> usize {
        ctx.run(Default::default(), |_| overlay.on_frame(visibility))
            .shapes
            .len()
    }

    #[test]
    fn test_paints_only_when_visible_and_resolved() {
        let ctx = egui::Context::default();
        let mut overlay = PreviewOverlay::new(ctx.clone());

        assert_eq!(painted_shapes(&mut overlay, &ctx, Visibility::Visible), 0);

        overlay.resolve_settings(&settings(8, 2, true, 10));
        assert_eq!(painted_shapes(&mut overlay, &ctx, Visibility::Hidden), 0);
        assert!(painted_shapes(&mut overlay, &ctx, Visibility::Visible) > 0);
    }
}
