//! GUI-specific constants for layout, preview colors and intervals

use egui;

/// Settings window dimensions
pub const WINDOW_WIDTH: f32 = 560.0;
pub const WINDOW_HEIGHT: f32 = 720.0;
pub const WINDOW_MIN_WIDTH: f32 = 420.0;
pub const WINDOW_MIN_HEIGHT: f32 = 480.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Custom editor region allocated inside a settings row
pub const EDITOR_WIDTH: f32 = 260.0;
pub const EDITOR_HEIGHT: f32 = 20.0;

/// Placeholder tooltip frame
pub const TIP_SIZE: egui::Vec2 = egui::vec2(180.0, 96.0);
pub const TIP_ROUNDING: f32 = 4.0;
pub const TIP_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(20, 20, 20, 220);
pub const TIP_STROKE: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);
pub const HIGHLIGHT_COLOR: (u8, u8, u8) = (255, 255, 255);

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

/// Repaint interval while global hotkeys may arrive without window input
pub const HOTKEY_POLL_INTERVAL_MS: u64 = 50;
