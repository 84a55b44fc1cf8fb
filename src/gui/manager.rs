//! Settings window implemented with egui/eframe
//!
//! Hosts the [`TipController`]: forwards frames and the toggle hotkey, draws
//! the settings panel, and persists the store after every edit.

use std::time::Duration;

use anyhow::{anyhow, Result};
use eframe::{egui, CreationContext, NativeOptions};
use tracing::{error, info};

use crate::collaborators::{Collaborators, HotkeyInput, SelectionTransfer};
use crate::controller::{ScreenMetrics, TipController};
use crate::hotkeys::ChannelHotkey;
use crate::settings::{PersistedValues, SettingsPersistence, SettingsStore};
use crate::toggle::EdgeDetector;

use super::components::settings_panel;
use super::constants::*;
use super::feedback::{LoggedAudio, ToggleCounter};
use super::overlay::PreviewOverlay;

/// Key bound to the overlay toggle inside the window
const WINDOW_TOGGLE_KEY: egui::Key = egui::Key::F8;

/// Everything the window needs that is prepared before the event loop starts
pub struct Launch {
    pub persistence: Box<dyn SettingsPersistence>,
    pub persisted: PersistedValues,
    pub screen: ScreenMetrics,
    pub global_hotkey: Option<ChannelHotkey>,
}

/// Key-down level from window input, turned into an edge
struct WindowHotkey {
    ctx: egui::Context,
    edge: EdgeDetector,
}

impl HotkeyInput for WindowHotkey {
    fn key_down_edge(&mut self) -> bool {
        let level = self.ctx.input(|i| i.key_down(WINDOW_TOGGLE_KEY));
        self.edge.update(level)
    }
}

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct ManagerApp {
    controller: TipController,
    persistence: Box<dyn SettingsPersistence>,
    hotkey: Box<dyn HotkeyInput>,
    selection: SelectionTransfer,
    toggles: ToggleCounter,
    status_message: Option<StatusMessage>,
}

impl ManagerApp {
    fn new(cc: &CreationContext<'_>, launch: Launch) -> Result<Self> {
        info!("Initializing settings window");

        let toggles = ToggleCounter::new();
        let selection = SelectionTransfer::new();
        let collaborators = Collaborators {
            overlay: Box::new(PreviewOverlay::new(cc.egui_ctx.clone())),
            selection: selection.clone(),
            indicator: Box::new(toggles.clone()),
            audio: Box::new(LoggedAudio),
        };

        let store = SettingsStore::with_persisted(launch.persisted);
        let controller = TipController::load(store, launch.screen, collaborators)?;

        // The evdev listener already sees the focused window's keyboard
        let hotkey: Box<dyn HotkeyInput> = match launch.global_hotkey {
            Some(global) => Box::new(global),
            None => Box::new(WindowHotkey {
                ctx: cc.egui_ctx.clone(),
                edge: EdgeDetector::new(),
            }),
        };

        let mut app = Self {
            controller,
            persistence: launch.persistence,
            hotkey,
            selection,
            toggles,
            status_message: None,
        };

        // First run writes the defaults out
        app.save();
        Ok(app)
    }

    fn save(&mut self) {
        let snapshot = self.controller.store().persisted_snapshot();
        match self.persistence.save(&snapshot) {
            Ok(()) => {
                self.status_message = Some(StatusMessage {
                    text: "Settings saved".to_string(),
                    color: STATUS_OK,
                });
            }
            Err(err) => {
                error!(error = ?err, "Failed to save settings");
                self.status_message = Some(StatusMessage {
                    text: format!("Save failed: {err}"),
                    color: STATUS_ERROR,
                });
            }
        }
    }

    fn on_settings_edited(&mut self) {
        self.controller.on_settings_changed();
        self.save();
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let visibility = self.controller.visibility();
            ui.label(format!(
                "Overlay: {}  (F8)",
                if visibility.is_visible() { "shown" } else { "hidden" }
            ));
            ui.separator();
            ui.label(format!("Toggled {} times", self.toggles.count()));
            ui.separator();
            ui.label(format!(
                "Selection transfer: {}",
                if self.selection.is_transferring() { "on" } else { "off" }
            ));
        });
        if let Some(message) = &self.status_message {
            ui.colored_label(message.color, &message.text);
        }
    }
}

impl eframe::App for ManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.on_frame(self.hotkey.as_mut());

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            self.status_bar(ui);
            ui.add_space(ITEM_SPACING);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Blueprint Totals Tooltip");
            ui.add_space(SECTION_SPACING);

            egui::ScrollArea::vertical().show(ui, |ui| {
                if settings_panel::ui(ui, self.controller.store_mut()) {
                    self.on_settings_edited();
                }
            });
        });

        ctx.request_repaint_after(Duration::from_millis(HOTKEY_POLL_INTERVAL_MS));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.save();
        info!("Settings window exiting");
    }
}

pub fn run_gui(launch: Launch) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Totals Tip"),
        ..Default::default()
    };

    eframe::run_native(
        "Totals Tip",
        options,
        Box::new(move |cc| Ok(Box::new(ManagerApp::new(cc, launch)?))),
    )
    .map_err(|err| anyhow!("Failed to launch settings window: {err}"))
}
