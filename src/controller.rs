//! Settings orchestration for the totals tooltip
//!
//! [`TipSettings::declare_all`] registers every option with its validator and
//! custom editor. [`TipController`] owns the store and the toggle, and is the
//! single context object the host passes into its frame and settings-changed
//! callbacks.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::collaborators::{Collaborators, HotkeyInput};
use crate::constants::{defaults, keys, limits};
use crate::settings::validators::{float_range, int_range};
use crate::settings::{CameraZoomRange, Declaration, SettingHandle, SettingsStore};
use crate::toggle::{OverlayToggle, Visibility};
use crate::widgets::{OpacitySlider, TipPositionEditor};

/// Host screen dimensions used to bound margin settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub height: i32,
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self {
            height: defaults::SCREEN_HEIGHT,
        }
    }
}

/// Handles to every declared setting
#[derive(Debug, Clone, Copy)]
pub struct TipSettings {
    pub tracking_visible: SettingHandle<bool>,
    pub tracking_forbidden: SettingHandle<bool>,
    pub zoom_for_tracking: SettingHandle<CameraZoomRange>,
    pub visibility_margin: SettingHandle<i32>,
    pub clamp_tip_to_screen: SettingHandle<bool>,
    pub clamp_margin: SettingHandle<i32>,
    pub highlight_opacity: SettingHandle<f32>,
    pub show_row_tips: SettingHandle<bool>,
    pub count_in_storage: SettingHandle<bool>,
    pub count_forbidden: SettingHandle<bool>,
    pub tip_x_position: SettingHandle<i32>,
    pub tip_y_position: SettingHandle<i32>,
    pub transfer_selection: SettingHandle<bool>,
    pub should_draw_tooltip: SettingHandle<bool>,
}

impl TipSettings {
    /// Declare every setting. Runs once, during configuration load.
    pub fn declare_all(store: &mut SettingsStore, screen: ScreenMetrics) -> Result<Self> {
        // Never below the margin defaults, whatever the reported height
        let max_margin = (screen.height / 2).max(defaults::VISIBILITY_MARGIN);

        let tracking_visible = store.declare(Declaration::new(
            keys::TRACKING_VISIBLE,
            "Track visible blueprints",
            "Total up the materials of blueprints and frames visible on screen.",
            true,
        ))?;
        let tracking_forbidden = store.declare(Declaration::new(
            keys::TRACKING_FORBIDDEN,
            "Track forbidden blueprints",
            "Include forbidden blueprints and frames in the totals.",
            false,
        ))?;
        let zoom_for_tracking = store.declare(Declaration::new(
            keys::ZOOM_FOR_TRACKING,
            "Zoom for tracking",
            "Furthest camera zoom at which visible blueprints are still tracked.",
            CameraZoomRange::Middle,
        ))?;
        let visibility_margin = store.declare(
            Declaration::new(
                keys::VISIBILITY_MARGIN,
                "Visibility margin",
                "Pixels beyond the screen edge within which blueprints still count as visible.",
                defaults::VISIBILITY_MARGIN,
            )
            .validator(int_range(0, max_margin))
            .step(limits::MARGIN_STEP),
        )?;
        let clamp_tip_to_screen = store.declare(Declaration::new(
            keys::CLAMP_TIP_TO_SCREEN,
            "Keep tooltip on screen",
            "Push the tooltip back inside the screen when it would be cut off.",
            true,
        ))?;
        let clamp_margin = store.declare(
            Declaration::new(
                keys::CLAMP_MARGIN,
                "Tooltip screen margin",
                "Minimum distance in pixels between the tooltip and the screen edge.",
                defaults::CLAMP_MARGIN,
            )
            .validator(int_range(0, max_margin))
            .step(limits::MARGIN_STEP)
            .visible_when(|store| store.get_by_key::<bool>(keys::CLAMP_TIP_TO_SCREEN).unwrap_or(true)),
        )?;
        let highlight_opacity = store.declare(
            Declaration::new(
                keys::HIGHLIGHT_OPACITY,
                "Highlight opacity",
                "Opacity of the highlight drawn over tracked blueprints.",
                defaults::HIGHLIGHT_OPACITY,
            )
            .validator(float_range(limits::OPACITY_MIN, limits::OPACITY_MAX))
            .editor(OpacitySlider::new(keys::HIGHLIGHT_OPACITY)),
        )?;
        let show_row_tips = store.declare(Declaration::new(
            keys::SHOW_ROW_TIPS,
            "Show row tooltips",
            "Show a tooltip when hovering a row of the totals.",
            true,
        ))?;
        let count_in_storage = store.declare(Declaration::new(
            keys::COUNT_IN_STORAGE,
            "Count stored materials",
            "Show how much of each material is already in storage.",
            false,
        ))?;
        let count_forbidden = store.declare(Declaration::new(
            keys::COUNT_FORBIDDEN,
            "Count forbidden materials",
            "Include forbidden items in the stored counts.",
            false,
        ))?;
        let (tip_x_position, tip_y_position) = Self::declare_tip_position(store)?;
        let transfer_selection = store.declare(Declaration::new(
            keys::TRANSFER_SELECTION,
            "Transfer selection",
            "Keep blueprints selected when they become frames.",
            true,
        ))?;
        let should_draw_tooltip = store.declare(
            Declaration::new(keys::SHOULD_DRAW_TOOLTIP, "", "", false)
                .never_visible()
                .transient(),
        )?;

        info!(count = store.len(), max_margin, "Declared tooltip settings");

        Ok(Self {
            tracking_visible,
            tracking_forbidden,
            zoom_for_tracking,
            visibility_margin,
            clamp_tip_to_screen,
            clamp_margin,
            highlight_opacity,
            show_row_tips,
            count_in_storage,
            count_forbidden,
            tip_x_position,
            tip_y_position,
            transfer_selection,
            should_draw_tooltip,
        })
    }

    /// The x setting carries the composite editor, the y setting is never listed
    fn declare_tip_position(
        store: &mut SettingsStore,
    ) -> Result<(SettingHandle<i32>, SettingHandle<i32>)> {
        let range = || int_range(limits::TIP_POSITION_MIN, limits::TIP_POSITION_MAX);

        let x = store.declare(
            Declaration::new(
                keys::TIP_X_POSITION,
                "Tooltip position",
                "Where the tooltip is anchored, as a percentage of the screen width and height.",
                defaults::TIP_X_POSITION,
            )
            .validator(range())
            .editor(TipPositionEditor::new(keys::TIP_X_POSITION, keys::TIP_Y_POSITION)),
        )?;
        let y = store.declare(
            Declaration::new(keys::TIP_Y_POSITION, "", "", defaults::TIP_Y_POSITION)
                .validator(range())
                .visible_when(|_| false),
        )?;
        Ok((x, y))
    }

    /// Typed snapshot handed to the overlay drawer
    pub fn resolve(&self, store: &SettingsStore) -> ResolvedSettings {
        ResolvedSettings {
            tracking_visible: store.get(&self.tracking_visible),
            tracking_forbidden: store.get(&self.tracking_forbidden),
            zoom_for_tracking: store.get(&self.zoom_for_tracking),
            visibility_margin: store.get(&self.visibility_margin),
            clamp_tip_to_screen: store.get(&self.clamp_tip_to_screen),
            clamp_margin: store.get(&self.clamp_margin),
            highlight_opacity: store.get(&self.highlight_opacity),
            show_row_tips: store.get(&self.show_row_tips),
            count_in_storage: store.get(&self.count_in_storage),
            count_forbidden: store.get(&self.count_forbidden),
            tip_position: TipPosition {
                x_percent: store.get(&self.tip_x_position),
                y_percent: store.get(&self.tip_y_position),
            },
        }
    }
}

/// Tooltip anchor as percentages of the screen size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipPosition {
    pub x_percent: i32,
    pub y_percent: i32,
}

/// Overlay-relevant settings resolved into plain values
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub tracking_visible: bool,
    pub tracking_forbidden: bool,
    pub zoom_for_tracking: CameraZoomRange,
    pub visibility_margin: i32,
    pub clamp_tip_to_screen: bool,
    pub clamp_margin: i32,
    pub highlight_opacity: f32,
    pub show_row_tips: bool,
    pub count_in_storage: bool,
    pub count_forbidden: bool,
    pub tip_position: TipPosition,
}

/// Owns the settings and the overlay toggle; pushes changes into collaborators
pub struct TipController {
    store: SettingsStore,
    settings: TipSettings,
    toggle: OverlayToggle,
    collaborators: Collaborators,
}

impl TipController {
    /// Declare everything into `store` and perform the load-time push
    pub fn load(
        mut store: SettingsStore,
        screen: ScreenMetrics,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let settings = TipSettings::declare_all(&mut store, screen)
            .context("Failed to declare tooltip settings")?;
        let toggle = OverlayToggle::new(settings.should_draw_tooltip);

        let mut controller = Self {
            store,
            settings,
            toggle,
            collaborators,
        };
        controller.push_derived();
        Ok(controller)
    }

    /// Host callback after any visible setting was edited
    pub fn on_settings_changed(&mut self) {
        debug!("Settings changed, re-resolving");
        self.push_derived();
    }

    /// Host per-frame callback: toggle check first, then overlay drawing
    pub fn on_frame(&mut self, input: &mut dyn HotkeyInput) {
        let edge = input.key_down_edge();
        self.toggle.on_frame(
            edge,
            &mut self.store,
            self.collaborators.indicator.as_mut(),
            self.collaborators.audio.as_mut(),
        );

        let visibility = self.toggle.visibility(&self.store);
        self.collaborators.overlay.on_frame(visibility);
    }

    fn push_derived(&mut self) {
        let transferring = self.store.get(&self.settings.transfer_selection);
        self.collaborators.selection.set_transferring(transferring);

        let resolved = self.settings.resolve(&self.store);
        self.collaborators.overlay.resolve_settings(&resolved);
    }

    pub fn visibility(&self) -> Visibility {
        self.toggle.visibility(&self.store)
    }

    pub fn settings(&self) -> &TipSettings {
        &self.settings
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SettingsStore {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        AudioFeedback, OverlayDrawer, SelectionTransfer, SoundCue, ToggleIndicator,
    };
    use crate::settings::{EditOutcome, PersistedValues, SettingValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        resolved: Vec<ResolvedSettings>,
        frames: Vec<Visibility>,
        notifications: usize,
        sounds: Vec<SoundCue>,
        /// overlay frames already drawn when each sound played
        sound_order: Vec<usize>,
    }

    type Shared = Rc<RefCell<Calls>>;

    struct FakeOverlay(Shared);

    impl OverlayDrawer for FakeOverlay {
        fn resolve_settings(&mut self, settings: &ResolvedSettings) {
            self.0.borrow_mut().resolved.push(settings.clone());
        }

        fn on_frame(&mut self, visibility: Visibility) {
            self.0.borrow_mut().frames.push(visibility);
        }
    }

    struct FakeIndicator(Shared);

    impl ToggleIndicator for FakeIndicator {
        fn notify_toggled(&mut self) {
            self.0.borrow_mut().notifications += 1;
        }
    }

    struct FakeAudio(Shared);

    impl AudioFeedback for FakeAudio {
        fn play(&mut self, cue: SoundCue) {
            let mut calls = self.0.borrow_mut();
            let frames_so_far = calls.frames.len();
            calls.sounds.push(cue);
            calls.sound_order.push(frames_so_far);
        }
    }

    struct ScriptedKey(Vec<bool>);

    impl HotkeyInput for ScriptedKey {
        fn key_down_edge(&mut self) -> bool {
            if self.0.is_empty() { false } else { self.0.remove(0) }
        }
    }

    fn controller_with(
        store: SettingsStore,
        screen: ScreenMetrics,
    ) -> (TipController, Shared, SelectionTransfer) {
        let calls = Shared::default();
        let selection = SelectionTransfer::new();
        let collaborators = Collaborators {
            overlay: Box::new(FakeOverlay(calls.clone())),
            selection: selection.clone(),
            indicator: Box::new(FakeIndicator(calls.clone())),
            audio: Box::new(FakeAudio(calls.clone())),
        };
        let controller = TipController::load(store, screen, collaborators).unwrap();
        (controller, calls, selection)
    }

    #[test]
    fn test_declares_every_setting() {
        let mut store = SettingsStore::new();
        TipSettings::declare_all(&mut store, ScreenMetrics::default()).unwrap();
        assert_eq!(store.len(), 14);
    }

    #[test]
    fn test_declare_all_twice_fails() {
        let mut store = SettingsStore::new();
        TipSettings::declare_all(&mut store, ScreenMetrics::default()).unwrap();
        assert!(TipSettings::declare_all(&mut store, ScreenMetrics::default()).is_err());
    }

    #[test]
    fn test_fresh_load_all_defaults() {
        let (controller, _, _) = controller_with(SettingsStore::new(), ScreenMetrics::default());
        for setting in controller.store().iter() {
            assert_eq!(setting.value(), setting.default_value(), "{}", setting.key());
        }
    }

    #[test]
    fn test_load_pushes_to_collaborators() {
        let (controller, calls, selection) = controller_with(SettingsStore::new(), ScreenMetrics::default());
        assert!(selection.is_transferring());
        let calls = calls.borrow();
        assert_eq!(calls.resolved.len(), 1);
        assert_eq!(calls.resolved[0], controller.settings().resolve(controller.store()));
        assert_eq!(calls.resolved[0].highlight_opacity, 0.10);
        assert_eq!(
            calls.resolved[0].tip_position,
            TipPosition { x_percent: 8, y_percent: 2 }
        );
    }

    #[test]
    fn test_invalid_persisted_values_replaced_by_defaults() {
        let mut persisted = PersistedValues::new();
        persisted.insert(keys::VISIBILITY_MARGIN.to_string(), SettingValue::Int(900));
        persisted.insert(keys::HIGHLIGHT_OPACITY.to_string(), SettingValue::Float(0.9));
        persisted.insert(keys::CLAMP_MARGIN.to_string(), SettingValue::Int(40));
        persisted.insert(keys::SHOULD_DRAW_TOOLTIP.to_string(), SettingValue::Bool(true));

        let (controller, _, _) = controller_with(
            SettingsStore::with_persisted(persisted),
            ScreenMetrics { height: 1000 },
        );
        let store = controller.store();
        let settings = controller.settings();
        assert_eq!(store.get(&settings.visibility_margin), 100);
        assert_eq!(store.get(&settings.highlight_opacity), 0.10);
        assert_eq!(store.get(&settings.clamp_margin), 40);
        assert_eq!(controller.visibility(), Visibility::Hidden);
    }

    #[test]
    fn test_tracking_visible_edit_end_to_end() {
        let (mut controller, calls, selection) =
            controller_with(SettingsStore::new(), ScreenMetrics::default());
        let handle = controller.settings().tracking_visible;
        assert!(controller.store().get(&handle));

        assert_eq!(controller.store_mut().set(&handle, false), EditOutcome::Changed);
        controller.on_settings_changed();

        assert!(selection.is_transferring());
        let calls = calls.borrow();
        assert_eq!(calls.resolved.len(), 2);
        assert!(!calls.resolved[1].tracking_visible);
    }

    #[test]
    fn test_transfer_selection_mirrored_on_change() {
        let (mut controller, _, selection) =
            controller_with(SettingsStore::new(), ScreenMetrics::default());
        let handle = controller.settings().transfer_selection;

        controller.store_mut().set(&handle, false);
        assert!(selection.is_transferring());
        controller.on_settings_changed();
        assert!(!selection.is_transferring());
    }

    #[test]
    fn test_small_screen_still_loads() {
        for height in [150, 0, -20] {
            let (controller, _, _) = controller_with(SettingsStore::new(), ScreenMetrics { height });
            let store = controller.store();
            let settings = controller.settings();
            assert_eq!(store.get(&settings.visibility_margin), defaults::VISIBILITY_MARGIN);
            assert_eq!(store.get(&settings.clamp_margin), defaults::CLAMP_MARGIN);
        }

        let (mut controller, _, _) =
            controller_with(SettingsStore::new(), ScreenMetrics { height: 150 });
        let handle = controller.settings().visibility_margin;
        assert_eq!(controller.store_mut().set(&handle, 101), EditOutcome::Rejected);
        assert_eq!(controller.store_mut().set(&handle, 90), EditOutcome::Changed);
    }

    #[test]
    fn test_visibility_margin_out_of_range_rejected() {
        let (mut controller, _, _) =
            controller_with(SettingsStore::new(), ScreenMetrics { height: 1000 });
        let handle = controller.settings().visibility_margin;

        assert_eq!(controller.store_mut().set(&handle, 900), EditOutcome::Rejected);
        assert_eq!(controller.store().get(&handle), 100);
        assert_eq!(controller.store_mut().set(&handle, 500), EditOutcome::Changed);
        assert_eq!(controller.store_mut().set(&handle, 501), EditOutcome::Rejected);
        assert_eq!(controller.store().get(&handle), 500);
    }

    #[test]
    fn test_generic_listing_excludes_hidden_settings() {
        let (mut controller, _, _) = controller_with(SettingsStore::new(), ScreenMetrics::default());
        let visible = controller.store().visible_keys();
        assert!(visible.contains(&keys::TIP_X_POSITION));
        assert!(visible.contains(&keys::CLAMP_MARGIN));
        assert!(!visible.contains(&keys::TIP_Y_POSITION));
        assert!(!visible.contains(&keys::SHOULD_DRAW_TOOLTIP));

        let clamp = controller.settings().clamp_tip_to_screen;
        controller.store_mut().set(&clamp, false);
        assert!(!controller.store().visible_keys().contains(&keys::CLAMP_MARGIN));
    }

    #[test]
    fn test_frame_toggles_before_drawing() {
        let (mut controller, calls, _) = controller_with(SettingsStore::new(), ScreenMetrics::default());
        let mut key = ScriptedKey(vec![false, true, false, false, true]);

        for _ in 0..6 {
            controller.on_frame(&mut key);
        }

        let calls = calls.borrow();
        use Visibility::{Hidden, Visible};
        assert_eq!(calls.frames, vec![Hidden, Visible, Visible, Visible, Hidden, Hidden]);
        assert_eq!(calls.notifications, 2);
        assert_eq!(calls.sounds, vec![SoundCue::ToggledOn, SoundCue::ToggledOff]);
        // sounds play before that frame's overlay draw
        assert_eq!(calls.sound_order, vec![1, 4]);
    }

    #[test]
    fn test_toggle_not_persisted() {
        let (mut controller, _, _) = controller_with(SettingsStore::new(), ScreenMetrics::default());
        controller.on_frame(&mut ScriptedKey(vec![true]));
        assert_eq!(controller.visibility(), Visibility::Visible);
        assert!(!controller.store().persisted_snapshot().contains_key(keys::SHOULD_DRAW_TOOLTIP));
    }
}
