//! Overlay visibility toggle
//!
//! A two-state machine flipped only on a key-down edge. Each flip notifies
//! the toggle indicator and plays exactly one feedback sound chosen by the
//! new state.

use tracing::info;

use crate::collaborators::{AudioFeedback, SoundCue, ToggleIndicator};
use crate::settings::{SettingHandle, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

impl Visibility {
    pub fn from_flag(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }

    pub fn flipped(self) -> Self {
        match self {
            Visibility::Hidden => Visibility::Visible,
            Visibility::Visible => Visibility::Hidden,
        }
    }

    fn cue(self) -> SoundCue {
        match self {
            Visibility::Visible => SoundCue::ToggledOn,
            Visibility::Hidden => SoundCue::ToggledOff,
        }
    }
}

/// Toggle backed by a hidden, transient boolean setting
#[derive(Debug, Clone, Copy)]
pub struct OverlayToggle {
    flag: SettingHandle<bool>,
}

impl OverlayToggle {
    pub fn new(flag: SettingHandle<bool>) -> Self {
        Self { flag }
    }

    pub fn visibility(&self, store: &SettingsStore) -> Visibility {
        Visibility::from_flag(store.get(&self.flag))
    }

    /// Run one frame of the machine. Returns the new state when a transition happened.
    pub fn on_frame(
        &self,
        key_down_edge: bool,
        store: &mut SettingsStore,
        indicator: &mut dyn ToggleIndicator,
        audio: &mut dyn AudioFeedback,
    ) -> Option<Visibility> {
        if !key_down_edge {
            return None;
        }

        let next = self.visibility(store).flipped();
        store.set(&self.flag, next.is_visible());
        indicator.notify_toggled();
        audio.play(next.cue());

        info!(visibility = ?next, "Overlay toggled");
        Some(next)
    }
}

/// Derives an edge signal from a level signal sampled once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only on the sample where `level` turns true after being false
    pub fn update(&mut self, level: bool) -> bool {
        let edge = level && !self.previous;
        self.previous = level;
        edge
    }
}
