//! Interfaces of the components the controller drives but does not own

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::controller::ResolvedSettings;
use crate::toggle::Visibility;

/// Draws the totals overlay
pub trait OverlayDrawer {
    /// Called once at load and after every settings change
    fn resolve_settings(&mut self, settings: &ResolvedSettings);

    /// Called once per frame, after the toggle check
    fn on_frame(&mut self, visibility: Visibility);
}

/// Companion indicator notified once per toggle transition
pub trait ToggleIndicator {
    fn notify_toggled(&mut self);
}

/// Feedback sounds played on toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    ToggledOn,
    ToggledOff,
}

/// Fire-and-forget, non-positional sound playback
pub trait AudioFeedback {
    fn play(&mut self, cue: SoundCue);
}

/// Edge-triggered key-down signal for the bound toggle key
pub trait HotkeyInput {
    /// True at most once per physical press, on the frame it went down
    fn key_down_edge(&mut self) -> bool;
}

/// Process-wide "transfer selection" flag read by the selection-transfer component
#[derive(Debug, Clone, Default)]
pub struct SelectionTransfer {
    transferring: Arc<AtomicBool>,
}

impl SelectionTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_transferring(&self, transferring: bool) {
        self.transferring.store(transferring, Ordering::Relaxed);
    }

    pub fn is_transferring(&self) -> bool {
        self.transferring.load(Ordering::Relaxed)
    }
}

/// Every collaborator the controller pushes into
pub struct Collaborators {
    pub overlay: Box<dyn OverlayDrawer>,
    pub selection: SelectionTransfer,
    pub indicator: Box<dyn ToggleIndicator>,
    pub audio: Box<dyn AudioFeedback>,
}
