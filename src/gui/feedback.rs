use std::cell::Cell;
use std::rc::Rc;

use tracing::info;

use crate::collaborators::{AudioFeedback, SoundCue, ToggleIndicator};

/// Toggle indicator shown in the status bar; clones share one counter
#[derive(Debug, Clone, Default)]
pub struct ToggleCounter(Rc<Cell<u32>>);

impl ToggleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.0.get()
    }
}

impl ToggleIndicator for ToggleCounter {
    fn notify_toggled(&mut self) {
        self.0.set(self.0.get().saturating_add(1));
    }
}

/// Audio backend that reports cues through tracing
#[derive(Debug, Default)]
pub struct LoggedAudio;

impl AudioFeedback for LoggedAudio {
    fn play(&mut self, cue: SoundCue) {
        info!(cue = ?cue, "Playing feedback sound");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_clones_share_count() {
        let counter = ToggleCounter::new();
        let mut indicator = counter.clone();
        indicator.notify_toggled();
        indicator.notify_toggled();
        assert_eq!(counter.count(), 2);
    }
}
