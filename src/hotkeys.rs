use anyhow::{Context, Result};
use evdev::{Device, EventSummary, KeyCode};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use tracing::{debug, error, info, warn};

use crate::collaborators::HotkeyInput;
use crate::constants::{input, paths, permissions};
use crate::toggle::EdgeDetector;

/// Statically bound overlay toggle key
pub const TOGGLE_KEY: KeyCode = KeyCode::KEY_F8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Pressed,
    Released,
}

impl KeyTransition {
    /// Map an evdev key event value, ignoring auto-repeat
    fn from_event_value(value: i32) -> Option<Self> {
        match value {
            input::KEY_PRESS => Some(KeyTransition::Pressed),
            input::KEY_RELEASE => Some(KeyTransition::Released),
            _ => None,
        }
    }
}

/// Find all keyboard devices that expose the toggle key
fn find_all_keyboard_devices() -> Result<Vec<Device>> {
    info!(path = %paths::DEV_INPUT, "Scanning for keyboard devices...");

    let mut devices = Vec::new();

    for entry in std::fs::read_dir(paths::DEV_INPUT)
        .context(format!("Failed to read {} - are you in the '{}' group?", paths::DEV_INPUT, permissions::INPUT_GROUP))?
    {
        let entry = entry?;
        let path = entry.path();

        if let Ok(device) = Device::open(&path) {
            let has_key = device
                .supported_keys()
                .is_some_and(|keys| keys.contains(TOGGLE_KEY));
            if has_key {
                info!(device_path = %path.display(), name = ?device.name(), "Found keyboard device");
                devices.push(device);
            }
        }
    }

    if devices.is_empty() {
        anyhow::bail!(
            "No keyboard device with {:?} found. Ensure you're in '{}' group:\n\
             {}\n\
             Then log out and back in.",
            TOGGLE_KEY,
            permissions::INPUT_GROUP,
            permissions::ADD_TO_INPUT_GROUP
        )
    }

    info!(count = devices.len(), "Listening on keyboard device(s)");

    Ok(devices)
}

/// Spawn one background thread per keyboard forwarding toggle key transitions
pub fn spawn_listener(sender: Sender<KeyTransition>) -> Result<Vec<thread::JoinHandle<()>>> {
    let devices = find_all_keyboard_devices()?;
    let mut handles = Vec::new();

    for device in devices {
        let sender = sender.clone();
        let handle = thread::spawn(move || {
            info!(device = ?device.name(), "Hotkey listener started");
            if let Err(e) = listen_for_toggle_key(device, sender) {
                error!(error = %e, "Hotkey listener error");
            }
        });
        handles.push(handle);
    }

    Ok(handles)
}

/// Forward press/release of the toggle key on a single device
fn listen_for_toggle_key(mut device: Device, sender: Sender<KeyTransition>) -> Result<()> {
    loop {
        // Blocks until events are available
        let events = device.fetch_events().context("Failed to fetch events")?;

        for event in events {
            let EventSummary::Key(_, key, value) = event.destructure() else {
                continue;
            };
            if key != TOGGLE_KEY {
                continue;
            }

            debug!(key = ?key, value, "Toggle key event");
            if let Some(transition) = KeyTransition::from_event_value(value) {
                sender
                    .send(transition)
                    .context("Failed to send key transition")?;
            }
        }
    }
}

/// Check if evdev hotkeys are available (user has input group permissions)
pub fn check_permissions() -> bool {
    std::fs::read_dir(paths::DEV_INPUT).is_ok()
}

/// Print helpful error message if permissions missing
pub fn print_permission_error() {
    error!(path = %paths::DEV_INPUT, "Cannot access input devices");
    error!(group = %permissions::INPUT_GROUP, "Global hotkeys require group membership");
    error!(command = %permissions::ADD_TO_INPUT_GROUP, "Add user to input group");
    error!("  Then log out and back in");
    warn!(continuing = true, "Continuing without global hotkey support...");
}

/// Edge signal from transitions sent by the listener threads
pub struct ChannelHotkey {
    receiver: Receiver<KeyTransition>,
    edge: EdgeDetector,
}

impl ChannelHotkey {
    pub fn new(receiver: Receiver<KeyTransition>) -> Self {
        Self {
            receiver,
            edge: EdgeDetector::new(),
        }
    }
}

impl HotkeyInput for ChannelHotkey {
    /// Drains every transition queued since the previous frame
    fn key_down_edge(&mut self) -> bool {
        let mut pressed = false;
        while let Ok(transition) = self.receiver.try_recv() {
            pressed |= self.edge.update(transition == KeyTransition::Pressed);
        }
        pressed
    }
}
