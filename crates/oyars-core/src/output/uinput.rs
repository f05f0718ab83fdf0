// Oyars uinput Output Sink
// Virtual device creation and event emission

use evdev::uinput::VirtualDeviceBuilder;
use evdev::{AttributeSet, EventType, InputEvent};

use super::state::PressedKeyState;
use crate::input::event::{RawEvent, EV_KEY, KEY_PRESS, KEY_RELEASE};
use crate::key::Key;

/// Error types for uinput operations
#[derive(Debug, thiserror::Error)]
pub enum UInputError {
    #[error("Failed to create virtual device: {0}")]
    DeviceCreation(String),

    #[error("Failed to write event: {0}")]
    WriteError(String),
}

/// Virtual uinput device the daemon writes all output through.
///
/// Registers key and synchronization capability for the whole key range at
/// creation; the kernel destroys the device when it is dropped.
pub struct VirtualDevice {
    device: evdev::uinput::VirtualDevice,
    pressed: PressedKeyState,
}

impl VirtualDevice {
    /// Create the virtual device.
    pub fn new(name: &str) -> Result<Self, UInputError> {
        let mut keys = AttributeSet::new();
        for code in 0..256u16 {
            keys.insert(evdev::Key::new(code));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(|e: std::io::Error| UInputError::DeviceCreation(e.to_string()))?
            .name(name)
            .with_keys(&keys)
            .map_err(|e: std::io::Error| UInputError::DeviceCreation(e.to_string()))?
            .build()
            .map_err(|e: std::io::Error| UInputError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            device,
            pressed: PressedKeyState::new(),
        })
    }

    /// Write a single event record.
    pub fn write(&mut self, event: RawEvent) -> Result<(), UInputError> {
        self.write_all(std::slice::from_ref(&event))
    }

    /// Write a batch of event records in order.
    pub fn write_all(&mut self, events: &[RawEvent]) -> Result<(), UInputError> {
        if events.is_empty() {
            return Ok(());
        }

        let records: Vec<InputEvent> = events
            .iter()
            .map(|ev| InputEvent::new(EventType(ev.event_type), ev.code, ev.value))
            .collect();

        self.device
            .emit(&records)
            .map_err(|e: std::io::Error| UInputError::WriteError(e.to_string()))?;

        for ev in events {
            if ev.event_type == EV_KEY {
                match ev.value {
                    KEY_PRESS => self.pressed.add(Key::from(ev.code)),
                    KEY_RELEASE => {
                        self.pressed.remove(Key::from(ev.code));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Release every key still down.
    ///
    /// Called at teardown so no key appears stuck after the device goes
    /// away mid-stream.
    pub fn release_all(&mut self) -> Result<(), UInputError> {
        let stuck = self.pressed.get_all();
        for key in stuck {
            self.write_all(&[RawEvent::key(key.code(), KEY_RELEASE), RawEvent::syn()])?;
        }
        self.pressed.clear();
        Ok(())
    }

    /// Number of keys the sink currently considers down
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }
}
