// Oyars Input Layer
// Raw event model and physical device handling

pub mod device;
pub mod event;

pub use device::{find_keyboards, is_keyboard_device, list_devices, open_devices, DeviceError, DeviceInfo};
pub use event::{RawEvent, EV_KEY, EV_MSC, EV_SYN, KEY_PRESS, KEY_RELEASE, KEY_REPEAT};
