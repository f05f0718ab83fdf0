// Oyars Core Library
// Event translation engine for thumb-shift keyboard remapping

pub mod config;
pub mod event;
pub mod holding;
pub mod input;
pub mod key;
pub mod mapping;
pub mod modifier;
pub mod output;
pub mod settings;
pub mod symbol;
pub mod transform;
pub mod width;

pub use config::{parse_keymap_path, parse_keymap_str, ConfigError};
pub use event::{spawn_readers, EventQueue};
pub use holding::{HoldingState, DEFAULT_HOLDING_WINDOW_MS};
pub use input::{find_keyboards, list_devices, open_devices, DeviceError, RawEvent};
pub use key::Key;
pub use mapping::{GridPos, InputMode, KeymapTable, LayerGrid, LayerKind};
pub use modifier::{ModifierKey, ModifierState};
pub use output::{UInputError, VirtualDevice};
pub use settings::{Settings, SettingsError};
pub use transform::{translate, EngineOutput, RemapEngine};
