// Oyars Configuration
// Keymap grammar parsing

pub mod parser;

pub use parser::{parse_keymap_path, parse_keymap_str, ConfigError};
