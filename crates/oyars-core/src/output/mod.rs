// Oyars Output Layer
// Virtual device sink and synthetic key state

pub mod state;
pub mod uinput;

pub use state::PressedKeyState;
pub use uinput::{UInputError, VirtualDevice};
