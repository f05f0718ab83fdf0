// Oyars Transform Layer
// Keymap lookup/expansion and the per-event remapping engine

pub mod engine;
pub mod translate;

pub use engine::{EngineOutput, RemapEngine};
pub use translate::{translate, OutputEvents};
