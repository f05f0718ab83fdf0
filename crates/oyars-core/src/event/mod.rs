// Oyars Event Layer
// Multi-source ingestion into a single ordered queue

pub mod ingest;

pub use ingest::{spawn_readers, EventQueue, SourceReader};
