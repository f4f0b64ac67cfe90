//! Storage backends for envelope-encrypted transaction records
//!
//! This module provides two storage backends:
//! 1. In-memory (tests, ephemeral services)
//! 2. JSON file in the user's data directory

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::RecordStore;
