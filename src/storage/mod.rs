//! Cache storage.
//!
//! - [`CacheStorage`] / [`CacheGeneration`] — the storage engine seam.
//! - [`MemoryCacheStorage`] — moka-backed in-process implementation.

mod memory;
mod traits;

pub use memory::{MemoryCacheStorage, MemoryGeneration};
pub use traits::{CacheGeneration, CacheStorage};
