//! Store Module
//!
//! Key-value storage with TTL expiration: the [`Backend`] primitives, the
//! in-memory implementation and the typed [`KeyValueStore`] facade.

mod backend;
mod clock;
mod entry;
mod kv;
mod memory;
mod pattern;
mod value;


// Re-export public types
pub use backend::Backend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{Entry, EntryData};
pub use kv::{KeyValueStore, PUT_OPERATION};
pub use memory::MemoryBackend;
pub use pattern::GlobPattern;
pub use value::{decode_bytes, decode_float, decode_integer, decode_string, Value};
