//! Save/load of round and score state.
//!
//! - [`Storage`]: flat key-value backend ([`MemoryStorage`], [`FileStorage`])
//! - [`SaveStore`]: the three typed records the game keeps
//! - [`PersistenceError`]: I/O and decoding failures

mod error;
mod saves;
mod storage;

pub use error::{PersistenceError, Result};
pub use saves::SaveStore;
pub use storage::{FileStorage, MemoryStorage, Storage};
