//! Storage layer for Chirpy - a single JSON file of chirps and users kept
//! behind a read/write lock.
//!
//! - `snapshot`: the on-disk document and whole-file atomic writes
//! - `bootstrap`: create-if-absent and id counter recovery for both record kinds
//! - `store`: `ChirpStore`, the lock discipline and id allocation
//! - `traits`: `ChirpRepository`, the seam the façade depends on

mod bootstrap;
mod snapshot;
mod store;
mod traits;

pub use bootstrap::{ensure_db, recover_next_id, recover_next_user_id};
pub use snapshot::{Snapshot, read_snapshot, write_snapshot};
pub use store::{ChirpStore, IdAllocator};
pub use traits::ChirpRepository;
