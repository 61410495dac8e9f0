//! File-backed chirp and user store with a read/write lock around every access.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use log::{debug, info, warn};

use super::bootstrap::{ensure_db, recover_next_id, recover_next_user_id};
use super::snapshot::{read_snapshot, write_snapshot};
use super::traits::ChirpRepository;
use crate::domain::{Chirp, ChirpId, User, UserId};
use crate::error::{ChirpyError, Result};

/// Produces the next unused id. Never moves backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_id: ChirpId,
}

impl IdAllocator {
    pub fn starting_at(next_id: ChirpId) -> Self {
        Self { next_id: next_id.max(1) }
    }

    /// The id the next allocation will return.
    pub fn peek(&self) -> ChirpId {
        self.next_id
    }

    fn allocate(&mut self) -> Result<ChirpId> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| ChirpyError::Storage("Id space exhausted".to_string()))?;
        Ok(id)
    }

    /// Jump past `existing` if it is not already behind us.
    fn observe(&mut self, existing: ChirpId) -> bool {
        if existing >= self.next_id {
            self.next_id = existing + 1;
            true
        } else {
            false
        }
    }
}

/// One allocator per record kind; chirp and user ids are unrelated.
#[derive(Debug)]
struct Allocators {
    chirps: IdAllocator,
    users: IdAllocator,
}

/// Durable, concurrency-safe keeper of all chirps and users.
///
/// Every operation re-reads the file under the lock. Reads share the lock;
/// creates hold it exclusively across read, mutate and write.
#[derive(Debug)]
pub struct ChirpStore {
    path: PathBuf,
    allocators: RwLock<Allocators>,
}

impl ChirpStore {
    /// Open the store at `path`, creating an empty database if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_db(&path)?;

        let snapshot = read_snapshot(&path)?;
        let next_id = recover_next_id(&snapshot);
        let next_user_id = recover_next_user_id(&snapshot);
        info!(
            "Opened chirp store at {} ({} chirps, next id {}; {} users, next user id {})",
            path.display(),
            snapshot.len(),
            next_id,
            snapshot.users.len(),
            next_user_id
        );

        Ok(Self {
            path,
            allocators: RwLock::new(Allocators {
                chirps: IdAllocator::starting_at(next_id),
                users: IdAllocator::starting_at(next_user_id),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next successful create will receive.
    pub fn next_id(&self) -> Result<ChirpId> {
        Ok(self.allocators.read().map_err(poisoned)?.chirps.peek())
    }

    /// The id the next successful user create will receive.
    pub fn next_user_id(&self) -> Result<UserId> {
        Ok(self.allocators.read().map_err(poisoned)?.users.peek())
    }

    pub fn create_record(&self, body: &str) -> Result<Chirp> {
        if body.is_empty() {
            return Err(ChirpyError::Validation("Chirp body is empty".to_string()));
        }

        let mut allocators = self.allocators.write().map_err(poisoned)?;
        let allocator = &mut allocators.chirps;
        let mut snapshot = read_snapshot(&self.path)?;

        if let Some(max) = snapshot.max_id()
            && allocator.observe(max)
        {
            warn!(
                "{} holds chirp id {} beyond the allocator, resyncing to {}",
                self.path.display(),
                max,
                allocator.peek()
            );
        }

        // A failed write below burns this id; it is never handed out again.
        let chirp = Chirp::new(allocator.allocate()?, body);
        snapshot.chirps.insert(chirp.id, chirp.clone());
        write_snapshot(&self.path, &snapshot)?;

        debug!("Created chirp {}", chirp.id);
        Ok(chirp)
    }

    pub fn create_user(&self, email: &str) -> Result<User> {
        if email.is_empty() {
            return Err(ChirpyError::Validation("User email is empty".to_string()));
        }

        let mut allocators = self.allocators.write().map_err(poisoned)?;
        let allocator = &mut allocators.users;
        let mut snapshot = read_snapshot(&self.path)?;

        if let Some(max) = snapshot.max_user_id()
            && allocator.observe(max)
        {
            warn!(
                "{} holds user id {} beyond the allocator, resyncing to {}",
                self.path.display(),
                max,
                allocator.peek()
            );
        }

        let user = User::new(allocator.allocate()?, email);
        snapshot.users.insert(user.id, user.clone());
        write_snapshot(&self.path, &snapshot)?;

        debug!("Created user {}", user.id);
        Ok(user)
    }

    pub fn list_records(&self) -> Result<Vec<Chirp>> {
        let _guard = self.allocators.read().map_err(poisoned)?;
        let snapshot = read_snapshot(&self.path)?;
        Ok(snapshot.into_chirps())
    }

    pub fn get_record(&self, id: ChirpId) -> Result<Chirp> {
        let _guard = self.allocators.read().map_err(poisoned)?;
        let mut snapshot = read_snapshot(&self.path)?;
        snapshot.chirps.remove(&id).ok_or(ChirpyError::NotFound(id))
    }
}

impl ChirpRepository for ChirpStore {
    fn create_record(&self, body: &str) -> Result<Chirp> {
        ChirpStore::create_record(self, body)
    }

    fn list_records(&self) -> Result<Vec<Chirp>> {
        ChirpStore::list_records(self)
    }

    fn get_record(&self, id: ChirpId) -> Result<Chirp> {
        ChirpStore::get_record(self, id)
    }

    fn create_user(&self, email: &str) -> Result<User> {
        ChirpStore::create_user(self, email)
    }
}

fn poisoned<T>(e: PoisonError<T>) -> ChirpyError {
    ChirpyError::Storage(format!("Store lock poisoned: {}", e))
}
