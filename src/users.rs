//! User-account persistence with staged commits.
//!
//! Every mutation is offered to a `StorageBackend` before it becomes
//! visible in the store; a backend failure rolls the change back and
//! surfaces as `UserStoreError::Storage`, so callers always observe
//! either a committed record or an error, never a half-applied write.
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use bcrypt::DEFAULT_COST;

/// A committed user record. The password is stored only as a bcrypt
/// hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub user_name: String,
    pub email: String,
    password_hash: String,
}

impl User {
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User(id={})", self.id)
    }
}

/// Input for `UserStore::add`; the plaintext password never outlives the
/// call.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Closed error taxonomy for the store.
#[derive(Debug)]
pub enum UserStoreError {
    DuplicateUserName(String),
    DuplicateEmail(String),
    NotFound(u64),
    /// The backend rejected a commit; the change was rolled back.
    Storage(String),
    Hash(String),
}

impl fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStoreError::DuplicateUserName(name) => {
                write!(f, "user name '{}' already exists", name)
            }
            UserStoreError::DuplicateEmail(email) => {
                write!(f, "email '{}' already exists", email)
            }
            UserStoreError::NotFound(id) => write!(f, "no user with id {}", id),
            UserStoreError::Storage(reason) => write!(f, "storage failure: {}", reason),
            UserStoreError::Hash(reason) => write!(f, "password hashing failed: {}", reason),
        }
    }
}

impl Error for UserStoreError {}

/// A staged mutation offered to the backend.
#[derive(Debug, Clone)]
pub enum Change {
    Insert(User),
    Update(User),
    Delete(u64),
}

/// The storage layer behind the store. Implementations decide what
/// durably committing a change means; returning an error vetoes it.
pub trait StorageBackend {
    fn commit(&mut self, change: &Change) -> anyhow::Result<()>;
}

/// Backend that accepts every commit. The default for tests and
/// in-process use.
#[derive(Debug, Default)]
pub struct InMemoryBackend;

impl StorageBackend for InMemoryBackend {
    fn commit(&mut self, _change: &Change) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The user store: an id-keyed table plus the backend gating writes.
pub struct UserStore<B: StorageBackend> {
    users: HashMap<u64, User>,
    next_id: u64,
    backend: B,
    hash_cost: u32,
}

impl Default for UserStore<InMemoryBackend> {
    fn default() -> Self {
        UserStore::new(InMemoryBackend)
    }
}

impl<B: StorageBackend> UserStore<B> {
    pub fn new(backend: B) -> Self {
        UserStore {
            users: HashMap::new(),
            next_id: 1,
            backend,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Lower bcrypt cost for tests; clamped to the bcrypt minimum of 4.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost.max(4);
        self
    }

    /// Hash the password, stage the record, and commit it. On a backend
    /// failure nothing is inserted and the failure reason is returned.
    pub fn add(&mut self, new_user: NewUser) -> Result<u64, UserStoreError> {
        if self
            .users
            .values()
            .any(|u| u.user_name == new_user.user_name)
        {
            return Err(UserStoreError::DuplicateUserName(new_user.user_name));
        }
        if self.users.values().any(|u| u.email == new_user.email) {
            return Err(UserStoreError::DuplicateEmail(new_user.email));
        }

        let password_hash = bcrypt::hash(&new_user.password, self.hash_cost)
            .map_err(|e| UserStoreError::Hash(e.to_string()))?;

        let user = User {
            id: self.next_id,
            user_name: new_user.user_name,
            email: new_user.email,
            password_hash,
        };

        self.backend
            .commit(&Change::Insert(user.clone()))
            .map_err(|e| UserStoreError::Storage(format!("{:#}", e)))?;

        let id = user.id;
        self.users.insert(id, user);
        self.next_id += 1;
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn find_by_user_name(&self, user_name: &str) -> Option<&User> {
        self.users.values().find(|u| u.user_name == user_name)
    }

    /// Re-hash and commit a new password for an existing user.
    pub fn update_password(&mut self, id: u64, password: &str) -> Result<(), UserStoreError> {
        let user = self
            .users
            .get(&id)
            .cloned()
            .ok_or(UserStoreError::NotFound(id))?;

        let password_hash = bcrypt::hash(password, self.hash_cost)
            .map_err(|e| UserStoreError::Hash(e.to_string()))?;
        let updated = User {
            password_hash,
            ..user
        };

        self.backend
            .commit(&Change::Update(updated.clone()))
            .map_err(|e| UserStoreError::Storage(format!("{:#}", e)))?;

        self.users.insert(id, updated);
        Ok(())
    }

    pub fn delete(&mut self, id: u64) -> Result<(), UserStoreError> {
        if !self.users.contains_key(&id) {
            return Err(UserStoreError::NotFound(id));
        }

        self.backend
            .commit(&Change::Delete(id))
            .map_err(|e| UserStoreError::Storage(format!("{:#}", e)))?;

        self.users.remove(&id);
        Ok(())
    }

    pub fn verify_password(&self, id: u64, password: &str) -> Result<bool, UserStoreError> {
        let user = self.users.get(&id).ok_or(UserStoreError::NotFound(id))?;
        bcrypt::verify(password, &user.password_hash)
            .map_err(|e| UserStoreError::Hash(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
